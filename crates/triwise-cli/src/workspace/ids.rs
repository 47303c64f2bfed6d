use chrono::{DateTime, Utc};

/// File stem for an exported artifact: `{kind}_{utc timestamp}_{8 hex}`.
/// Stems sort by creation time within a kind.
pub fn new_artifact_id(kind: &str) -> String {
    artifact_id_at(kind, Utc::now(), uuid::Uuid::new_v4())
}

fn artifact_id_at(kind: &str, at: DateTime<Utc>, id: uuid::Uuid) -> String {
    let stamp = at.format("%Y%m%dT%H%M%SZ");
    let suffix = id.simple().to_string();
    format!("{kind}_{stamp}_{}", &suffix[..8])
}
