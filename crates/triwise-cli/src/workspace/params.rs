use std::path::{Path, PathBuf};

use triwise_core::{Factor, default_factors};

use super::atomic::write_json_atomic;
use super::{WorkspaceError, WorkspacePaths, WorkspaceResult};

/// Ordered parameter list persisted in `config/parameters.json`.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    path: PathBuf,
}

impl ParameterStore {
    pub fn new(paths: &WorkspacePaths) -> Self {
        Self {
            path: paths.parameters_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored factors; a missing file is an empty list.
    pub fn load(&self) -> WorkspaceResult<Vec<Factor>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn set_all(&self, factors: &[Factor]) -> WorkspaceResult<()> {
        write_json_atomic(&self.path, &factors)
    }

    pub fn add(&self, name: &str, values: Vec<String>) -> WorkspaceResult<Vec<Factor>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::Invalid("parameter name is empty".to_string()));
        }
        let values = non_empty(values)?;
        let mut factors = self.load()?;
        factors.push(Factor::new(name, values));
        self.set_all(&factors)?;
        Ok(factors)
    }

    /// Replace the values at `index`, and its name when one is given.
    pub fn update(
        &self,
        index: usize,
        values: Vec<String>,
        name: Option<&str>,
    ) -> WorkspaceResult<Vec<Factor>> {
        let values = non_empty(values)?;
        let mut factors = self.load()?;
        let len = factors.len();
        let factor = factors.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
        factor.values = values;
        if let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) {
            factor.name = name.to_string();
        }
        self.set_all(&factors)?;
        Ok(factors)
    }

    pub fn remove(&self, index: usize) -> WorkspaceResult<Factor> {
        let mut factors = self.load()?;
        if index >= factors.len() {
            return Err(out_of_range(index, factors.len()));
        }
        let removed = factors.remove(index);
        self.set_all(&factors)?;
        Ok(removed)
    }

    pub fn clear(&self) -> WorkspaceResult<()> {
        self.set_all(&[])
    }

    /// Replace the stored list with the default quantities, cuisines and
    /// main ingredients.
    pub fn seed_defaults(&self) -> WorkspaceResult<Vec<Factor>> {
        let factors = default_factors();
        self.set_all(&factors)?;
        Ok(factors)
    }
}

/// Trim every value and drop the empty ones.
fn parse_values<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|value| value.as_ref().trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn non_empty(values: Vec<String>) -> WorkspaceResult<Vec<String>> {
    let values = parse_values(values);
    if values.is_empty() {
        return Err(WorkspaceError::Invalid(
            "a parameter needs at least one non-empty value".to_string(),
        ));
    }
    Ok(values)
}

fn out_of_range(index: usize, len: usize) -> WorkspaceError {
    WorkspaceError::Invalid(format!(
        "parameter index {index} is out of range ({len} stored)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (WorkspacePaths, ParameterStore) {
        let root = std::env::temp_dir().join(format!("triwise_params_{}", uuid::Uuid::new_v4()));
        let paths = WorkspacePaths::new(root);
        let store = ParameterStore::new(&paths);
        (paths, store)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn missing_file_is_empty() {
        let (paths, store) = temp_store();
        assert!(store.load().expect("load").is_empty());
        assert!(!paths.root.exists());
    }

    #[test]
    fn add_update_remove_keep_order() {
        let (paths, store) = temp_store();
        store
            .add("Total Vendor", strings(&["50", " 80 ", ""]))
            .expect("add quantity");
        store
            .add("Cuisene Type", strings(&["Malay", "Chinese"]))
            .expect("add category");

        let factors = store
            .update(1, strings(&["Malay", "Indian"]), Some("Parameter 2"))
            .expect("update");
        assert_eq!(factors[0].values, strings(&["50", "80"]));
        assert_eq!(factors[1].name, "Parameter 2");
        assert_eq!(factors[1].values, strings(&["Malay", "Indian"]));

        let removed = store.remove(0).expect("remove");
        assert_eq!(removed.name, "Total Vendor");
        let reloaded = store.load().expect("reload");
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].name, "Parameter 2");

        let _ = std::fs::remove_dir_all(paths.root);
    }

    #[test]
    fn bad_input_is_rejected() {
        let (paths, store) = temp_store();
        assert!(store.add("  ", strings(&["1"])).is_err());
        assert!(store.add("Total Vendor", strings(&[" ", ""])).is_err());
        assert!(matches!(
            store.remove(0),
            Err(WorkspaceError::Invalid(message)) if message.contains("out of range")
        ));
        assert!(store.update(3, strings(&["x"]), None).is_err());
        let _ = std::fs::remove_dir_all(paths.root);
    }

    #[test]
    fn seed_and_clear() {
        let (paths, store) = temp_store();
        let seeded = store.seed_defaults().expect("seed");
        assert_eq!(seeded, default_factors());
        assert_eq!(store.load().expect("load"), default_factors());

        store.clear().expect("clear");
        assert!(store.load().expect("load").is_empty());
        let _ = std::fs::remove_dir_all(paths.root);
    }

    #[test]
    fn values_are_trimmed() {
        assert_eq!(
            parse_values(["  a", "", "b  ", "   "]),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
