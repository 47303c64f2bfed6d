use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::factor::{FactorRole, ResolvedFactors};

/// Validate internal consistency of resolved factors.
///
/// This checks:
/// - category and sub-category factors declare at least one value
/// - bucket labels are unique within a factor
/// - labels are not blank
pub fn validate_factors(factors: &ResolvedFactors<'_>) -> Result<()> {
    for role in [FactorRole::Category, FactorRole::SubCategory] {
        let factor = factors.get(role);
        if factor.values.is_empty() {
            return Err(Error::InvalidFactor(format!(
                "{role} factor '{}' has no values",
                factor.name
            )));
        }

        let mut seen = BTreeSet::new();
        for label in &factor.values {
            if label.trim().is_empty() {
                return Err(Error::InvalidFactor(format!(
                    "{role} factor '{}' contains a blank label",
                    factor.name
                )));
            }
            if !seen.insert(label.as_str()) {
                return Err(Error::InvalidFactor(format!(
                    "duplicate label in {role} factor '{}': {label}",
                    factor.name
                )));
            }
        }
    }

    Ok(())
}
