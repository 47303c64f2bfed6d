use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named input dimension with an ordered list of value tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Factor {
    /// Role hint name, matched against the alias table of each role.
    #[serde(rename = "parameter")]
    pub name: String,
    /// Value tokens in declaration order.
    pub values: Vec<String>,
}

impl Factor {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Role a factor plays in the combinatorial space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FactorRole {
    Quantity,
    Category,
    SubCategory,
}

impl FactorRole {
    /// Roles in resolution order.
    pub const ALL: [FactorRole; 3] = [
        FactorRole::Quantity,
        FactorRole::Category,
        FactorRole::SubCategory,
    ];

    /// Accepted name fragments for the role. "Cuisene" is spelled the way
    /// stored parameter sets spell it.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FactorRole::Quantity => &["Total Vendor", "Parameter 1"],
            FactorRole::Category => &["Cuisene Type", "Parameter 2"],
            FactorRole::SubCategory => &["Main Ingredient", "Parameter 3"],
        }
    }

    /// Returns true when `name` contains one of the role aliases.
    pub fn matches(self, name: &str) -> bool {
        self.aliases().iter().any(|alias| name.contains(alias))
    }

    /// First factor, in input order, whose name matches the role.
    pub fn resolve(self, factors: &[Factor]) -> Option<&Factor> {
        factors.iter().find(|factor| self.matches(&factor.name))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FactorRole::Quantity => "quantity",
            FactorRole::Category => "category",
            FactorRole::SubCategory => "sub_category",
        }
    }
}

impl fmt::Display for FactorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three factors bound to their roles.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFactors<'a> {
    pub quantity: &'a Factor,
    pub category: &'a Factor,
    pub sub_category: &'a Factor,
}

impl<'a> ResolvedFactors<'a> {
    /// Bind every role or report the first one that has no matching factor.
    pub fn resolve(factors: &'a [Factor]) -> Result<Self> {
        let bind = |role: FactorRole| role.resolve(factors).ok_or(Error::UnresolvedRole(role));
        Ok(Self {
            quantity: bind(FactorRole::Quantity)?,
            category: bind(FactorRole::Category)?,
            sub_category: bind(FactorRole::SubCategory)?,
        })
    }

    pub fn get(&self, role: FactorRole) -> &'a Factor {
        match role {
            FactorRole::Quantity => self.quantity,
            FactorRole::Category => self.category,
            FactorRole::SubCategory => self.sub_category,
        }
    }
}

/// Parse a quantity token with integer-prefix semantics.
///
/// Leading whitespace is skipped, an optional sign is honoured and parsing
/// stops at the first non-digit, so `"12abc"` is 12 and `"3.7"` is 3.
/// Tokens without digits, and values `<= 0`, yield `None`.
pub fn parse_quantity(token: &str) -> Option<u64> {
    let trimmed = token.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: u64 = digits[..end].parse().ok()?;
    if negative || value == 0 {
        return None;
    }
    Some(value)
}
