use thiserror::Error;

use crate::factor::FactorRole;
use crate::types::PartitionLevel;

/// Core error type shared across triwise crates.
#[derive(Debug, Error)]
pub enum Error {
    /// No input factor matched any alias of the role.
    #[error("no factor matches role {0} (accepted aliases: {aliases})", aliases = .0.aliases().join(", "))]
    UnresolvedRole(FactorRole),
    /// A partition needed more units than its total to give every bucket one.
    #[error(
        "infeasible {level} partition: total {total} cannot cover {buckets} bucket(s), allocated {allocated}"
    )]
    InfeasiblePartition {
        level: PartitionLevel,
        total: u64,
        buckets: usize,
        allocated: u64,
    },
    /// The factor list violates internal invariants.
    #[error("invalid factor: {0}")]
    InvalidFactor(String),
    /// The partition policy carries out-of-range parameters.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),
}

/// Convenience alias for results returned by triwise crates.
pub type Result<T> = std::result::Result<T, Error>;
