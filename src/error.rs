//! Error taxonomy for the simulator core.
//!
//! Catalog loading and the binaries wrap these in `anyhow` with context; the
//! core operations return them directly so callers can match on the variant.

use crate::catalog::BehaviorCategory;
use std::fmt;
use thiserror::Error;

pub type SimResult<T> = std::result::Result<T, SimError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("{kind} index {index} is out of range (expected 0..{len})")]
    OutOfRange {
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    /// A duck lost its binding for a category. Construction rules make this
    /// unreachable, so callers should treat it as a bug.
    #[error("duck '{duck}' has no {category} behavior bound")]
    UnboundCategory {
        duck: String,
        category: BehaviorCategory,
    },

    #[error("unknown behavior implementation '{name}'")]
    UnknownImplementation { name: String },

    #[error("implementation '{name}' is a {actual} behavior, not {expected}")]
    CategoryMismatch {
        name: String,
        expected: BehaviorCategory,
        actual: BehaviorCategory,
    },

    #[error("no duck labelled '{label}'")]
    UnknownDuck { label: String },

    #[error("unknown behavior category '{name}'")]
    UnknownCategory { name: String },

    #[error("behavior implementation '{name}' is already registered")]
    DuplicateImplementation { name: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndexKind {
    Duck,
    Category,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IndexKind::Duck => "duck",
            IndexKind::Category => "category",
        };
        write!(f, "{}", label)
    }
}
