use arbos_primitives_core::multigas::InvalidResourceKind;
use arbos_store::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    InvalidResourceKind(#[from] InvalidResourceKind),
    /// Rejected constraint parameters, e.g. a zero target.
    #[error("invalid gas constraint: {0}")]
    InvalidConstraint(&'static str),
}
