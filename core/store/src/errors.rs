/// Errors returned by metered storage accesses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The burner refused to charge for the access.
    #[error("out of gas")]
    OutOfGas,
    /// A write was attempted through a read-only burner.
    #[error("write protection: cannot modify storage in read-only mode")]
    WriteProtection,
    /// A stored value does not fit the type of the slot it was read through.
    #[error("inconsistent storage state: {0}")]
    InconsistentState(String),
    #[error("sub-storage vector is empty")]
    EmptyVector,
}
