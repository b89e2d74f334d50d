use core::fmt;

/// Failure values returned by store mutations.
///
/// Lookup misses are not errors; they are `None`. Every variant here is
/// detected before any slot is touched, so a failed operation leaves the
/// store exactly as it was.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// The key failed validation (for byte-string keys: empty).
    InvalidKey,
    /// A probed store is full, or its probe sequence found no empty slot
    /// within `capacity` attempts.
    CapacityExhausted,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidKey => f.write_str("key failed validation"),
            StoreError::CapacityExhausted => {
                f.write_str("store is full or probe sequence exhausted")
            }
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::StoreError;

    #[test]
    fn display_is_stable() {
        assert_eq!(StoreError::InvalidKey.to_string(), "key failed validation");
        assert_eq!(
            StoreError::CapacityExhausted.to_string(),
            "store is full or probe sequence exhausted"
        );
    }

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<StoreError>();
    }
}
