use thiserror::Error;

/// Errors returned by [`HashTable`](crate::HashTable) operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// No entry in the key's chain matched.
    #[error("key {0} not found")]
    KeyNotFound(i32),
    /// A constructor argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(TableError::KeyNotFound(-7).to_string(), "key -7 not found");
        assert_eq!(
            TableError::InvalidArgument("capacity must be positive").to_string(),
            "invalid argument: capacity must be positive"
        );
    }
}
