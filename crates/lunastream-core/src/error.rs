use thiserror::Error;

/// Why a storage operation could not complete
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded writing '{key}' ({needed} bytes, {available} available)")]
    QuotaExceeded { key: String, needed: u64, available: u64 },
    #[error("storage i/o error on '{key}': {message}")]
    Io { key: String, message: String },
    #[error("could not (de)serialize '{key}': {message}")]
    Serialization { key: String, message: String },
    #[error("invalid item: {0}")]
    InvalidItem(String),
}

/// Result of a fail-silent operation
///
/// Callers always get a usable value. `Degraded` carries the fallback value
/// together with the reason the real one could not be produced or persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Degraded { value: T, reason: StoreError },
}

impl<T> Outcome<T> {
    pub fn degraded(value: T, reason: StoreError) -> Self {
        Outcome::Degraded { value, reason }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Ok(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Ok(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&StoreError> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Degraded { value, reason } => Outcome::Degraded { value: f(value), reason },
        }
    }

    /// Replace the value, keeping any degradation reason
    pub fn with_value<U>(self, value: U) -> Outcome<U> {
        self.map(|_| value)
    }
}

impl<T> From<Result<T, StoreError>> for Outcome<T>
where
    T: Default,
{
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(reason) => Outcome::degraded(T::default(), reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_still_has_value() {
        let outcome: Outcome<Vec<u32>> = Err(StoreError::Unavailable("blocked".into())).into();
        assert!(outcome.is_degraded());
        assert!(outcome.value().is_empty());
        assert_eq!(outcome.reason(), Some(&StoreError::Unavailable("blocked".into())));
    }

    #[test]
    fn test_map_keeps_reason() {
        let outcome = Outcome::degraded(2, StoreError::InvalidItem("x".into())).map(|v| v * 2);
        assert_eq!(outcome.value(), &4);
        assert!(outcome.is_degraded());
    }
}
