// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("storage: {0}")]
    Storage(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("quota exceeded: {requested} bytes requested, limit is {limit}")]
    QuotaExceeded { requested: u64, limit: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Time-to-live in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TtlMs(pub u64);

impl TtlMs {
    const MS_PER_HOUR: u64 = 60 * 60 * 1000;

    pub const fn from_hours(hours: u64) -> Self {
        Self(hours * Self::MS_PER_HOUR)
    }
}

pub mod config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_from_hours() {
        assert_eq!(TtlMs::from_hours(24).0, 86_400_000);
        assert_eq!(TtlMs::from_hours(4).0, 4 * 3_600_000);
    }

    #[test]
    fn test_quota_error_message() {
        let err = Error::QuotaExceeded {
            requested: 64,
            limit: 16,
        };
        assert_eq!(
            err.to_string(),
            "quota exceeded: 64 bytes requested, limit is 16"
        );
    }
}
