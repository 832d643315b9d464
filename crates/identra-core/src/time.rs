use crate::error::{CoreError, Result};
use time::OffsetDateTime;

/// Current wall-clock time in UTC.
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Current wall-clock time as unix seconds.
pub fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Converts unix seconds into an `OffsetDateTime`.
pub fn from_unix_timestamp(timestamp: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(timestamp).map_err(|e| {
        CoreError::invalid_timestamp(format!("Invalid Unix timestamp {timestamp}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_round_trip() {
        let now = now_utc();
        let restored = from_unix_timestamp(now.unix_timestamp()).unwrap();
        assert_eq!(restored.unix_timestamp(), now.unix_timestamp());
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let err = from_unix_timestamp(i64::MAX).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTimestamp(_)));
    }
}
