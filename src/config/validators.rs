//! 配置值验证模块

use super::RetentionConfig;
use crate::errors::{Result, ShortLinkError};

/// The generated-code prefix must be non-empty and free of whitespace and
/// path separators, otherwise generated codes are not usable in a URL path.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(ShortLinkError::config(
            "shortlink.autogenerated_prefix must not be empty",
        ));
    }

    if prefix
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == '?' || c == '#')
    {
        return Err(ShortLinkError::config(format!(
            "shortlink.autogenerated_prefix '{}' contains characters that are not URL path safe",
            prefix
        )));
    }

    Ok(())
}

/// Longest retention age accepted, in days (about 1000 years)
pub const MAX_RETENTION_DAYS: u64 = 365_000;

/// Longest sweep interval accepted, in hours (one year)
pub const MAX_INTERVAL_HOURS: u64 = 24 * 366;

/// Convert a retention age in days to a duration
///
/// Rejects 0 and anything above [`MAX_RETENTION_DAYS`], so the resulting
/// cutoff always lies in the past and `now - age` cannot overflow.
pub fn retention_age(days: u64) -> Result<chrono::Duration> {
    if days == 0 || days > MAX_RETENTION_DAYS {
        return Err(ShortLinkError::config(format!(
            "Retention age must be between 1 and {} days, got {}",
            MAX_RETENTION_DAYS, days
        )));
    }

    i64::try_from(days)
        .ok()
        .and_then(chrono::Duration::try_days)
        .ok_or_else(|| ShortLinkError::config(format!("Retention age of {} days is out of range", days)))
}

pub fn validate_retention(retention: &RetentionConfig) -> Result<()> {
    if retention.interval_hours == 0 || retention.interval_hours > MAX_INTERVAL_HOURS {
        return Err(ShortLinkError::config(format!(
            "retention.interval_hours must be between 1 and {}",
            MAX_INTERVAL_HOURS
        )));
    }

    retention_age(retention.max_age_days)
        .map_err(|e| ShortLinkError::config(format!("retention.max_age_days: {}", e.message())))?;

    Ok(())
}
