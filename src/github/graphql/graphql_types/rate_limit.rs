use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remaining request quota of the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub limit: u32,
    pub remaining: u32,
    pub used: u32,
    #[serde(rename = "resetAt")]
    pub reset_at: DateTime<Utc>,
}

impl RateLimit {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitData {
    #[serde(rename = "rateLimit")]
    pub rate_limit: RateLimit,
}
