//! Quota configuration.

use std::num::NonZeroU32;
use std::time::Duration;

const DEFAULT_PREMIUM_DAYS: NonZeroU32 = match NonZeroU32::new(365) {
    Some(days) => days,
    None => unreachable!(),
};

/// Tunables for quota enforcement and entitlement grants.
///
/// `Default` matches the freemium contract: 3 actions per rolling 24 hours,
/// 48-hour usage retention, 365-day grants with a 7-day store-retention
/// grace window past expiry.
///
/// The wire key prefixes (`usage:`, `premium:`) are deliberately not
/// configurable; they are part of the storage compatibility contract.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    /// Actions a free user may take per rolling window.
    pub free_tier_limit: u32,
    /// Length of the rolling usage window.
    pub usage_window: Duration,
    /// TTL requested for the usage log on every write. The retention window
    /// is therefore measured from the most recent recorded event, not the
    /// oldest.
    pub usage_retention: Duration,
    /// Grant length used by [`Entitlements::grant`](crate::Entitlements::grant).
    pub default_premium_days: NonZeroU32,
    /// Extra days past expiry the store is asked to keep a premium record,
    /// so the lazy-expiry read path can observe and clean a stale record
    /// instead of the store having already evicted it.
    pub premium_ttl_grace_days: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_tier_limit: 3,
            usage_window: Duration::from_secs(24 * 60 * 60),
            usage_retention: Duration::from_secs(48 * 60 * 60),
            default_premium_days: DEFAULT_PREMIUM_DAYS,
            premium_ttl_grace_days: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_freemium_contract() {
        let config = QuotaConfig::default();
        assert_eq!(config.free_tier_limit, 3);
        assert_eq!(config.usage_window, Duration::from_secs(86_400));
        assert_eq!(config.usage_retention, Duration::from_secs(172_800));
        assert_eq!(config.default_premium_days.get(), 365);
        assert_eq!(config.premium_ttl_grace_days, 7);
    }
}
