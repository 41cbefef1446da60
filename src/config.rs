//! Sweep configuration

/// Default capacity of the sweep event channel
const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Discovery sweep configuration
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Network interface the broadcast is sent from (backend hint).
    /// `None` lets the protocol backend pick.
    pub interface: Option<String>,
    /// Maximum login attempts per device before it is abandoned.
    /// `None` retries for as long as the credential provider keeps
    /// supplying credentials.
    pub max_login_attempts: Option<u32>,
    /// Capacity of the sweep event channel. Lagging subscribers lose
    /// events rather than blocking the sweep.
    pub event_capacity: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            interface: None,
            max_login_attempts: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl DiscoveryConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            interface: std::env::var("ONVIF_SWEEP_INTERFACE").ok(),
            max_login_attempts: std::env::var("ONVIF_SWEEP_MAX_LOGIN_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok()),
            event_capacity: std::env::var("ONVIF_SWEEP_EVENT_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiscoveryConfig::default();
        assert!(config.interface.is_none());
        assert!(config.max_login_attempts.is_none());
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }
}
