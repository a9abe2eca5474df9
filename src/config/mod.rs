use crate::error::{Result, ServiceError};
use dashmap::DashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

/// Key holding the service name
pub const SERVICE_NAME_KEY: &str = "SERVICE_NAME";

/// Key holding the re-registration interval in milliseconds
pub const REGISTER_INTERVAL_KEY: &str = "SERVICE_REGISTER_INTERVAL_MS";

/// Configuration service
///
/// A shared key/value view over the values a service starts with. Usually
/// filled from the process environment; callers may override entries before
/// handing it to [`Defaults::from_config`](crate::options::Defaults::from_config).
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every environment variable of the current process
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars_os() {
            if let (Some(key), Some(value)) = (key.to_str(), value.to_str()) {
                service.set(key, value);
            }
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    pub fn service_name(&self) -> Option<String> {
        self.get(SERVICE_NAME_KEY).filter(|name| !name.trim().is_empty())
    }

    /// Re-registration interval, if configured
    pub fn register_interval(&self) -> Result<Option<Duration>> {
        let Some(raw) = self.get(REGISTER_INTERVAL_KEY) else {
            return Ok(None);
        };

        raw.trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| ServiceError::invalid_config(REGISTER_INTERVAL_KEY, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let config = ConfigService::new();
        assert_eq!(config.service_name(), None);
        assert_eq!(config.register_interval().unwrap(), None);

        config.set(SERVICE_NAME_KEY, "billing");
        config.set(REGISTER_INTERVAL_KEY, " 250 ");

        assert_eq!(config.service_name().as_deref(), Some("billing"));
        assert_eq!(
            config.register_interval().unwrap(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let config = ConfigService::new();
        config.set(SERVICE_NAME_KEY, "   ");
        assert_eq!(config.service_name(), None);
    }

    #[test]
    fn test_bad_interval() {
        let config = ConfigService::new();
        config.set(REGISTER_INTERVAL_KEY, "-5");

        let err = config.register_interval().unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidConfig { ref key, .. } if key == REGISTER_INTERVAL_KEY
        ));
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        let key = "SVCKIT_CONFIG_FROM_ENV_TEST";
        // SAFETY: no other test touches the process environment
        unsafe { env::set_var(key, "from-env") };

        let config = ConfigService::from_env();

        unsafe { env::remove_var(key) };
        assert_eq!(config.get(key).as_deref(), Some("from-env"));
    }

    #[test]
    fn test_clones_share_entries() {
        let config = ConfigService::new();
        let other = config.clone();
        other.set("A", "1");
        assert_eq!(config.get("A").as_deref(), Some("1"));
    }
}
