use crate::domain::entities::Coordinate;
use crate::domain::value_objects::PermissionPolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Permission gate
    pub permission_policy: PermissionPolicy,

    // Simulated user answer
    pub grant_fine: bool,
    pub grant_coarse: bool,
    pub prompt_delay_ms: u64,

    // Simulated location client
    pub last_known: Option<Coordinate>,
    pub location_delay_ms: u64,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            permission_policy: PermissionPolicy::RejectIfBusy,
            grant_fine: true,
            grant_coarse: true,
            prompt_delay_ms: 300,
            last_known: Some(Coordinate::new(37.7749, -122.4194)),
            location_delay_ms: 100,
            debug: false,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown permission policy `{0}` (expected reject, overwrite or queue)")]
    UnknownPolicy(String),
}

pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Build the configuration from an arbitrary variable lookup.
pub fn load_config_from<F>(var: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();

    let permission_policy = match var("LOCATION_BRIDGE_PERMISSION_POLICY") {
        Some(name) => {
            PermissionPolicy::parse(&name).ok_or(ConfigError::UnknownPolicy(name))?
        }
        None => defaults.permission_policy,
    };

    let flag = |key: &str, default: bool| {
        var(key)
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(default)
    };

    let grant_fine = flag("LOCATION_BRIDGE_GRANT_FINE", defaults.grant_fine);
    let grant_coarse = flag("LOCATION_BRIDGE_GRANT_COARSE", defaults.grant_coarse);

    let prompt_delay_ms = var("LOCATION_BRIDGE_PROMPT_DELAY_MS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.prompt_delay_ms);

    let location_delay_ms = var("LOCATION_BRIDGE_LOCATION_DELAY_MS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.location_delay_ms);

    // Both halves must parse, otherwise the device has no last known location.
    let latitude = var("LOCATION_BRIDGE_LATITUDE");
    let longitude = var("LOCATION_BRIDGE_LONGITUDE");
    let last_known = match (latitude, longitude) {
        (None, None) => defaults.last_known,
        (Some(lat), Some(lon)) => match (lat.trim().parse(), lon.trim().parse()) {
            (Ok(lat), Ok(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        },
        _ => None,
    };

    let debug = var("DEBUG").is_some();

    Ok(Config {
        permission_policy,
        grant_fine,
        grant_coarse,
        prompt_delay_ms,
        last_known,
        location_delay_ms,
        debug,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.permission_policy, PermissionPolicy::RejectIfBusy);
        assert!(cfg.grant_fine);
        assert!(cfg.grant_coarse);
        assert_eq!(cfg.last_known, Some(Coordinate::new(37.7749, -122.4194)));
        assert!(!cfg.debug);
    }

    #[test]
    fn test_load_config_defaults() {
        let cfg = load_config_from(lookup(&[])).unwrap();
        assert_eq!(cfg.permission_policy, PermissionPolicy::RejectIfBusy);
        assert_eq!(cfg.prompt_delay_ms, 300);
        assert_eq!(cfg.location_delay_ms, 100);
        assert_eq!(cfg.last_known, Config::default().last_known);
    }

    #[test]
    fn test_load_policy() {
        let cfg = load_config_from(lookup(&[("LOCATION_BRIDGE_PERMISSION_POLICY", "queue")]))
            .unwrap();
        assert_eq!(cfg.permission_policy, PermissionPolicy::Queue);
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        let err = load_config_from(lookup(&[("LOCATION_BRIDGE_PERMISSION_POLICY", "lifo")]))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::UnknownPolicy("lifo".to_string()))
        );
    }

    #[test]
    fn test_grant_flags() {
        let cfg = load_config_from(lookup(&[
            ("LOCATION_BRIDGE_GRANT_FINE", "false"),
            ("LOCATION_BRIDGE_GRANT_COARSE", "TRUE"),
        ]))
        .unwrap();
        assert!(!cfg.grant_fine);
        assert!(cfg.grant_coarse);

        let cfg = load_config_from(lookup(&[("LOCATION_BRIDGE_GRANT_FINE", "0")])).unwrap();
        assert!(!cfg.grant_fine);
    }

    #[test]
    fn test_invalid_delay_falls_back() {
        let cfg = load_config_from(lookup(&[
            ("LOCATION_BRIDGE_PROMPT_DELAY_MS", "soon"),
            ("LOCATION_BRIDGE_LOCATION_DELAY_MS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.prompt_delay_ms, 300);
        assert_eq!(cfg.location_delay_ms, 5);
    }

    #[test]
    fn test_last_known_location() {
        let cfg = load_config_from(lookup(&[
            ("LOCATION_BRIDGE_LATITUDE", "48.8566"),
            ("LOCATION_BRIDGE_LONGITUDE", " 2.3522"),
        ]))
        .unwrap();
        assert_eq!(cfg.last_known, Some(Coordinate::new(48.8566, 2.3522)));
    }

    #[test]
    fn test_partial_or_bad_location_means_none() {
        let cfg = load_config_from(lookup(&[("LOCATION_BRIDGE_LATITUDE", "48.8566")])).unwrap();
        assert_eq!(cfg.last_known, None);

        let cfg = load_config_from(lookup(&[
            ("LOCATION_BRIDGE_LATITUDE", "north"),
            ("LOCATION_BRIDGE_LONGITUDE", "2.0"),
        ]))
        .unwrap();
        assert_eq!(cfg.last_known, None);
    }

    #[test]
    fn test_debug_flag() {
        let cfg = load_config_from(lookup(&[("DEBUG", "")])).unwrap();
        assert!(cfg.debug);
    }

    #[test]
    fn test_config_clone() {
        let cfg = Config::default();
        let cloned = cfg.clone();
        assert_eq!(cfg.permission_policy, cloned.permission_policy);
        assert_eq!(cfg.last_known, cloned.last_known);
    }
}
