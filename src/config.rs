//! Runtime settings.
//!
//! Values are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, `RADAR_*` environment variables, command-line flags.
//!
//! ```toml
//! service = "github"
//! delay_minutes = 2
//! desktop_notifications = false
//! outage_threshold = 3
//! threshold_mode = "inclusive"
//! datacenters = ["mci", "irancell"]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use radar_adapters::arvan::DEFAULT_BASE_URL;
use radar_types::{Datacenter, Service};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::tracker::{OutagePolicy, ThresholdMode};

/// Name shown in the banner and on desktop popups.
pub const PROGRAM_NAME: &str = "Arvan Cloud Radar Monitor";

/// Prefix of environment variables read as settings.
pub const ENV_PREFIX: &str = "RADAR";

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub service: Service,
    pub delay: Duration,
    pub desktop_notifications: bool,
    pub policy: OutagePolicy,
    pub fetch_timeout: Duration,
    pub base_url: String,
    pub icon_path: PathBuf,
    pub app_name: String,
    pub align_to_minute: bool,
    pub datacenters: Vec<Datacenter>,
}

/// Values given on the command line; `None` leaves lower layers in effect.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config_file: Option<PathBuf>,
    pub service: Option<String>,
    pub delay_minutes: Option<u64>,
    pub desktop_notifications: Option<bool>,
    pub outage_threshold: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    service: Option<String>,
    delay_minutes: u64,
    desktop_notifications: bool,
    outage_threshold: u32,
    threshold_mode: ThresholdMode,
    fetch_timeout_secs: u64,
    base_url: String,
    icon_path: PathBuf,
    app_name: String,
    align_to_minute: bool,
    datacenters: Vec<String>,
}

impl Settings {
    /// Load settings from all layers using the process environment.
    pub fn load(overrides: &SettingsOverrides) -> Result<Self, ConfigError> {
        Self::load_with_env(overrides, None)
    }

    /// Load settings, reading `RADAR_*` variables from `env` when given
    /// instead of the process environment.
    pub fn load_with_env(
        overrides: &SettingsOverrides,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let default_datacenters: Vec<String> =
            Datacenter::known().iter().map(|dc| dc.to_string()).collect();

        let mut builder = Config::builder()
            .set_default("delay_minutes", 1_i64)?
            .set_default("desktop_notifications", true)?
            .set_default("outage_threshold", i64::from(OutagePolicy::DEFAULT_THRESHOLD))?
            .set_default("threshold_mode", ThresholdMode::default().to_string())?
            .set_default("fetch_timeout_secs", 10_i64)?
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("icon_path", "./icon.png")?
            .set_default("app_name", PROGRAM_NAME)?
            .set_default("align_to_minute", false)?
            .set_default("datacenters", default_datacenters)?;

        if let Some(path) = &overrides.config_file {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("datacenters")
                .source(env),
        );

        let raw: RawSettings = builder
            .set_override_option("service", overrides.service.clone())?
            .set_override_option("delay_minutes", overrides.delay_minutes.map(to_i64))?
            .set_override_option("desktop_notifications", overrides.desktop_notifications)?
            .set_override_option("outage_threshold", overrides.outage_threshold.map(i64::from))?
            .build()?
            .try_deserialize()?;

        raw.validate()
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl RawSettings {
    fn validate(self) -> Result<Settings, ConfigError> {
        let service = match self.service.as_deref().map(str::trim) {
            None | Some("") => return Err(ConfigError::MissingService),
            Some(name) => name
                .to_lowercase()
                .parse::<Service>()
                .map_err(|_| ConfigError::UnknownService(name.to_string()))?,
        };

        if self.delay_minutes < 1 {
            return Err(ConfigError::InvalidDelay);
        }
        if self.outage_threshold < 1 {
            return Err(ConfigError::InvalidThreshold);
        }
        if self.fetch_timeout_secs < 1 {
            return Err(ConfigError::InvalidTimeout);
        }

        let datacenters: Vec<Datacenter> = self
            .datacenters
            .iter()
            .map(|dc| dc.trim())
            .map(|dc| {
                if dc.is_empty() {
                    Err(ConfigError::EmptyDatacenter)
                } else {
                    Ok(Datacenter::from(dc))
                }
            })
            .collect::<Result<_, _>>()?;
        if datacenters.is_empty() {
            return Err(ConfigError::NoDatacenters);
        }

        Ok(Settings {
            service,
            delay: Duration::from_secs(self.delay_minutes.saturating_mul(60)),
            desktop_notifications: self.desktop_notifications,
            policy: OutagePolicy::new(self.outage_threshold, self.threshold_mode),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            base_url: self.base_url,
            icon_path: self.icon_path,
            app_name: self.app_name,
            align_to_minute: self.align_to_minute,
            datacenters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn with_service(service: &str) -> SettingsOverrides {
        SettingsOverrides {
            service: Some(service.to_string()),
            ..Default::default()
        }
    }

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(&with_service("google"), env(&[])).unwrap();

        assert_eq!(settings.service, Service::Google);
        assert_eq!(settings.delay, Duration::from_secs(60));
        assert!(settings.desktop_notifications);
        assert_eq!(settings.policy, OutagePolicy::default());
        assert_eq!(settings.fetch_timeout, Duration::from_secs(10));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.icon_path, PathBuf::from("./icon.png"));
        assert_eq!(settings.app_name, PROGRAM_NAME);
        assert!(!settings.align_to_minute);
        assert_eq!(settings.datacenters, Datacenter::known());
    }

    #[test]
    fn test_service_is_case_insensitive() {
        let settings = Settings::load_with_env(&with_service("GitHub"), env(&[])).unwrap();
        assert_eq!(settings.service, Service::Github);
    }

    #[test]
    fn test_missing_service() {
        let err = Settings::load_with_env(&SettingsOverrides::default(), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingService));

        let err = Settings::load_with_env(&with_service("  "), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingService));
    }

    #[test]
    fn test_unknown_service() {
        let err = Settings::load_with_env(&with_service("yahoo"), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownService(ref s) if s == "yahoo"));
        assert_eq!(err.to_string(), "invalid service: yahoo");
    }

    #[test]
    fn test_zero_delay_rejected() {
        let overrides = SettingsOverrides {
            delay_minutes: Some(0),
            ..with_service("bing")
        };
        let err = Settings::load_with_env(&overrides, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelay));
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let overrides = SettingsOverrides {
            outage_threshold: Some(0),
            ..with_service("bing")
        };
        let err = Settings::load_with_env(&overrides, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold));
    }

    #[test]
    fn test_environment_layer() {
        let settings = Settings::load_with_env(
            &SettingsOverrides::default(),
            env(&[
                ("RADAR_SERVICE", "divar"),
                ("RADAR_OUTAGE_THRESHOLD", "4"),
                ("RADAR_THRESHOLD_MODE", "exclusive"),
                ("RADAR_DESKTOP_NOTIFICATIONS", "false"),
                ("RADAR_DATACENTERS", "mci,afranet"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.service, Service::Divar);
        assert_eq!(settings.policy, OutagePolicy::new(4, ThresholdMode::Exclusive));
        assert!(!settings.desktop_notifications);
        assert_eq!(
            settings.datacenters,
            vec![Datacenter::new("mci"), Datacenter::new("afranet")]
        );
    }

    #[test]
    fn test_file_layer_and_cli_precedence() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
service = "aparat"
delay_minutes = 5
fetch_timeout_secs = 3
align_to_minute = true
datacenters = ["tehran-2", "tehran-3"]
"#
        )
        .unwrap();

        let overrides = SettingsOverrides {
            config_file: Some(file.path().to_path_buf()),
            delay_minutes: Some(2),
            ..Default::default()
        };
        let settings =
            Settings::load_with_env(&overrides, env(&[("RADAR_SERVICE", "wikipedia")])).unwrap();

        // Environment beats the file, flags beat both.
        assert_eq!(settings.service, Service::Wikipedia);
        assert_eq!(settings.delay, Duration::from_secs(120));
        assert_eq!(settings.fetch_timeout, Duration::from_secs(3));
        assert!(settings.align_to_minute);
        assert_eq!(
            settings.datacenters,
            vec![Datacenter::new("tehran-2"), Datacenter::new("tehran-3")]
        );
    }

    #[test]
    fn test_missing_config_file() {
        let overrides = SettingsOverrides {
            config_file: Some(PathBuf::from("/nonexistent/radar-notif.toml")),
            ..with_service("google")
        };
        let err = Settings::load_with_env(&overrides, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_empty_datacenter_list() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "datacenters = []").unwrap();

        let overrides = SettingsOverrides {
            config_file: Some(file.path().to_path_buf()),
            ..with_service("google")
        };
        let err = Settings::load_with_env(&overrides, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::NoDatacenters));
    }
}
