//! Configuration
//!
//! Read from `BIDWATCH_*` environment variables (a `.env` file is loaded
//! first if present), then overridden by command line flags.
use crate::auction::Price;
use crate::cli::Args;
use crate::extract::{ExtractRules, MyBidRule, DEFAULT_BASE_URL};
use crate::snapshot::{DetectionRules, DEFAULT_BID_INCREASE_THRESHOLD, DEFAULT_ENDING_SOON_MINUTES};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_PAGES_DIR: &str = "data/pages";
pub const DEFAULT_STATUS_FILE: &str = "data/status.json";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: can't parse {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("check interval must be at least one second")]
    ZeroInterval,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory the browser companion saves listing pages into
    pub pages_dir: PathBuf,

    pub status_file: PathBuf,

    /// Seconds between monitoring cycles
    pub check_interval_secs: u64,

    pub bid_increase_threshold: Price,

    pub ending_soon_minutes: u32,

    /// Auction site root, for relative lot links
    pub base_url: String,

    pub my_bid_rule: MyBidRule,

    /// External program that receives rendered notifications on stdin
    pub notify_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages_dir: DEFAULT_PAGES_DIR.into(),
            status_file: DEFAULT_STATUS_FILE.into(),
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            bid_increase_threshold: DEFAULT_BID_INCREASE_THRESHOLD,
            ending_soon_minutes: DEFAULT_ENDING_SOON_MINUTES,
            base_url: DEFAULT_BASE_URL.to_owned(),
            my_bid_rule: MyBidRule::default(),
            notify_command: None,
        }
    }
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        })
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like [`Config::from_env`], with variables from `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();
        let text = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let config = Self {
            pages_dir: text("BIDWATCH_PAGES_DIR").map_or(default.pages_dir, PathBuf::from),
            status_file: text("BIDWATCH_STATUS_FILE").map_or(default.status_file, PathBuf::from),
            check_interval_secs: parsed(&lookup, "BIDWATCH_CHECK_INTERVAL")?
                .unwrap_or(default.check_interval_secs),
            bid_increase_threshold: parsed(&lookup, "BIDWATCH_BID_INCREASE_THRESHOLD")?
                .unwrap_or(default.bid_increase_threshold),
            ending_soon_minutes: parsed(&lookup, "BIDWATCH_ENDING_SOON_MINUTES")?
                .unwrap_or(default.ending_soon_minutes),
            base_url: text("BIDWATCH_BASE_URL").unwrap_or(default.base_url),
            my_bid_rule: parsed(&lookup, "BIDWATCH_MY_BID_RULE")?.unwrap_or(default.my_bid_rule),
            notify_command: text("BIDWATCH_NOTIFY_COMMAND"),
        };
        config.validated()
    }

    /// Command line flags win over the environment.
    pub fn apply_args(mut self, args: &Args) -> Result<Self, ConfigError> {
        if let Some(dir) = &args.pages_dir {
            self.pages_dir = dir.clone();
        }
        if let Some(path) = &args.status_file {
            self.status_file = path.clone();
        }
        if let Some(secs) = args.interval {
            self.check_interval_secs = secs;
        }
        if let Some(command) = &args.notify_command {
            self.notify_command = Some(command.clone());
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.check_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(self)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn extract_rules(&self) -> ExtractRules {
        ExtractRules {
            base_url: self.base_url.clone(),
            my_bid_rule: self.my_bid_rule,
        }
    }

    pub fn detection_rules(&self) -> DetectionRules {
        DetectionRules {
            bid_increase_threshold: self.bid_increase_threshold,
            ending_soon_minutes: self.ending_soon_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.check_interval(), Duration::from_secs(300));
        assert_eq!(config.detection_rules(), DetectionRules::default());
        assert_eq!(config.extract_rules(), ExtractRules::default());
    }

    #[test]
    fn env_values() {
        let config = from_vars(&[
            ("BIDWATCH_CHECK_INTERVAL", "60"),
            ("BIDWATCH_BID_INCREASE_THRESHOLD", "£2.50"),
            ("BIDWATCH_MY_BID_RULE", "max"),
            ("BIDWATCH_NOTIFY_COMMAND", "notify-send"),
            ("BIDWATCH_BASE_URL", "  "),
        ])
        .unwrap();
        assert_eq!(config.check_interval_secs, 60);
        assert_eq!(config.bid_increase_threshold, Price::from_pence(250));
        assert_eq!(config.my_bid_rule, MyBidRule::AlwaysMax);
        assert_eq!(config.notify_command.as_deref(), Some("notify-send"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn bad_values() {
        assert!(matches!(
            from_vars(&[("BIDWATCH_ENDING_SOON_MINUTES", "soon")]),
            Err(ConfigError::Invalid { var: "BIDWATCH_ENDING_SOON_MINUTES", .. })
        ));
        assert_eq!(
            from_vars(&[("BIDWATCH_CHECK_INTERVAL", "0")]),
            Err(ConfigError::ZeroInterval)
        );
    }

    #[test]
    fn args_override_env() {
        let args = Args {
            interval: Some(5),
            pages_dir: Some("/tmp/pages".into()),
            ..Args::default()
        };
        let config = from_vars(&[("BIDWATCH_CHECK_INTERVAL", "60")])
            .unwrap()
            .apply_args(&args)
            .unwrap();
        assert_eq!(config.check_interval_secs, 5);
        assert_eq!(config.pages_dir, PathBuf::from("/tmp/pages"));
    }
}
