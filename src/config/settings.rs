//! Configuration settings and validation.

use crate::{Error, Result};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

/// Default polling interval between scan cycles.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default per-attempt timeout for report submission.
const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Main configuration for the campwatch agent.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory watched for new save files.
    pub watch_root: PathBuf,

    /// Operator-supplied grouping key, constant for the process lifetime.
    pub camp_id: String,

    /// Identifier for this agent instance.
    pub uploader_id: String,

    /// Path to the credential artifact for the remote sink.
    pub credentials_path: PathBuf,

    /// Name of the remote collection receiving reports.
    pub collection: String,

    /// Time to sleep between scan cycles.
    pub poll_interval: Duration,

    /// Per-attempt timeout for a submission.
    pub submit_timeout: Duration,

    /// Inclusive lower bound for extracted ability scores.
    pub stat_min: u8,

    /// Inclusive upper bound for extracted ability scores.
    pub stat_max: u8,

    /// Keep transiently failed paths out of the known set so they are
    /// retried next cycle. Off by default: a failed delivery is dropped.
    pub retry_failed: bool,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_root: PathBuf::from("."),
            camp_id: String::new(),
            uploader_id: "Agent_PC_01".to_string(),
            credentials_path: PathBuf::from("serviceAccountKey.json"),
            collection: "save_reports_v2".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            stat_min: 8,
            stat_max: 20,
            retry_failed: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.camp_id.is_empty() {
            return Err(Error::config("camp_id cannot be empty"));
        }

        if self.uploader_id.is_empty() {
            return Err(Error::config("uploader_id cannot be empty"));
        }

        if self.collection.is_empty() {
            return Err(Error::config("collection cannot be empty"));
        }

        if self.poll_interval.is_zero() {
            return Err(Error::config("poll interval cannot be zero"));
        }

        if self.submit_timeout.is_zero() {
            return Err(Error::config("submit timeout cannot be zero"));
        }

        if self.stat_min > self.stat_max {
            return Err(Error::config(format!(
                "stat range is inverted: min {} > max {}",
                self.stat_min, self.stat_max
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "invalid log level '{}', must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Inclusive range every extracted ability score must fall into.
    #[must_use]
    pub const fn stat_range(&self) -> RangeInclusive<u8> {
        self.stat_min..=self.stat_max
    }
}
