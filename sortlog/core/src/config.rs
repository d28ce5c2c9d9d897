// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Sort logging configuration

use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::error::{Result, SortLogError};

/// Environment variable overriding the sort log file path.
pub const SORTLOG_LOG_FILE: &str = "SORTLOG_LOG_FILE";
/// Environment variable carrying the query number attached to every record.
pub const SORTLOG_QUERY_NUMBER: &str = "SORTLOG_QUERY_NUMBER";
/// Log file used when no path is configured.
pub const DEFAULT_LOG_FILE: &str = "sorts.txt";

/// Configuration of a [`crate::SortLogger`].
///
/// Resolved once, typically at process start, and handed to the logger.
/// Nothing in this crate reads the environment after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortLogConfig {
    /// File that sort records are written to
    pub log_file: PathBuf,
    /// Optional query identifier appended to every record
    pub query_tag: Option<String>,
    /// Truncate the log file when the sink is opened. Only honoured for
    /// [`LogRotationPolicy::Never`], rotated files are always appended to.
    pub truncate: bool,
    /// Rotation policy of the log file
    pub rotation: LogRotationPolicy,
}

impl Default for SortLogConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            query_tag: None,
            truncate: true,
            rotation: LogRotationPolicy::Never,
        }
    }
}

impl SortLogConfig {
    /// Resolves the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(path) = non_empty(SORTLOG_LOG_FILE) {
            config.log_file = PathBuf::from(path);
        }
        config.query_tag = non_empty(SORTLOG_QUERY_NUMBER);
        config
    }

    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = log_file.into();
        self
    }

    pub fn with_query_tag(mut self, query_tag: impl Into<String>) -> Self {
        self.query_tag = Some(query_tag.into());
        self
    }

    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn with_rotation(mut self, rotation: LogRotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    /// Directory holding the log file, `.` for a bare file name.
    pub fn log_dir(&self) -> &Path {
        self.log_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    pub fn validate(&self) -> Result<()> {
        if self.log_file.as_os_str().is_empty() {
            return Err(SortLogError::Configuration(
                "sort log file path must not be empty".to_string(),
            ));
        }
        if self.log_file.file_name().is_none() || self.log_file.is_dir() {
            return Err(SortLogError::Configuration(format!(
                "sort log file path {:?} does not name a file",
                self.log_file
            )));
        }
        Ok(())
    }
}

// an enum used to configure the log rolling policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "build-binary", derive(clap::ValueEnum))]
pub enum LogRotationPolicy {
    Minutely,
    Hourly,
    Daily,
    #[default]
    Never,
}

#[cfg(feature = "build-binary")]
impl std::str::FromStr for LogRotationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        clap::ValueEnum::from_str(s, true)
    }
}

#[cfg(not(feature = "build-binary"))]
impl std::str::FromStr for LogRotationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minutely" => Ok(Self::Minutely),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "unknown log rotation policy '{other}', expected one of: minutely, hourly, daily, never"
            )),
        }
    }
}

impl Display for LogRotationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogRotationPolicy::Minutely => f.write_str("minutely"),
            LogRotationPolicy::Hourly => f.write_str("hourly"),
            LogRotationPolicy::Daily => f.write_str("daily"),
            LogRotationPolicy::Never => f.write_str("never"),
        }
    }
}

/// Command line options of the `sortlog` binary
#[cfg(feature = "build-binary")]
#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[arg(short = 'i', long, help = "CSV file (with header) to sort")]
    pub input: String,
    #[arg(
        short = 'c',
        long = "sort-column",
        help = "Column to sort by, may be repeated. Default: every column in order"
    )]
    pub sort_columns: Vec<String>,
    #[arg(long, default_value_t = false, help = "Sort in descending order")]
    pub descending: bool,
    #[arg(
        long,
        help = "Sort log file. Overrides SORTLOG_LOG_FILE. Default: sorts.txt"
    )]
    pub log_file: Option<String>,
    #[arg(
        long,
        help = "Query number recorded with every sort. Overrides SORTLOG_QUERY_NUMBER"
    )]
    pub query_number: Option<String>,
    #[arg(
        long,
        default_value_t = false,
        help = "Append to an existing sort log instead of truncating it"
    )]
    pub no_truncate: bool,
    #[arg(
        long,
        help = "Sort log rotation policy, possible values: minutely, hourly, daily, never. Default: never"
    )]
    pub log_rotation_policy: Option<LogRotationPolicy>,
    #[arg(
        long,
        default_value_t = String::from("INFO"),
        help = "Process log filter, RUST_LOG takes precedence. For example INFO,datafusion=DEBUG"
    )]
    pub log_level_setting: String,
}

#[cfg(feature = "build-binary")]
impl Config {
    /// Applies command line overrides on top of an already resolved configuration.
    pub fn apply(&self, mut config: SortLogConfig) -> SortLogConfig {
        if let Some(log_file) = &self.log_file {
            config.log_file = PathBuf::from(log_file);
        }
        if let Some(query_number) = &self.query_number {
            config.query_tag = Some(query_number.clone());
        }
        if self.no_truncate {
            config.truncate = false;
        }
        if let Some(rotation) = self.log_rotation_policy {
            config.rotation = rotation;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = SortLogConfig::default();
        assert_eq!(config.log_file, PathBuf::from("sorts.txt"));
        assert_eq!(config.query_tag, None);
        assert!(config.truncate);
        assert_eq!(config.rotation, LogRotationPolicy::Never);
        assert_eq!(config.log_dir(), Path::new("."));
    }

    #[test]
    fn unset_environment_keeps_defaults() {
        let config = SortLogConfig::from_lookup(lookup(&[]));
        assert_eq!(config, SortLogConfig::default());
    }

    #[test]
    fn environment_overrides_path_and_tag() {
        let config = SortLogConfig::from_lookup(lookup(&[
            (SORTLOG_LOG_FILE, "/var/log/sorts/q.log"),
            (SORTLOG_QUERY_NUMBER, "42"),
        ]));
        assert_eq!(config.log_file, PathBuf::from("/var/log/sorts/q.log"));
        assert_eq!(config.log_dir(), Path::new("/var/log/sorts"));
        assert_eq!(config.query_tag.as_deref(), Some("42"));
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let config = SortLogConfig::from_lookup(lookup(&[
            (SORTLOG_LOG_FILE, ""),
            (SORTLOG_QUERY_NUMBER, "  "),
        ]));
        assert_eq!(config, SortLogConfig::default());
    }

    #[test]
    fn validate_rejects_empty_path() {
        let config = SortLogConfig::default().with_log_file("");
        assert!(matches!(
            config.validate(),
            Err(SortLogError::Configuration(_))
        ));
    }

    #[test]
    fn validate_rejects_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = SortLogConfig::default().with_log_file(dir.path());
        assert!(config.validate().is_err());
        let config = SortLogConfig::default().with_log_file(dir.path().join("s.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rotation_policy_parsing() {
        assert_eq!(
            "Daily".parse::<LogRotationPolicy>(),
            Ok(LogRotationPolicy::Daily)
        );
        assert_eq!(
            "never".parse::<LogRotationPolicy>(),
            Ok(LogRotationPolicy::Never)
        );
        assert!("weekly".parse::<LogRotationPolicy>().is_err());
        assert_eq!(LogRotationPolicy::Hourly.to_string(), "hourly");
    }

    #[cfg(feature = "build-binary")]
    fn resolved() -> SortLogConfig {
        SortLogConfig::from_lookup(lookup(&[
            (SORTLOG_LOG_FILE, "/env/sorts.txt"),
            (SORTLOG_QUERY_NUMBER, "7"),
        ]))
    }

    #[cfg(feature = "build-binary")]
    #[test]
    fn command_line_overrides_environment() {
        use clap::Parser;

        let opt = Config::try_parse_from([
            "sortlog",
            "--input",
            "data.csv",
            "--log-file",
            "/cli/sorts.txt",
            "--query-number",
            "99",
            "--no-truncate",
            "--log-rotation-policy",
            "daily",
        ])
        .unwrap();
        let config = opt.apply(resolved());

        assert_eq!(config.log_file, PathBuf::from("/cli/sorts.txt"));
        assert_eq!(config.query_tag.as_deref(), Some("99"));
        assert!(!config.truncate);
        assert_eq!(config.rotation, LogRotationPolicy::Daily);
    }

    #[cfg(feature = "build-binary")]
    #[test]
    fn absent_flags_keep_environment() {
        use clap::Parser;

        let opt = Config::try_parse_from(["sortlog", "--input", "data.csv"]).unwrap();
        assert_eq!(opt.apply(resolved()), resolved());
    }
}
