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

//! Destinations for sort records.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::Dispatch;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;

use crate::config::{LogRotationPolicy, SortLogConfig};
use crate::error::{Result, SortLogError};

/// Target under which sort records are emitted.
pub const SORT_LOG_TARGET: &str = "SORT";

/// Receives one formatted record per logged sort.
///
/// Implementations must tolerate concurrent calls.
pub trait LogSink: Send + Sync {
    /// Writes `message` at info severity.
    fn info(&self, message: &str);
}

/// Appends records to a file through a dedicated `tracing` subscriber.
///
/// The subscriber is never installed globally, records only reach this file.
pub struct FileSink {
    path: PathBuf,
    dispatch: Dispatch,
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink").field("path", &self.path).finish()
    }
}

impl FileSink {
    /// Opens (creating if needed) the file named by `config`.
    pub fn open(config: &SortLogConfig) -> Result<Self> {
        config.validate()?;

        let dir = config.log_dir();
        let file_name = config
            .log_file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SortLogError::Configuration(format!(
                    "sort log file name {:?} is not valid UTF-8",
                    config.log_file
                ))
            })?;
        std::fs::create_dir_all(dir)?;

        let rotation = match config.rotation {
            LogRotationPolicy::Minutely => Rotation::MINUTELY,
            LogRotationPolicy::Hourly => Rotation::HOURLY,
            LogRotationPolicy::Daily => Rotation::DAILY,
            LogRotationPolicy::Never => {
                if config.truncate {
                    OpenOptions::new()
                        .write(true)
                        .create(true)
                        .truncate(true)
                        .open(&config.log_file)?;
                }
                Rotation::NEVER
            }
        };

        let appender = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(file_name)
            .build(dir)?;

        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_target(true)
            .with_max_level(LevelFilter::INFO)
            .with_writer(appender)
            .finish();

        Ok(Self {
            path: config.log_file.clone(),
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// Configured path of the log file. Rotated files carry a date suffix.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn info(&self, message: &str) {
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::info!(target: SORT_LOG_TARGET, "{message}");
        });
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records written so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn info(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn info(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_sink_writes_record() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("sorts.txt");
        let sink = FileSink::open(&SortLogConfig::default().with_log_file(&path))?;
        assert!(path.exists());
        assert_eq!(sink.path(), path.as_path());

        sink.info("hello sort");
        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("INFO"));
        assert!(contents.contains(SORT_LOG_TARGET));
        assert!(contents.contains("hello sort"));
        Ok(())
    }

    #[test]
    fn file_sink_truncates_on_open() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sorts.txt");
        std::fs::write(&path, "stale line\n")?;

        let _sink = FileSink::open(&SortLogConfig::default().with_log_file(&path))?;
        assert_eq!(std::fs::read_to_string(&path)?, "");
        Ok(())
    }

    #[test]
    fn file_sink_appends_without_truncate() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sorts.txt");
        std::fs::write(&path, "earlier run\n")?;

        let config = SortLogConfig::default()
            .with_log_file(&path)
            .with_truncate(false);
        let sink = FileSink::open(&config)?;
        sink.info("later run");

        let contents = std::fs::read_to_string(&path)?;
        assert!(contents.starts_with("earlier run\n"));
        assert!(contents.contains("later run"));
        Ok(())
    }

    fn rotated_contents(dir: &Path) -> (Vec<String>, String) {
        let mut names = Vec::new();
        let mut contents = String::new();
        for entry in std::fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with("sorts.txt.") {
                contents.push_str(&std::fs::read_to_string(entry.path()).unwrap());
                names.push(name);
            }
        }
        (names, contents)
    }

    #[test]
    fn daily_rotation_appends_to_dated_file() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sorts.txt");
        let config = SortLogConfig::default()
            .with_log_file(&path)
            .with_rotation(LogRotationPolicy::Daily);

        let sink = FileSink::open(&config)?;
        sink.info("first run");
        drop(sink);

        // truncate is on by default but rotated files are appended to
        let sink = FileSink::open(&config)?;
        sink.info("second run");

        let (names, contents) = rotated_contents(dir.path());
        assert!(!names.is_empty());
        assert!(!path.exists());
        assert!(contents.contains("first run"));
        assert!(contents.contains("second run"));
        Ok(())
    }

    #[test]
    fn file_sink_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let config = SortLogConfig::default().with_log_file(dir.path());
        assert!(FileSink::open(&config).is_err());
    }

    #[test]
    fn memory_sink_collects() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.info("a");
        sink.info("b");
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.messages(), vec!["a".to_string(), "b".to_string()]);
    }
}
