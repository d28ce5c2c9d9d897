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

//! Sort-path classification and logging.

use std::fmt::Display;
use std::sync::{Arc, OnceLock};

use log::warn;
use parking_lot::Mutex;

use crate::config::SortLogConfig;
use crate::error::Result;
use crate::range::{ProcessRange, Rgb};
use crate::sink::{FileSink, LogSink, NullSink};
use crate::table::TableView;
use crate::type_name::type_name;

/// Label of the range opened around single column sorts.
pub const SINGLE_COLUMN_SORT: &str = "single_column_sort";
/// Color of the range opened around single column sorts (hot pink).
pub const SINGLE_COLUMN_SORT_COLOR: Rgb = Rgb::new(255, 105, 180);

/// How a sort input was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPath {
    /// Exactly one column and no null values.
    SingleColumnNoNulls,
    /// Anything else, including tables without columns.
    Other,
}

impl Display for SortPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortPath::SingleColumnNoNulls => f.write_str("single column without nulls"),
            SortPath::Other => f.write_str("other"),
        }
    }
}

/// Records which sorts take the single column, null free path.
///
/// The sink is opened on the first call to [`SortLogger::log_sort`] and kept
/// for the lifetime of the logger; share one logger (e.g. behind an `Arc`)
/// for the whole process.
pub struct SortLogger {
    config: SortLogConfig,
    sink: OnceLock<Arc<dyn LogSink>>,
    // held while opening so the file is opened (and truncated) once
    open_lock: Mutex<()>,
}

impl std::fmt::Debug for SortLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortLogger")
            .field("config", &self.config)
            .field("initialized", &self.sink.get().is_some())
            .finish()
    }
}

impl SortLogger {
    /// Creates a logger writing to the file named by `config`.
    pub fn new(config: SortLogConfig) -> Self {
        Self {
            config,
            sink: OnceLock::new(),
            open_lock: Mutex::new(()),
        }
    }

    /// Creates a logger writing to `sink` instead of a file.
    pub fn with_sink(config: SortLogConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            config,
            sink: OnceLock::from(sink),
            open_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SortLogConfig {
        &self.config
    }

    /// Whether the sink has been opened.
    pub fn is_initialized(&self) -> bool {
        self.sink.get().is_some()
    }

    /// Opens the sink now, returning the error instead of falling back to a
    /// disabled sink.
    pub fn try_init(&self) -> Result<()> {
        if self.sink.get().is_some() {
            return Ok(());
        }
        let _guard = self.open_lock.lock();
        if self.sink.get().is_none() {
            let sink = FileSink::open(&self.config)?;
            // only set while holding the open lock, cannot already be set
            let _ = self.sink.set(Arc::new(sink));
        }
        Ok(())
    }

    fn sink(&self) -> &dyn LogSink {
        if let Some(sink) = self.sink.get() {
            return sink.as_ref();
        }
        let _guard = self.open_lock.lock();
        self.sink
            .get_or_init(|| match FileSink::open(&self.config) {
                Ok(sink) => Arc::new(sink),
                Err(e) => {
                    warn!(
                        "Unable to open sort log {:?}, sort records are discarded: {e}",
                        self.config.log_file
                    );
                    Arc::new(NullSink)
                }
            })
            .as_ref()
    }

    pub fn classify<T: TableView + ?Sized>(table: &T) -> SortPath {
        if table.num_columns() == 1 && !table.column_has_nulls(0) {
            SortPath::SingleColumnNoNulls
        } else {
            SortPath::Other
        }
    }

    fn describe<T: TableView + ?Sized>(&self, table: &T) -> String {
        let mut msg = format!(
            "single column sort without nulls. Size: {} type: {}",
            table.num_rows(),
            type_name(table.column_type(0))
        );
        if let Some(tag) = &self.config.query_tag {
            msg.push_str(" query: ");
            msg.push_str(tag);
        }
        msg
    }

    /// Logs `table` if it is a single column without nulls and returns the
    /// range to hold for the duration of the sort. Returns `None`, and logs
    /// nothing, for every other input.
    pub fn log_sort<T: TableView + ?Sized>(&self, table: &T) -> Option<ProcessRange> {
        let sink = self.sink();
        match Self::classify(table) {
            SortPath::SingleColumnNoNulls => {
                sink.info(&self.describe(table));
                Some(ProcessRange::new(SINGLE_COLUMN_SORT, SINGLE_COLUMN_SORT_COLOR))
            }
            SortPath::Other => None,
        }
    }

    /// Alias of [`SortLogger::log_sort`].
    pub fn classify_and_log<T: TableView + ?Sized>(
        &self,
        table: &T,
    ) -> Option<ProcessRange> {
        self.log_sort(table)
    }
}
