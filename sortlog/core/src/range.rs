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

//! Profiling ranges bracketing sort work.
//!
//! A [`ProcessRange`] enters a `tracing` span when created and exits it when
//! dropped, so any span-aware subscriber (flame graphs, OpenTelemetry, ...)
//! sees the sort as one timed region.

use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use tracing::span::EnteredSpan;

/// Color tag attached to a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// `#rrggbb` rendering of the color.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex())
    }
}

/// An open profiling range. The range closes when the value is dropped.
#[derive(Debug)]
#[must_use = "the range closes as soon as it is dropped"]
pub struct ProcessRange {
    name: &'static str,
    color: Rgb,
    start: Instant,
    _span: EnteredSpan,
}

impl ProcessRange {
    pub fn new(name: &'static str, color: Rgb) -> Self {
        let span = tracing::info_span!("process_range", name, color = %color).entered();
        Self {
            name,
            color,
            start: Instant::now(),
            _span: span,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Time since the range was opened.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ProcessRange {
    fn drop(&mut self) {
        tracing::debug!(
            name = self.name,
            elapsed_us = self.start.elapsed().as_micros() as u64,
            "process range closed"
        );
    }
}
