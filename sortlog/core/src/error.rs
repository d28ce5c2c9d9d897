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

//! Sortlog error types

use std::{
    error::Error,
    fmt::{Display, Formatter},
    io, result,
};

use datafusion::arrow::error::ArrowError;
use datafusion::error::DataFusionError;
use tracing_appender::rolling::InitError;

/// Result type alias for sortlog operations.
pub type Result<T> = result::Result<T, SortLogError>;

/// Errors raised while configuring sort logging or sorting tables.
#[derive(Debug)]
pub enum SortLogError {
    /// General error with a descriptive message.
    General(String),
    /// Configuration error with invalid settings.
    Configuration(String),
    /// Error from Arrow operations.
    ArrowError(Box<ArrowError>),
    /// Error from DataFusion operations.
    DataFusionError(Box<DataFusionError>),
    /// I/O operation error.
    IoError(io::Error),
}

impl From<ArrowError> for SortLogError {
    fn from(e: ArrowError) -> Self {
        match e {
            ArrowError::IoError(_, e) => SortLogError::IoError(e),
            other => SortLogError::ArrowError(Box::new(other)),
        }
    }
}

impl From<DataFusionError> for SortLogError {
    fn from(e: DataFusionError) -> Self {
        match e {
            DataFusionError::ArrowError(e, _) => Self::from(e),
            DataFusionError::IoError(e) => SortLogError::IoError(e),
            _ => SortLogError::DataFusionError(Box::new(e)),
        }
    }
}

impl From<io::Error> for SortLogError {
    fn from(e: io::Error) -> Self {
        SortLogError::IoError(e)
    }
}

impl From<InitError> for SortLogError {
    fn from(e: InitError) -> Self {
        SortLogError::General(format!("failed to create log appender: {e}"))
    }
}

impl Display for SortLogError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            SortLogError::General(desc) => write!(f, "General error: {desc}"),
            SortLogError::Configuration(desc) => {
                write!(f, "Configuration error: {desc}")
            }
            SortLogError::ArrowError(desc) => write!(f, "Arrow error: {desc}"),
            SortLogError::DataFusionError(desc) => {
                write!(f, "DataFusion error: {desc}")
            }
            SortLogError::IoError(desc) => write!(f, "IO error: {desc}"),
        }
    }
}

impl Error for SortLogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SortLogError::ArrowError(e) => Some(e.as_ref()),
            SortLogError::DataFusionError(e) => Some(e.as_ref()),
            SortLogError::IoError(e) => Some(e),
            _ => None,
        }
    }
}
