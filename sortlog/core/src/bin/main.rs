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

//! Sortlog binary: sorts a CSV file and records single column sorts.

use std::{env, io, sync::Arc};

use clap::Parser;
use datafusion::prelude::{CsvReadOptions, SessionContext};
use sortlog::config::Config;
use sortlog::error::{Result, SortLogError};
use sortlog::{sort_batches, SortKey, SortLogConfig, SortLogger};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(inner())
}

async fn inner() -> Result<()> {
    // parse options
    let opt = Config::parse();

    let rust_log = env::var(EnvFilter::DEFAULT_ENV);
    let log_filter = EnvFilter::new(rust_log.unwrap_or(opt.log_level_setting.clone()));
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(io::stderr)
        .with_env_filter(log_filter)
        .init();

    // environment first, command line overrides
    let config = opt.apply(SortLogConfig::from_env());
    let logger = SortLogger::new(config);
    logger.try_init()?;

    let ctx = SessionContext::new();
    let df = ctx.read_csv(opt.input.as_str(), CsvReadOptions::new()).await?;
    let schema = Arc::clone(df.schema().inner());
    let batches = df.collect().await?;

    let keys = opt
        .sort_columns
        .iter()
        .map(|name| {
            let column = schema.index_of(name).map_err(|_| {
                SortLogError::Configuration(format!(
                    "sort column '{name}' not found in {}",
                    opt.input
                ))
            })?;
            Ok(if opt.descending {
                SortKey::descending(column)
            } else {
                SortKey::ascending(column)
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let keys = if keys.is_empty() && opt.descending {
        (0..schema.fields().len()).map(SortKey::descending).collect()
    } else {
        keys
    };

    let sorted = sort_batches(&logger, &schema, &batches, &keys)?;
    println!(
        "sorted {} rows, sort path: {}",
        sorted.num_rows(),
        SortLogger::classify(&sorted)
    );

    Ok(())
}
