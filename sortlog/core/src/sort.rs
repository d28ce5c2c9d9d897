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

//! Sort entry points instrumented with the sort logger.

use datafusion::arrow::compute::{
    concat_batches, lexsort_to_indices, take_record_batch, SortColumn, SortOptions,
};
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::{Result, SortLogError};
use crate::logger::SortLogger;

/// One sort key: a column index and its ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub descending: bool,
    pub nulls_first: bool,
}

impl SortKey {
    pub fn ascending(column: usize) -> Self {
        Self {
            column,
            descending: false,
            nulls_first: true,
        }
    }

    pub fn descending(column: usize) -> Self {
        Self {
            column,
            descending: true,
            nulls_first: false,
        }
    }

    fn options(&self) -> SortOptions {
        SortOptions {
            descending: self.descending,
            nulls_first: self.nulls_first,
        }
    }
}

/// Sorts `batch` by `keys`, every column ascending when `keys` is empty.
///
/// The sort is bracketed by [`SortLogger::log_sort`].
pub fn sort_batch(
    logger: &SortLogger,
    batch: &RecordBatch,
    keys: &[SortKey],
) -> Result<RecordBatch> {
    let _range = logger.log_sort(batch);

    let keys: Vec<SortKey> = if keys.is_empty() {
        (0..batch.num_columns()).map(SortKey::ascending).collect()
    } else {
        keys.to_vec()
    };
    if keys.is_empty() {
        return Ok(batch.clone());
    }

    let sort_columns = keys
        .iter()
        .map(|key| {
            let values = batch.columns().get(key.column).cloned().ok_or_else(|| {
                SortLogError::General(format!(
                    "sort column {} out of range for a batch with {} columns",
                    key.column,
                    batch.num_columns()
                ))
            })?;
            Ok(SortColumn {
                values,
                options: Some(key.options()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Sorting {} rows by {} key column(s)",
        batch.num_rows(),
        sort_columns.len()
    );
    let indices = lexsort_to_indices(&sort_columns, None)?;
    Ok(take_record_batch(batch, &indices)?)
}

/// Concatenates `batches` and sorts the result with [`sort_batch`].
pub fn sort_batches(
    logger: &SortLogger,
    schema: &SchemaRef,
    batches: &[RecordBatch],
    keys: &[SortKey],
) -> Result<RecordBatch> {
    let batch = concat_batches(schema, batches)?;
    sort_batch(logger, &batch, keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortLogConfig;
    use crate::sink::MemorySink;
    use datafusion::arrow::array::{Array, Int32Array, StringArray};
    use datafusion::arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn logger() -> (SortLogger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (
            SortLogger::with_sink(SortLogConfig::default(), sink.clone()),
            sink,
        )
    }

    fn int_values(batch: &RecordBatch, column: usize) -> Vec<Option<i32>> {
        batch
            .column(column)
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap()
            .iter()
            .collect()
    }

    #[test]
    fn sorts_single_column_and_logs() -> Result<()> {
        let (logger, sink) = logger();
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int32, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int32Array::from(vec![3, 1, 2]))])?;

        let sorted = sort_batch(&logger, &batch, &[])?;
        assert_eq!(int_values(&sorted, 0), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(sink.len(), 1);

        let sorted = sort_batch(&logger, &batch, &[SortKey::descending(0)])?;
        assert_eq!(int_values(&sorted, 0), vec![Some(3), Some(2), Some(1)]);
        assert_eq!(sink.len(), 2);
        Ok(())
    }

    #[test]
    fn sorts_multiple_columns_without_logging() -> Result<()> {
        let (logger, sink) = logger();
        let schema = Arc::new(Schema::new(vec![
            Field::new("k", DataType::Utf8, false),
            Field::new("v", DataType::Int32, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["b", "a", "b", "a"])),
                Arc::new(Int32Array::from(vec![Some(1), Some(4), None, Some(2)])),
            ],
        )?;

        let sorted = sort_batch(
            &logger,
            &batch,
            &[SortKey::ascending(0), SortKey::descending(1)],
        )?;
        assert_eq!(int_values(&sorted, 1), vec![Some(4), Some(2), Some(1), None]);
        assert!(sink.is_empty());
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_key() {
        let (logger, _) = logger();
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int32, false)]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(Int32Array::from(vec![1]))]).unwrap();
        let err = sort_batch(&logger, &batch, &[SortKey::ascending(3)]).unwrap_err();
        assert!(matches!(err, SortLogError::General(_)));
    }

    #[test]
    fn concatenates_before_sorting() -> Result<()> {
        let (logger, sink) = logger();
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int32, false)]));
        let batches = vec![
            RecordBatch::try_new(schema.clone(), vec![Arc::new(Int32Array::from(vec![9, 4]))])?,
            RecordBatch::try_new(schema.clone(), vec![Arc::new(Int32Array::from(vec![7]))])?,
        ];

        let sorted = sort_batches(&logger, &schema, &batches, &[])?;
        assert_eq!(sorted.num_rows(), 3);
        assert_eq!(int_values(&sorted, 0), vec![Some(4), Some(7), Some(9)]);
        assert_eq!(
            sink.messages(),
            vec!["single column sort without nulls. Size: 3 type: int32"]
        );

        let empty = sort_batches(&logger, &schema, &[], &[])?;
        assert_eq!(empty.num_rows(), 0);
        assert_eq!(empty.column(0).len(), 0);
        assert_eq!(
            sink.messages().last().map(String::as_str),
            Some("single column sort without nulls. Size: 0 type: int32")
        );
        Ok(())
    }
}
