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

//! Read-only view of the tabular input handed to a sort.

use datafusion::arrow::array::{Array, ArrayRef};
use datafusion::arrow::datatypes::DataType;
use datafusion::arrow::record_batch::RecordBatch;

/// Column metadata the sort logger needs from a table.
///
/// Column indexes passed to [`TableView::column_type`] and
/// [`TableView::column_has_nulls`] must be below [`TableView::num_columns`].
pub trait TableView {
    fn num_columns(&self) -> usize;

    fn num_rows(&self) -> usize;

    fn column_type(&self, i: usize) -> &DataType;

    /// Whether any slot of column `i` is null.
    fn column_has_nulls(&self, i: usize) -> bool;
}

impl TableView for RecordBatch {
    fn num_columns(&self) -> usize {
        RecordBatch::num_columns(self)
    }

    fn num_rows(&self) -> usize {
        RecordBatch::num_rows(self)
    }

    fn column_type(&self, i: usize) -> &DataType {
        self.column(i).data_type()
    }

    fn column_has_nulls(&self, i: usize) -> bool {
        self.column(i).logical_null_count() > 0
    }
}

/// A bare list of equal-length columns, as handed to Arrow's sort kernels.
impl TableView for [ArrayRef] {
    fn num_columns(&self) -> usize {
        self.len()
    }

    fn num_rows(&self) -> usize {
        self.first().map(|c| c.len()).unwrap_or(0)
    }

    fn column_type(&self, i: usize) -> &DataType {
        self[i].data_type()
    }

    fn column_has_nulls(&self, i: usize) -> bool {
        self[i].logical_null_count() > 0
    }
}
