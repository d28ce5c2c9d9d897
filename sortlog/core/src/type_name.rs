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

//! Human readable names of column value types.

use std::borrow::Cow;

use datafusion::arrow::datatypes::{DataType, TimeUnit};

fn unit_suffix(unit: &TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Second => "s",
        TimeUnit::Millisecond => "ms",
        TimeUnit::Microsecond => "us",
        TimeUnit::Nanosecond => "ns",
    }
}

/// Returns the short name used for `data_type` in sort records.
///
/// Primitive types get fixed lower-case names, time based types carry their
/// unit, nested types are named by kind only. Anything else falls back to
/// Arrow's own rendering.
pub fn type_name(data_type: &DataType) -> Cow<'static, str> {
    let name = match data_type {
        DataType::Null => "empty",
        DataType::Boolean => "bool8",
        DataType::Int8 => "int8",
        DataType::Int16 => "int16",
        DataType::Int32 => "int32",
        DataType::Int64 => "int64",
        DataType::UInt8 => "uint8",
        DataType::UInt16 => "uint16",
        DataType::UInt32 => "uint32",
        DataType::UInt64 => "uint64",
        DataType::Float16 => "float16",
        DataType::Float32 => "float32",
        DataType::Float64 => "float64",
        DataType::Utf8 => "string",
        DataType::LargeUtf8 => "large_string",
        DataType::Utf8View => "string_view",
        DataType::Binary => "binary",
        DataType::LargeBinary => "large_binary",
        DataType::Date32 => "date32",
        DataType::Date64 => "date64",
        DataType::Decimal128(_, _) => "decimal128",
        DataType::Decimal256(_, _) => "decimal256",
        DataType::Dictionary(_, _) => "dictionary",
        DataType::List(_) | DataType::LargeList(_) | DataType::FixedSizeList(_, _) => {
            "list"
        }
        DataType::Struct(_) => "struct",
        DataType::Timestamp(unit, _) => {
            return Cow::Owned(format!("timestamp[{}]", unit_suffix(unit)))
        }
        DataType::Duration(unit) => {
            return Cow::Owned(format!("duration[{}]", unit_suffix(unit)))
        }
        DataType::Time32(unit) | DataType::Time64(unit) => {
            return Cow::Owned(format!("time[{}]", unit_suffix(unit)))
        }
        other => return Cow::Owned(other.to_string()),
    };
    Cow::Borrowed(name)
}
