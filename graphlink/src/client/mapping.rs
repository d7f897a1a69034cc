// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Record-mapping functions
//!
//! A [`RecordMapper`] turns one driver record into a typed result. Mapping
//! to `None` drops the record from the stream, which is how null database
//! values are skipped instead of failing the whole query.

use crate::driver::types::Record;
use crate::error::{GraphError, Result};
use crate::value::Value;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Converts one record into a typed result.
///
/// Returning `Ok(None)` drops the record from the result stream.
pub trait RecordMapper<T>: Send + Sync {
    fn map(&self, record: &Record) -> Result<Option<T>>;
}

/// Wraps a plain mapping closure; records whose mapping fails surface the
/// error, every mapped record is kept.
pub struct ClosureMapper<T, F>
where
    F: Fn(&Record) -> Result<T> + Send + Sync,
{
    func: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> ClosureMapper<T, F>
where
    F: Fn(&Record) -> Result<T> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _marker: PhantomData,
        }
    }
}

impl<T, F> RecordMapper<T> for ClosureMapper<T, F>
where
    F: Fn(&Record) -> Result<T> + Send + Sync,
{
    fn map(&self, record: &Record) -> Result<Option<T>> {
        (self.func)(record).map(Some)
    }
}

/// Maps the sole column of a record into `T` through the serde bridge.
///
/// Records with a null value are dropped; records with more than one column
/// are an error, because "the value" would be ambiguous.
pub struct SingleValueMapper<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SingleValueMapper<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SingleValueMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Send + Sync> RecordMapper<T> for SingleValueMapper<T> {
    fn map(&self, record: &Record) -> Result<Option<T>> {
        let value = record.single_value().ok_or_else(|| {
            GraphError::mapping(format!(
                "expected a record with a single column, got {}",
                record.len()
            ))
        })?;
        if value.is_null() {
            return Ok(None);
        }
        convert_value(value).map(Some)
    }
}

/// Maps a whole record into its column → value map.
pub struct ValueMapMapper;

impl RecordMapper<HashMap<String, Value>> for ValueMapMapper {
    fn map(&self, record: &Record) -> Result<Option<HashMap<String, Value>>> {
        Ok(Some(record.as_map()))
    }
}

/// Convert a single [`Value`] into `T` through the serde bridge.
pub fn convert_value<T: DeserializeOwned>(value: &Value) -> Result<T> {
    serde_json::from_value(value.to_json())
        .map_err(|e| GraphError::mapping(format!("cannot convert value '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_mapper() {
        let mapper = SingleValueMapper::<i64>::new();
        let record = Record::single("count", 42i64);
        assert_eq!(mapper.map(&record).unwrap(), Some(42));
    }

    #[test]
    fn test_single_value_mapper_drops_null() {
        let mapper = SingleValueMapper::<String>::new();
        let record = Record::single("name", Value::Null);
        assert_eq!(mapper.map(&record).unwrap(), None);
    }

    #[test]
    fn test_single_value_mapper_rejects_multiple_columns() {
        let mapper = SingleValueMapper::<i64>::new();
        let record = Record::new(
            vec!["a".to_string(), "b".to_string()],
            vec![Value::from(1i64), Value::from(2i64)],
        );
        assert!(mapper.map(&record).is_err());
    }

    #[test]
    fn test_closure_mapper_keeps_every_record() {
        let mapper = ClosureMapper::new(|record: &Record| {
            record
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| GraphError::mapping("missing name"))
        });
        let record = Record::single("name", "Alice");
        assert_eq!(mapper.map(&record).unwrap(), Some("Alice".to_string()));
    }

    #[test]
    fn test_convert_value_into_struct() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Person {
            name: String,
            age: i64,
        }

        let mut props = HashMap::new();
        props.insert("name".to_string(), Value::from("Alice"));
        props.insert("age".to_string(), Value::from(30i64));

        let person: Person = convert_value(&Value::Map(props)).unwrap();
        assert_eq!(
            person,
            Person {
                name: "Alice".to_string(),
                age: 30
            }
        );
    }
}
