//  Copyright 2024 ycsb-core contributors
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//  http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read as _;

use anyhow::Result;
use parking_lot::RwLock;

use crate::db::{Db, Status};
use crate::utils::Value;

type Row = HashMap<String, String>;

/// Reference `Db` implementation: an in-memory, per-table `BTreeMap<String, Row>`.
///
/// Exists so the harness is runnable and testable without a real backing
/// store; it implements every operation faithfully (including ordered scans)
/// rather than stubbing them out.
#[derive(Debug, Default)]
pub struct BasicDb {
    tables: RwLock<HashMap<String, BTreeMap<String, Row>>>,
}

impl BasicDb {
    /// Create an empty in-memory database.
    pub fn new() -> Self {
        Self::default()
    }
}

fn materialize(values: HashMap<String, Value>) -> Result<Row> {
    let mut row = Row::with_capacity(values.len());
    for (field, mut value) in values {
        let mut buf = Vec::new();
        value.read_to_end(&mut buf)?;
        row.insert(field, String::from_utf8(buf)?);
    }
    Ok(row)
}

fn project(row: &Row, fields: &HashSet<String>) -> HashMap<String, Value> {
    row.iter()
        .filter(|(field, _)| fields.is_empty() || fields.contains(*field))
        .map(|(field, value)| (field.clone(), Value::from(value.clone())))
        .collect()
}

impl Db for BasicDb {
    type Config = ();

    fn init(&self) -> Result<()> {
        Ok(())
    }

    fn cleanup(&self) -> Result<()> {
        Ok(())
    }

    fn insert(&self, table: String, key: String, values: HashMap<String, Value>) -> Result<Status> {
        let row = materialize(values)?;
        self.tables.write().entry(table).or_default().insert(key, row);
        Ok(Status::Ok)
    }

    fn read(
        &self,
        table: String,
        key: String,
        fields: HashSet<String>,
    ) -> Result<(Status, HashMap<String, Value>)> {
        let tables = self.tables.read();
        let Some(row) = tables.get(&table).and_then(|t| t.get(&key)) else {
            return Ok((Status::NotFound, HashMap::new()));
        };
        Ok((Status::Ok, project(row, &fields)))
    }

    fn update(&self, table: String, key: String, values: HashMap<String, Value>) -> Result<Status> {
        let row = materialize(values)?;
        let mut tables = self.tables.write();
        let Some(existing) = tables.get_mut(&table).and_then(|t| t.get_mut(&key)) else {
            return Ok(Status::NotFound);
        };
        existing.extend(row);
        Ok(Status::Ok)
    }

    fn scan(
        &self,
        table: String,
        start_key: String,
        len: usize,
        fields: HashSet<String>,
    ) -> Result<(Status, Vec<HashMap<String, Value>>)> {
        let tables = self.tables.read();
        let Some(t) = tables.get(&table) else {
            return Ok((Status::NotFound, Vec::new()));
        };
        let rows = t
            .range(start_key..)
            .take(len)
            .map(|(_, row)| project(row, &fields))
            .collect();
        Ok((Status::Ok, rows))
    }

    fn delete(&self, table: String, key: String) -> Result<Status> {
        let mut tables = self.tables.write();
        match tables.get_mut(&table).and_then(|t| t.remove(&key)) {
            Some(_) => Ok(Status::Ok),
            None => Ok(Status::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_after_insert_returns_ok() {
        let db = BasicDb::new();
        let mut values = HashMap::new();
        values.insert("field0".to_string(), Value::from("hello".to_string()));
        db.insert("t".to_string(), "k1".to_string(), values).unwrap();

        let (status, cells) = db.read("t".to_string(), "k1".to_string(), HashSet::new()).unwrap();
        assert_eq!(status, Status::Ok);
        let mut value = cells.get("field0").unwrap().clone();
        let mut got = Vec::new();
        value.read_to_end(&mut got).unwrap();
        assert_eq!(got, b"hello");
    }

    #[test]
    fn read_missing_key_is_not_found() {
        let db = BasicDb::new();
        let (status, cells) = db.read("t".to_string(), "missing".to_string(), HashSet::new()).unwrap();
        assert_eq!(status, Status::NotFound);
        assert!(cells.is_empty());
    }

    #[test]
    fn scan_returns_rows_in_key_order() {
        let db = BasicDb::new();
        for k in ["a", "c", "b"] {
            let mut values = HashMap::new();
            values.insert("field0".to_string(), Value::from(k.to_string()));
            db.insert("t".to_string(), k.to_string(), values).unwrap();
        }
        let (status, rows) = db.scan("t".to_string(), "a".to_string(), 2, HashSet::new()).unwrap();
        assert_eq!(status, Status::Ok);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn delete_then_read_is_not_found() {
        let db = BasicDb::new();
        let mut values = HashMap::new();
        values.insert("field0".to_string(), Value::from("x".to_string()));
        db.insert("t".to_string(), "k".to_string(), values).unwrap();
        assert_eq!(db.delete("t".to_string(), "k".to_string()).unwrap(), Status::Ok);
        let (status, _) = db.read("t".to_string(), "k".to_string(), HashSet::new()).unwrap();
        assert_eq!(status, Status::NotFound);
    }
}
