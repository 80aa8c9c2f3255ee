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

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use parking_lot::Mutex;

use crate::measurement::Registry;
use crate::utils::Value;

/// Outcome of a single database operation.
///
/// Non-exceptional outcomes (a missing key, an adapter that hasn't
/// implemented an operation) are modeled as a `Status`, not an `Err`:
/// `anyhow::Error` is reserved for failures that should abort the worker
/// running the operation, not ones the workload expects to see routinely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The operation completed as expected.
    Ok,
    /// The requested key does not exist.
    NotFound,
    /// The adapter does not implement this operation.
    NotImplemented,
    /// The operation failed in a way the adapter could classify.
    Error,
    /// The adapter returned something the workload did not expect to see.
    UnexpectedState,
}

impl Status {
    /// Whether this status should count as a success for measurement purposes.
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

/// One recorded event in a database's internal trace, if it collects one.
///
/// `parent_id` points at the enclosing event by id rather than holding a
/// reference to it, so a trace buffer can be built, drained and serialized
/// without describing a cycle.
#[derive(Debug, Clone)]
pub struct TraceRecord {
    /// Identifier of this event, unique within the trace buffer that produced it.
    pub id: u64,
    /// Identifier of the enclosing event, or `0` for a top-level event.
    pub parent_id: u64,
    /// Name of the operation this event records (e.g. `"READ"`, `"SCAN"`).
    pub op: String,
    /// Key the event was recorded against.
    pub key: String,
    /// Wall-clock duration of the event, in microseconds.
    pub duration_micros: u64,
}

/// A layer for accessing a database to be benchmarked. Each thread in the client
/// will be given its own instance of whatever DB class is to be used in the test.
/// This class should be constructed using a no-argument constructor, so we can
/// load it dynamically. Any argument-based initialization should be
/// done by init().
///
/// The semantics of methods such as insert, update and delete vary from database
/// to database. In particular, operations may or may not be durable once these
/// methods commit, and some systems may return 'success' regardless of whether
/// or not a tuple with a matching key existed before the call. Rather than dictate
/// the exact semantics of these methods, we recommend you either implement them
/// to match the database's default semantics, or the semantics of your
/// target application.
pub trait Db {
    /// Configuration type for db.
    type Config;

    /// Initialize any state for this DB.
    /// Called once per DB instance; there is one DB instance per client thread.
    fn init(&self) -> Result<()>;

    /// Cleanup any state for this DB.
    /// Called once per DB instance; there is one DB instance per client thread.
    fn cleanup(&self) -> Result<()>;

    /// Insert a record in the database. Any field/value pairs in the specified values HashMap will be written into the
    /// record with the specified record key.
    ///
    /// * `table` - The name of the table
    /// * `key` - The record key of the record to insert.
    /// * `values` - A HashMap of field/value pairs to insert in the record
    fn insert(&self, table: String, key: String, values: HashMap<String, Value>) -> Result<Status>;

    /// Read a record from the database. Each field/value pair from the result will be stored in a HashMap.
    ///
    /// * `table` - The name of the table
    /// * `key` - The record key of the record to read.
    /// * `fields` - The set of fields to read, or empty for all of them
    fn read(
        &self,
        table: String,
        key: String,
        fields: HashSet<String>,
    ) -> Result<(Status, HashMap<String, Value>)>;

    /// Update a record in the database. Any field/value pairs in the specified values HashMap will be written into the
    /// record with the specified record key, overwriting any existing values with the same field name.
    ///
    /// * `table` - The name of the table
    /// * `key` - The record key of the record to write.
    /// * `values` - A HashMap of field/value pairs to update in the record
    fn update(&self, table: String, key: String, values: HashMap<String, Value>) -> Result<Status>;

    /// Perform a range scan for a set of records in the database. Each record in the result is a
    /// HashMap of its field/value pairs, in key order starting at `start_key`.
    ///
    /// * `table` - The name of the table
    /// * `start_key` - The record key of the first record to read.
    /// * `len` - The number of records to read
    /// * `fields` - The set of fields to read, or empty for all of them
    fn scan(
        &self,
        table: String,
        start_key: String,
        len: usize,
        fields: HashSet<String>,
    ) -> Result<(Status, Vec<HashMap<String, Value>>)>;

    /// Delete a record from the database.
    ///
    /// * `table` - The name of the table
    /// * `key` - The record key of the record to delete.
    fn delete(&self, table: String, key: String) -> Result<Status>;

    /// Drain this instance's internal operation trace, if it keeps one.
    ///
    /// Most adapters don't collect traces; the default is an empty buffer.
    fn traces(&self) -> Vec<TraceRecord> {
        Vec::new()
    }
}

macro_rules! impl_db_for_deref {
    ($ptr:ident) => {
        impl<T: Db + ?Sized> Db for $ptr<T> {
            type Config = T::Config;

            fn init(&self) -> Result<()> {
                (**self).init()
            }

            fn cleanup(&self) -> Result<()> {
                (**self).cleanup()
            }

            fn insert(
                &self,
                table: String,
                key: String,
                values: HashMap<String, Value>,
            ) -> Result<Status> {
                (**self).insert(table, key, values)
            }

            fn read(
                &self,
                table: String,
                key: String,
                fields: HashSet<String>,
            ) -> Result<(Status, HashMap<String, Value>)> {
                (**self).read(table, key, fields)
            }

            fn update(
                &self,
                table: String,
                key: String,
                values: HashMap<String, Value>,
            ) -> Result<Status> {
                (**self).update(table, key, values)
            }

            fn scan(
                &self,
                table: String,
                start_key: String,
                len: usize,
                fields: HashSet<String>,
            ) -> Result<(Status, Vec<HashMap<String, Value>>)> {
                (**self).scan(table, start_key, len, fields)
            }

            fn delete(&self, table: String, key: String) -> Result<Status> {
                (**self).delete(table, key)
            }

            fn traces(&self) -> Vec<TraceRecord> {
                (**self).traces()
            }
        }
    };
}

impl_db_for_deref!(Box);
impl_db_for_deref!(Arc);

/// Wraps a [`Db`] to record every call's latency into a shared [`Registry`].
///
/// The intended start time (when the throttle, not the database, meant for
/// the call to begin) is set explicitly by the worker via
/// [`Measured::set_intended_start`] right before it drives one workload
/// operation, rather than read from a process-wide thread-local — a
/// `Measured` lives on exactly one worker thread for its whole life, so this
/// is ordinary owned state, not hidden global state.
///
/// Two series are recorded per successful call: `<OP>` (actual latency) and
/// `Intended-<OP>` (latency including any throttle-induced wait). A call
/// that returns a non-`Ok` `Status`, or errors outright, is recorded under
/// `<OP>-FAILED` instead, and its return code is tallied in
/// [`Measured::return_codes`].
pub struct Measured<D> {
    inner: D,
    registry: Arc<Registry>,
    return_codes: Mutex<HashMap<String, HashMap<Status, u64>>>,
    intended_start: Cell<Instant>,
}

impl<D: Db> Measured<D> {
    /// Wrap `inner`, recording into `registry`.
    pub fn new(inner: D, registry: Arc<Registry>) -> Self {
        Self {
            inner,
            registry,
            return_codes: Mutex::new(HashMap::new()),
            intended_start: Cell::new(Instant::now()),
        }
    }

    /// The wrapped database.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Record when the worker's throttle meant the next operation to begin.
    ///
    /// The worker calls this once per loop iteration, immediately before
    /// driving the workload through the [`Db`] impl below.
    pub fn set_intended_start(&self, intended_start: Instant) {
        self.intended_start.set(intended_start);
    }

    /// Tally of return codes seen per operation name so far.
    pub fn return_codes(&self) -> HashMap<String, HashMap<Status, u64>> {
        self.return_codes.lock().clone()
    }

    /// Run `f`, timing and recording it under `op`.
    ///
    /// `intended_start` is when the throttle scheduled this call to begin;
    /// `Instant::now()` at entry is when it actually began.
    fn call<F>(&self, op: &str, intended_start: Instant, f: F) -> Result<Status>
    where
        F: FnOnce() -> Result<Status>,
    {
        let actual_start = Instant::now();
        let result = f();
        let end = Instant::now();

        let actual_micros = end.saturating_duration_since(actual_start).as_micros() as u64;
        let intended_micros = end.saturating_duration_since(intended_start).as_micros() as u64;

        match &result {
            Ok(status) if status.is_ok() => {
                self.registry.record(op, actual_micros);
                self.registry
                    .record(&format!("Intended-{op}"), intended_micros);
            }
            _ => {
                self.registry
                    .record(&format!("{op}-FAILED"), actual_micros);
            }
        }

        if let Ok(status) = &result {
            let mut codes = self.return_codes.lock();
            *codes.entry(op.to_string()).or_default().entry(*status).or_insert(0) += 1;
        }

        result
    }

    /// Timed [`Db::insert`].
    pub fn insert(
        &self,
        intended_start: Instant,
        table: String,
        key: String,
        values: HashMap<String, Value>,
    ) -> Result<Status> {
        self.call("INSERT", intended_start, || {
            self.inner.insert(table, key, values)
        })
    }

    /// Timed [`Db::read`].
    pub fn read(
        &self,
        intended_start: Instant,
        table: String,
        key: String,
        fields: HashSet<String>,
    ) -> Result<(Status, HashMap<String, Value>)> {
        let cells = Mutex::new(HashMap::new());
        let status = self.call("READ", intended_start, || {
            let (status, read_cells) = self.inner.read(table, key, fields)?;
            *cells.lock() = read_cells;
            Ok(status)
        })?;
        Ok((status, cells.into_inner()))
    }

    /// Timed [`Db::update`].
    pub fn update(
        &self,
        intended_start: Instant,
        table: String,
        key: String,
        values: HashMap<String, Value>,
    ) -> Result<Status> {
        self.call("UPDATE", intended_start, || {
            self.inner.update(table, key, values)
        })
    }

    /// Timed [`Db::scan`].
    pub fn scan(
        &self,
        intended_start: Instant,
        table: String,
        start_key: String,
        len: usize,
        fields: HashSet<String>,
    ) -> Result<(Status, Vec<HashMap<String, Value>>)> {
        let rows = Mutex::new(Vec::new());
        let status = self.call("SCAN", intended_start, || {
            let (status, scanned) = self.inner.scan(table, start_key, len, fields)?;
            *rows.lock() = scanned;
            Ok(status)
        })?;
        Ok((status, rows.into_inner()))
    }

    /// Timed [`Db::delete`].
    pub fn delete(&self, intended_start: Instant, table: String, key: String) -> Result<Status> {
        self.call("DELETE", intended_start, || self.inner.delete(table, key))
    }
}

impl<D: Db> Db for Measured<D> {
    type Config = D::Config;

    fn init(&self) -> Result<()> {
        self.inner.init()
    }

    fn cleanup(&self) -> Result<()> {
        self.inner.cleanup()
    }

    fn insert(&self, table: String, key: String, values: HashMap<String, Value>) -> Result<Status> {
        Measured::insert(self, self.intended_start.get(), table, key, values)
    }

    fn read(
        &self,
        table: String,
        key: String,
        fields: HashSet<String>,
    ) -> Result<(Status, HashMap<String, Value>)> {
        Measured::read(self, self.intended_start.get(), table, key, fields)
    }

    fn update(&self, table: String, key: String, values: HashMap<String, Value>) -> Result<Status> {
        Measured::update(self, self.intended_start.get(), table, key, values)
    }

    fn scan(
        &self,
        table: String,
        start_key: String,
        len: usize,
        fields: HashSet<String>,
    ) -> Result<(Status, Vec<HashMap<String, Value>>)> {
        Measured::scan(self, self.intended_start.get(), table, start_key, len, fields)
    }

    fn delete(&self, table: String, key: String) -> Result<Status> {
        Measured::delete(self, self.intended_start.get(), table, key)
    }

    fn traces(&self) -> Vec<TraceRecord> {
        self.inner.traces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementKind;

    struct AlwaysOk;

    impl Db for AlwaysOk {
        type Config = ();

        fn init(&self) -> Result<()> {
            Ok(())
        }

        fn cleanup(&self) -> Result<()> {
            Ok(())
        }

        fn insert(&self, _: String, _: String, _: HashMap<String, Value>) -> Result<Status> {
            Ok(Status::Ok)
        }

        fn read(
            &self,
            _: String,
            _: String,
            _: HashSet<String>,
        ) -> Result<(Status, HashMap<String, Value>)> {
            Ok((Status::NotFound, HashMap::new()))
        }

        fn update(&self, _: String, _: String, _: HashMap<String, Value>) -> Result<Status> {
            Ok(Status::Ok)
        }

        fn scan(
            &self,
            _: String,
            _: String,
            _: usize,
            _: HashSet<String>,
        ) -> Result<(Status, Vec<HashMap<String, Value>>)> {
            Ok((Status::Ok, Vec::new()))
        }

        fn delete(&self, _: String, _: String) -> Result<Status> {
            Ok(Status::Ok)
        }
    }

    #[test]
    fn records_successful_calls_and_return_codes() {
        let registry = Arc::new(Registry::new(MeasurementKind::Hdr));
        let measured = Measured::new(AlwaysOk, registry.clone());

        let now = Instant::now();
        measured
            .insert(now, "t".into(), "k".into(), HashMap::new())
            .unwrap();
        let (status, _) = measured
            .read(now, "t".into(), "k".into(), HashSet::new())
            .unwrap();
        assert_eq!(status, Status::NotFound);

        let summary = registry.summary(&[50.0]);
        let names: Vec<_> = summary.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"INSERT"));
        assert!(names.contains(&"Intended-INSERT"));
        assert!(names.contains(&"READ-FAILED"));

        let codes = measured.return_codes();
        assert_eq!(*codes["INSERT"].get(&Status::Ok).unwrap(), 1);
        assert_eq!(*codes["READ"].get(&Status::NotFound).unwrap(), 1);
    }

    #[test]
    fn db_trait_impl_uses_the_set_intended_start() {
        let registry = Arc::new(Registry::new(MeasurementKind::Hdr));
        let measured = Measured::new(AlwaysOk, registry.clone());
        measured.set_intended_start(Instant::now());

        let status: Status = Db::insert(&measured, "t".into(), "k".into(), HashMap::new()).unwrap();
        assert_eq!(status, Status::Ok);

        let summary = registry.summary(&[50.0]);
        assert!(summary.iter().any(|(name, _)| name == "INSERT"));
    }
}
