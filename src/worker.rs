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

//! One worker thread: owns a handle to the run's backing store (often an
//! `Arc` shared with its siblings) and a share of the total op count, and
//! drives it through [`CoreWorkload`] at a throttled rate.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::{thread_rng, Rng};

use crate::db::{Db, Measured};
use crate::workload::CoreWorkload;

/// Which phase of the benchmark a worker is running.
///
/// Fixed at construction; a worker never transitions between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Run `CoreWorkload::insert` for the worker's whole op count.
    Load,
    /// Run `CoreWorkload::transaction` for the worker's whole op count.
    Transactions,
}

/// One worker thread's share of a run.
pub struct Worker<D> {
    id: usize,
    db: Measured<D>,
    workload: Arc<CoreWorkload>,
    stage: Stage,
    op_count: usize,
    /// `None` means unthrottled: drive as fast as the adapter allows.
    target_ops_per_ms: Option<f64>,
    stop: Arc<AtomicBool>,
    /// Shared with the status reporter, which sums every worker's count.
    ops_done: Arc<AtomicU64>,
}

impl<D: Db> Worker<D> {
    /// Create a worker. `op_count` is this worker's share of the total
    /// (`total/N`, with the first `total % N` workers getting one extra).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        db: D,
        registry: Arc<crate::measurement::Registry>,
        workload: Arc<CoreWorkload>,
        stage: Stage,
        op_count: usize,
        target_ops_per_ms: Option<f64>,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            id,
            db: Measured::new(db, registry),
            workload,
            stage,
            op_count,
            target_ops_per_ms,
            stop,
            ops_done: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared counter the status reporter reads to compute throughput.
    pub fn ops_done(&self) -> Arc<AtomicU64> {
        self.ops_done.clone()
    }

    /// Run this worker's full lifecycle: `init` -> throttled loop -> `cleanup`.
    ///
    /// An `init` or `cleanup` failure is fatal to the whole run and is
    /// returned to the caller (the orchestrator decides whether and how to
    /// tear down sibling workers). A mid-loop operation error aborts only
    /// this worker; its sibling threads are unaffected, since each already
    /// runs independently.
    pub fn run(&self) -> Result<()> {
        self.db
            .init()
            .with_context(|| format!("worker {} failed to init its db", self.id))?;

        let tick_nanos = self.target_ops_per_ms.map(|target| (1_000_000.0 / target) as u64);

        if let Some(tick) = tick_nanos {
            if self.target_ops_per_ms.unwrap() <= 1.0 && tick > 0 {
                let sub_tick = thread_rng().gen_range(0..tick);
                std::thread::sleep(Duration::from_nanos(sub_tick));
            }
        }

        let start = Instant::now();
        let mut k: u64 = 0;

        while (self.ops_done.load(Ordering::Relaxed) as usize) < self.op_count
            && !self.stop.load(Ordering::Relaxed)
        {
            let intended_start = match tick_nanos {
                Some(tick) => start + Duration::from_nanos(k * tick),
                None => Instant::now(),
            };
            self.db.set_intended_start(intended_start);

            let result = match self.stage {
                Stage::Load => self.workload.insert(&self.db),
                Stage::Transactions => self.workload.transaction(&self.db),
            };

            if let Err(e) = result {
                tracing::error!(worker = self.id, error = %e, "operation failed, aborting worker");
                break;
            }

            self.ops_done.fetch_add(1, Ordering::Relaxed);
            k += 1;

            if let Some(tick) = tick_nanos {
                let deadline = start + Duration::from_nanos(k * tick);
                let now = Instant::now();
                if deadline > now {
                    std::thread::sleep(deadline - now);
                }
            }
        }

        self.db
            .cleanup()
            .with_context(|| format!("worker {} failed to clean up its db", self.id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::AtomicUsize;

    use anyhow::Result;

    use super::*;
    use crate::config::Config;
    use crate::db::Status;
    use crate::measurement::{MeasurementKind, Registry};
    use crate::workload::{CoreWorkload, Workload};

    #[derive(Default)]
    struct CountingDb {
        inserts: AtomicUsize,
    }

    impl Db for CountingDb {
        type Config = ();

        fn init(&self) -> Result<()> {
            Ok(())
        }

        fn cleanup(&self) -> Result<()> {
            Ok(())
        }

        fn insert(&self, _: String, _: String, _: HashMap<String, Value>) -> Result<Status> {
            self.inserts.fetch_add(1, Ordering::Relaxed);
            Ok(Status::Ok)
        }

        fn read(
            &self,
            _: String,
            _: String,
            _: HashSet<String>,
        ) -> Result<(Status, HashMap<String, Value>)> {
            Ok((Status::Ok, HashMap::new()))
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

    use crate::utils::Value;

    #[test]
    fn drives_op_count_inserts_and_then_stops() {
        let config = Config::new(
            [("recordcount".to_string(), "100".to_string())]
                .into_iter()
                .collect(),
        );
        let workload = Arc::new(CoreWorkload::new(config.core_workload_config().unwrap()).unwrap());
        let registry = Arc::new(Registry::new(MeasurementKind::Hdr));
        let stop = Arc::new(AtomicBool::new(false));

        let worker = Worker::new(0, CountingDb::default(), registry, workload, Stage::Load, 25, None, stop);
        worker.run().unwrap();

        assert_eq!(worker.ops_done.load(Ordering::Relaxed), 25);
    }
}
