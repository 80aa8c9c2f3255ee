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

//! Wires configuration, workload, workers, the status reporter and the
//! terminator together into one run, and produces the final [`Report`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::adapters;
use crate::config::Config;
use crate::export::{Report, Totals};
use crate::measurement::{Registry, DEFAULT_PERCENTILES};
use crate::status::{StatusReporter, Terminator};
use crate::worker::{Stage, Worker};
use crate::workload::{CoreWorkload, Workload};

/// Build the `-db`-named adapter's backing store for one run.
///
/// The store is constructed once and meant to be shared: pass the same
/// handle into two calls of [`run_with_db`] (a Load stage followed by a
/// Transactions stage) to run transactions against the records a prior load
/// produced, the way a real external database would persist them across
/// both stages. Grounded in `gurksohal-kvbencher`'s `workload.rs`, which
/// threads a single `Arc<dyn Database>` into every `exec_load`/`exec_run`
/// call rather than rebuilding the store per stage.
pub fn build_db(
    config: &Config,
) -> Result<Arc<dyn crate::db::Db<Config = ()> + Send + Sync>> {
    let db_name = config.db_name();
    let constructor = *adapters::registry()
        .get(db_name.as_str())
        .with_context(|| format!("unknown db adapter: {db_name}"))?;
    Ok(Arc::from(constructor()))
}

/// Run one load or transaction stage end to end against a freshly built
/// store, returning the final report.
///
/// Grounded in `gurksohal-kvbencher`'s `workload.rs`: a `std::thread::scope`
/// fan-out of one thread per worker, plus two more plain threads for status
/// reporting and the wall-clock terminator.
pub fn run(config: &Config, stage: Stage) -> Result<Report> {
    let db = build_db(config)?;
    run_with_db(config, stage, db)
}

/// Run one load or transaction stage against an already-built store, shared
/// (via `Arc`) across every worker thread so their writes and reads land on
/// the same data. See [`build_db`] for running a Load stage and a
/// Transactions stage back to back against the same store.
pub fn run_with_db(
    config: &Config,
    stage: Stage,
    db: Arc<dyn crate::db::Db<Config = ()> + Send + Sync>,
) -> Result<Report> {
    config.workload_name()?;

    let workload_config = config.core_workload_config()?;
    let record_count = workload_config.record_count;
    let workload = Arc::new(CoreWorkload::new(workload_config).context("building workload")?);

    let thread_count = config.thread_count()?;
    let op_count = match stage {
        Stage::Load => record_count,
        Stage::Transactions => config.operation_count()?,
    };

    let registry = Arc::new(Registry::new(config.measurement_kind()?));
    let stop = Arc::new(AtomicBool::new(false));
    let target_ops_per_ms = config
        .target_ops_per_sec()?
        .map(|total| total as f64 / 1000.0 / thread_count as f64);

    let workers: Vec<Worker<Arc<dyn crate::db::Db<Config = ()> + Send + Sync>>> = (0..thread_count)
        .map(|id| {
            let share = op_count / thread_count + usize::from(id < op_count % thread_count);
            Worker::new(
                id,
                db.clone(),
                registry.clone(),
                workload.clone(),
                stage,
                share,
                target_ops_per_ms,
                stop.clone(),
            )
        })
        .collect();

    // Each worker runs on exactly one thread (a `Measured`'s intended-start
    // cell is plain owned state, not shared), so workers are moved into
    // their threads rather than borrowed; the shared `ops_done` counters are
    // pulled out first for the status reporter and the final tally.
    let ops_done_handles: Vec<_> = workers.iter().map(Worker::ops_done).collect();

    let status_reporter = config.status_enabled()?.then(|| {
        StatusReporter::new(
            config.status_label(),
            Duration::from_secs(config.status_interval_secs().unwrap_or(10)),
            op_count,
            ops_done_handles.clone(),
            registry.clone(),
            stop.clone(),
        )
    });

    let terminator = config
        .max_execution_time_secs()?
        .map(|secs| Terminator::new(Duration::from_secs(secs), stop.clone()));

    let start = Instant::now();
    let worker_results: Vec<Result<()>> = std::thread::scope(|scope| {
        let handles: Vec<_> = workers
            .into_iter()
            .map(|worker| scope.spawn(move || worker.run()))
            .collect();

        if let Some(reporter) = status_reporter {
            scope.spawn(move || reporter.run());
        }
        if let Some(terminator) = terminator {
            scope.spawn(move || terminator.run());
        }

        handles.into_iter().map(|h| h.join().expect("worker thread panicked")).collect()
    });
    let runtime = start.elapsed();

    for result in worker_results {
        result?;
    }

    let operations: u64 = ops_done_handles.iter().map(|c| c.load(Ordering::Relaxed)).sum();
    let percentiles = config.export_percentiles()?;
    let percentiles = if percentiles.is_empty() {
        DEFAULT_PERCENTILES.to_vec()
    } else {
        percentiles
    };

    Ok(Report {
        totals: Totals {
            operations,
            runtime_ms: runtime.as_millis() as u64,
            throughput_ops_per_sec: operations as f64 / runtime.as_secs_f64().max(1e-9),
        },
        metrics: registry.summary(&percentiles),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_load_stage_against_basic_adapter() {
        let config = Config::new(
            [
                ("db".to_string(), "basic".to_string()),
                ("recordcount".to_string(), "50".to_string()),
                ("threadcount".to_string(), "4".to_string()),
            ]
            .into_iter()
            .collect(),
        );

        let report = run(&config, Stage::Load).unwrap();
        assert_eq!(report.totals.operations, 50);
        assert!(report.metrics.iter().any(|(name, _)| name == "INSERT"));
    }

    #[test]
    fn runs_transaction_stage_after_load() {
        let config = Config::new(
            [
                ("db".to_string(), "basic".to_string()),
                ("recordcount".to_string(), "50".to_string()),
                ("operationcount".to_string(), "50".to_string()),
                ("threadcount".to_string(), "2".to_string()),
            ]
            .into_iter()
            .collect(),
        );

        let db = build_db(&config).unwrap();
        run_with_db(&config, Stage::Load, db.clone()).unwrap();
        let report = run_with_db(&config, Stage::Transactions, db).unwrap();
        assert_eq!(report.totals.operations, 50);
    }

    #[test]
    fn rejects_unknown_adapter_name() {
        let config = Config::new(
            [("db".to_string(), "nope".to_string()), ("recordcount".to_string(), "1".to_string())]
                .into_iter()
                .collect(),
        );
        assert!(run(&config, Stage::Load).is_err());
    }
}
