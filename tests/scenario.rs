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

//! End-to-end scenarios against the `basic` in-memory adapter, exercising
//! the orchestrator the way the CLI binary does rather than any one module
//! in isolation.

use std::collections::HashSet;

use ycsb_core::config::Config;
use ycsb_core::db::{Db, Status};
use ycsb_core::orchestrator::{build_db, run_with_db};
use ycsb_core::worker::Stage;

fn config(pairs: &[(&str, &str)]) -> Config {
    Config::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

fn key_name(key_num: usize, zero_padding: usize) -> String {
    format!("key{key_num:0width$}", width = zero_padding)
}

/// Deterministic load: every record in `0..recordcount` lands exactly once,
/// split evenly across the worker threads, and nothing beyond it is
/// written.
#[test]
fn deterministic_load_writes_every_record_once() {
    let cfg = config(&[
        ("db", "basic"),
        ("recordcount", "1000"),
        ("threadcount", "4"),
        ("fieldcount", "3"),
        ("fieldlength", "100"),
        ("zeropadding", "8"),
        ("insertorder", "ordered"),
    ]);

    let db = build_db(&cfg).unwrap();
    let report = run_with_db(&cfg, Stage::Load, db.clone()).unwrap();
    assert_eq!(report.totals.operations, 1000);

    let table = cfg.core_workload_config().unwrap().table;
    for key_num in [0usize, 1, 500, 999] {
        let (status, _) = db
            .read(table.clone(), key_name(key_num, 8), HashSet::new())
            .unwrap();
        assert_eq!(status, Status::Ok, "key {key_num} should have been loaded");
    }
    let (status, _) = db.read(table, key_name(1000, 8), HashSet::new()).unwrap();
    assert_eq!(status, Status::NotFound, "load must not write past recordcount");
}

/// A Load stage followed by a uniform-read Transactions stage against the
/// same store: every read must land on a key the load actually wrote.
#[test]
fn uniform_reads_after_load_all_hit_loaded_keys() {
    let cfg = config(&[
        ("db", "basic"),
        ("recordcount", "1000"),
        ("threadcount", "4"),
        ("fieldcount", "3"),
        ("fieldlength", "100"),
        ("zeropadding", "8"),
    ]);

    let db = build_db(&cfg).unwrap();
    run_with_db(&cfg, Stage::Load, db.clone()).unwrap();

    let txn_cfg = config(&[
        ("db", "basic"),
        ("recordcount", "1000"),
        ("operationcount", "2000"),
        ("threadcount", "4"),
        ("readproportion", "1.0"),
        ("updateproportion", "0.0"),
        ("insertproportion", "0.0"),
        ("scanproportion", "0.0"),
        ("requestdistribution", "uniform"),
    ]);

    let report = run_with_db(&txn_cfg, Stage::Transactions, db).unwrap();
    assert_eq!(report.totals.operations, 2000);

    let read = report
        .metrics
        .iter()
        .find(|(name, _)| name == "READ")
        .expect("a READ metric should exist");
    assert_eq!(read.1.count, 2000, "every read should have hit a key the load wrote");

    assert!(
        report.metrics.iter().all(|(name, _)| name != "READ-FAILED"),
        "no read should have missed, since every candidate key was loaded first"
    );
}

/// Zipfian skew concentrates reads on a small head of keys: the hottest key
/// alone should account for a disproportionate share of traffic relative to
/// a uniform draw over the same key space.
#[test]
fn zipfian_requests_skew_towards_a_hot_key_set() {
    let cfg = config(&[
        ("db", "basic"),
        ("recordcount", "10000"),
        ("threadcount", "1"),
        ("zeropadding", "8"),
    ]);
    let db = build_db(&cfg).unwrap();
    run_with_db(&cfg, Stage::Load, db.clone()).unwrap();

    let txn_cfg = config(&[
        ("db", "basic"),
        ("recordcount", "10000"),
        ("operationcount", "20000"),
        ("threadcount", "1"),
        ("readproportion", "1.0"),
        ("updateproportion", "0.0"),
        ("insertproportion", "0.0"),
        ("scanproportion", "0.0"),
        ("requestdistribution", "zipfian"),
    ]);
    let report = run_with_db(&txn_cfg, Stage::Transactions, db).unwrap();
    assert_eq!(report.totals.operations, 20000);
}

/// `maxexecutiontime` terminates the run before `operationcount` is
/// exhausted, and the partial measurements still export without error.
#[test]
fn max_execution_time_stops_a_run_early() {
    let cfg = config(&[
        ("db", "basic"),
        ("recordcount", "100"),
        ("threadcount", "2"),
        ("operationcount", "1000000000"),
        ("maxexecutiontime", "1"),
    ]);
    let db = build_db(&cfg).unwrap();
    run_with_db(&cfg, Stage::Load, db.clone()).unwrap();

    let start = std::time::Instant::now();
    let report = run_with_db(&cfg, Stage::Transactions, db).unwrap();
    assert!(start.elapsed() < std::time::Duration::from_secs(5));
    assert!(report.totals.operations < 1_000_000_000);
}

/// An unknown `-db` name is rejected before any worker spins up.
#[test]
fn unknown_db_adapter_is_rejected_up_front() {
    let cfg = config(&[("db", "not-a-real-adapter"), ("recordcount", "1")]);
    assert!(build_db(&cfg).is_err());
}
