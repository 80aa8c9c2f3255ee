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

//! A YCSB-style database benchmarking harness: key-selection and
//! operation-mix generators, an acknowledged insert counter, a closed-loop
//! rate-limited driver, and an HDR-histogram-backed measurement pipeline.
//!
//! The harness is database-agnostic: [`db::Db`] is the seam a backing store
//! plugs into, and [`adapters::registry`] is the compile-time table the CLI
//! resolves a `-db` name against. [`adapters::basic`] ships a reference
//! in-memory implementation so the crate is runnable and testable standalone.

/// Built-in [`db::Db`] adapters, keyed by name.
pub mod adapters;
/// CLI argument parsing.
pub mod cli;
/// Property-bag configuration, merged from `-P` files and `-p` overrides.
pub mod config;
/// The `Db` trait, `Status`, and the latency-recording `Measured` wrapper.
pub mod db;
/// Export formats for a finished run's measurement summary.
pub mod export;
/// Key-selection and distribution generators.
pub mod generator;
/// Named concurrent histograms workers record into.
pub mod measurement;
/// Wires configuration, workload, workers, status reporting and export
/// together into one run.
pub mod orchestrator;
/// Periodic progress reporting and the run's wall-clock deadline.
pub mod status;
/// Small shared helpers: FNV hashing, random byte values, lazily-read values.
pub mod utils;
/// One worker thread's lifecycle.
pub mod worker;
/// The core (CRUD) workload: key/field/operation choice and record shape.
pub mod workload;
