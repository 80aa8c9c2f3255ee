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

//! Periodic progress reporting (`-s`/`-l LABEL`) and the run's wall-clock
//! deadline (`maxexecutiontime`).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sysinfo::{PidExt, ProcessExt, System, SystemExt};

use crate::measurement::Registry;

/// Wakes up every `interval` to log cumulative/interval throughput and ETA,
/// and to sample the process's own resource usage as ordinary measurements.
///
/// Grounded in the teacher's own status thread: a thread reading atomics the
/// workers publish, sleeping in between, logging through `tracing` rather
/// than printing directly.
pub struct StatusReporter {
    label: String,
    interval: Duration,
    op_count: usize,
    ops_done: Vec<Arc<AtomicU64>>,
    registry: Arc<Registry>,
    stop: Arc<AtomicBool>,
}

impl StatusReporter {
    /// `ops_done` is one counter per worker; the reporter sums them each tick.
    pub fn new(
        label: String,
        interval: Duration,
        op_count: usize,
        ops_done: Vec<Arc<AtomicU64>>,
        registry: Arc<Registry>,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            label,
            interval,
            op_count,
            ops_done,
            registry,
            stop,
        }
    }

    fn total_done(&self) -> u64 {
        self.ops_done.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    /// Block until `stop` is set or every worker's share is done, logging one
    /// status line per tick.
    pub fn run(&self) {
        let start = Instant::now();
        let mut system = System::new_all();
        let mut last_done = 0u64;
        let mut last_tick = start;

        loop {
            std::thread::sleep(self.interval);

            let done = self.total_done();
            let elapsed = start.elapsed();
            let tick_elapsed = last_tick.elapsed();
            let interval_ops = done.saturating_sub(last_done);
            let cumulative_throughput = done as f64 / elapsed.as_secs_f64().max(1e-9);
            let interval_throughput = interval_ops as f64 / tick_elapsed.as_secs_f64().max(1e-9);

            self.sample_runtime(&mut system);

            let eta_secs = if self.op_count > 0 && cumulative_throughput > 0.0 {
                let remaining = self.op_count.saturating_sub(done as usize) as f64;
                Some((remaining / cumulative_throughput) as u64)
            } else {
                None
            };

            let label = &self.label;
            tracing::info!(
                %label,
                elapsed_secs = elapsed.as_secs(),
                done,
                op_count = self.op_count,
                cumulative_ops_per_sec = cumulative_throughput,
                interval_ops_per_sec = interval_throughput,
                ?eta_secs,
                "status",
            );

            last_done = done;
            last_tick = Instant::now();

            let finished = self.op_count > 0 && done as usize >= self.op_count;
            if finished || self.stop.load(Ordering::Relaxed) {
                break;
            }
        }
    }

    fn sample_runtime(&self, system: &mut System) {
        system.refresh_all();

        let load = system.load_average().one;
        self.registry.record("Load-1m", (load * 1000.0) as u64);

        if let Some(pid) = sysinfo::get_current_pid().ok() {
            if let Some(process) = system.process(pid) {
                self.registry.record("Mem-MB", process.memory() / 1024 / 1024);
            }
        }
        self.registry.record("Threads", system.processes().len() as u64);
    }
}

/// Arms a wall-clock deadline for the whole run (`maxexecutiontime`).
///
/// Setting `stop` is idempotent: workers and the status reporter each check
/// it with a plain relaxed load, so there is no need for a condvar to wake
/// them promptly -- their throttle sleeps are already bounded by a tick.
pub struct Terminator {
    deadline: Duration,
    stop: Arc<AtomicBool>,
}

impl Terminator {
    /// `stop` is shared with every worker and the status reporter.
    pub fn new(deadline: Duration, stop: Arc<AtomicBool>) -> Self {
        Self { deadline, stop }
    }

    /// Block until the deadline, then set `stop`. Returns promptly if `stop`
    /// is already set by the time the deadline arrives (the run finished on
    /// its own).
    pub fn run(&self) {
        std::thread::sleep(self.deadline);
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementKind;

    #[test]
    fn reports_until_op_count_reached() {
        let ops_done = vec![Arc::new(AtomicU64::new(10)), Arc::new(AtomicU64::new(10))];
        let registry = Arc::new(Registry::new(MeasurementKind::Hdr));
        let stop = Arc::new(AtomicBool::new(false));

        let reporter = StatusReporter::new(
            "".to_string(),
            Duration::from_millis(1),
            20,
            ops_done,
            registry,
            stop,
        );
        reporter.run();
    }

    #[test]
    fn terminator_sets_stop_after_deadline() {
        let stop = Arc::new(AtomicBool::new(false));
        let terminator = Terminator::new(Duration::from_millis(1), stop.clone());
        terminator.run();
        assert!(stop.load(Ordering::Relaxed));
    }
}
