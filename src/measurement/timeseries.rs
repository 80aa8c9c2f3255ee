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

use std::collections::BTreeMap;
use std::time::Instant;

use parking_lot::Mutex;

use super::Summary;

/// Buckets values by wall-clock window (e.g. one point per second) instead of
/// collapsing them into a single distribution, for plotting throughput/latency
/// over the life of a run.
pub struct TimeSeriesMeasurement {
    granularity_secs: u64,
    start: Instant,
    windows: Mutex<BTreeMap<u64, (u64, u64)>>,
}

impl TimeSeriesMeasurement {
    /// Create a time series measurement with windows `granularity_secs` wide.
    pub fn new(granularity_secs: u64) -> Self {
        Self {
            granularity_secs: granularity_secs.max(1),
            start: Instant::now(),
            windows: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record one value, in microseconds, at the current wall-clock offset.
    pub fn record(&self, value_micros: u64) {
        let window = self.start.elapsed().as_secs() / self.granularity_secs;
        let mut windows = self.windows.lock();
        let entry = windows.entry(window).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += value_micros;
    }

    /// Per-window `(offset_secs, mean_micros)` points, in chronological order.
    pub fn series(&self) -> Vec<(u64, f64)> {
        self.windows
            .lock()
            .iter()
            .map(|(&window, &(count, sum))| {
                (window * self.granularity_secs, sum as f64 / count as f64)
            })
            .collect()
    }

    /// Summarize across all windows combined, for parity with the other measurement kinds.
    pub fn summary(&self, percentiles: &[f64]) -> Summary {
        let windows = self.windows.lock();
        let count: u64 = windows.values().map(|&(c, _)| c).sum();
        if count == 0 {
            return Summary::empty();
        }
        let sum: u64 = windows.values().map(|&(_, s)| s).sum();
        // A time series doesn't track individual values, so percentiles fall
        // back to the overall mean; `series()` is the real export path.
        let mean = sum as f64 / count as f64;
        Summary {
            count,
            min: mean as u64,
            max: mean as u64,
            mean,
            percentiles: percentiles.iter().map(|&p| (p, mean as u64)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_into_current_window() {
        let m = TimeSeriesMeasurement::new(60);
        m.record(100);
        m.record(200);
        let series = m.series();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].1, 150.0);
    }
}
