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

use parking_lot::Mutex;

use super::Summary;

/// Keeps every recorded value verbatim, for low-volume measurements (or
/// debugging) where exact percentiles matter more than memory footprint.
pub struct RawMeasurement {
    values: Mutex<Vec<u64>>,
}

impl RawMeasurement {
    /// Create an empty raw measurement.
    pub fn new() -> Self {
        Self {
            values: Mutex::new(Vec::new()),
        }
    }

    /// Record one value, in microseconds.
    pub fn record(&self, value_micros: u64) {
        self.values.lock().push(value_micros);
    }

    /// Summarize the recorded values at the given percentiles.
    pub fn summary(&self, percentiles: &[f64]) -> Summary {
        let mut values = self.values.lock().clone();
        if values.is_empty() {
            return Summary::empty();
        }
        values.sort_unstable();

        let count = values.len() as u64;
        let sum: u64 = values.iter().sum();
        Summary {
            count,
            min: values[0],
            max: values[values.len() - 1],
            mean: sum as f64 / count as f64,
            percentiles: percentiles
                .iter()
                .map(|&p| (p, values[percentile_index(values.len(), p)]))
                .collect(),
        }
    }
}

impl Default for RawMeasurement {
    fn default() -> Self {
        Self::new()
    }
}

fn percentile_index(len: usize, percentile: f64) -> usize {
    let idx = ((percentile / 100.0) * (len - 1) as f64).round();
    (idx as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_exact_percentiles() {
        let m = RawMeasurement::new();
        for v in 1..=100 {
            m.record(v);
        }
        let s = m.summary(&[50.0, 100.0]);
        assert_eq!(s.count, 100);
        assert_eq!(s.percentiles[1].1, 100);
    }

    #[test]
    fn empty_summary_has_zero_count() {
        let m = RawMeasurement::new();
        assert_eq!(m.summary(&[50.0]).count, 0);
    }
}
