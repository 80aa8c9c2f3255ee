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

use hdrhistogram::Histogram;
use parking_lot::Mutex;

use super::Summary;

/// Microsecond-resolution concurrent histogram, the default measurement kind.
///
/// Bounded to a day's worth of microseconds so a single stalled operation
/// doesn't get silently clipped the way a narrower ceiling would.
pub struct HdrMeasurement {
    histogram: Mutex<Histogram<u64>>,
}

impl HdrMeasurement {
    /// Create an empty histogram, 1us to 24h at 3 significant digits.
    pub fn new() -> anyhow::Result<Self> {
        let histogram = Histogram::new_with_bounds(1, 24 * 60 * 60 * 1_000_000, 3)?;
        Ok(Self {
            histogram: Mutex::new(histogram),
        })
    }

    /// Record one value, in microseconds.
    pub fn record(&self, value_micros: u64) {
        let mut h = self.histogram.lock();
        // saturate at the histogram's configured ceiling rather than drop the sample.
        let _ = h.record(value_micros.max(1).min(h.high()));
    }

    /// Summarize the histogram's current contents at the given percentiles.
    pub fn summary(&self, percentiles: &[f64]) -> Summary {
        let h = self.histogram.lock();
        if h.len() == 0 {
            return Summary::empty();
        }
        Summary {
            count: h.len(),
            min: h.min(),
            max: h.max(),
            mean: h.mean(),
            percentiles: percentiles
                .iter()
                .map(|&p| (p, h.value_at_quantile(p / 100.0)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_recorded_values() {
        let m = HdrMeasurement::new().unwrap();
        for v in 1..=100 {
            m.record(v);
        }
        let s = m.summary(&[50.0, 99.0]);
        assert_eq!(s.count, 100);
        assert_eq!(s.min, 1);
        assert_eq!(s.max, 100);
    }
}
