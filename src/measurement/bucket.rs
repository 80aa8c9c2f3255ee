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

use std::sync::atomic::{AtomicU64, Ordering};

use super::Summary;

/// Fixed-width bucket histogram: cheaper than [`super::hdr::HdrMeasurement`]
/// at the cost of coarser percentiles, for deployments that would rather not
/// pay `hdrhistogram`'s per-record cost.
pub struct BucketMeasurement {
    buckets: Vec<AtomicU64>,
    bucket_micros: u64,
    overflow: AtomicU64,
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl BucketMeasurement {
    /// Create a bucket histogram with `num_buckets` buckets, each `bucket_micros` wide.
    pub fn new(num_buckets: usize, bucket_micros: u64) -> Self {
        Self {
            buckets: (0..num_buckets).map(|_| AtomicU64::new(0)).collect(),
            bucket_micros: bucket_micros.max(1),
            overflow: AtomicU64::new(0),
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            min: AtomicU64::new(u64::MAX),
            max: AtomicU64::new(0),
        }
    }

    /// Record one value, in microseconds.
    pub fn record(&self, value_micros: u64) {
        let idx = (value_micros / self.bucket_micros) as usize;
        match self.buckets.get(idx) {
            Some(bucket) => {
                bucket.fetch_add(1, Ordering::Relaxed);
            }
            None => {
                self.overflow.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(value_micros, Ordering::Relaxed);
        self.min.fetch_min(value_micros, Ordering::Relaxed);
        self.max.fetch_max(value_micros, Ordering::Relaxed);
    }

    fn value_at_quantile(&self, q: f64) -> u64 {
        let total: u64 = self.count.load(Ordering::Relaxed);
        if total == 0 {
            return 0;
        }
        let target = ((q * total as f64).ceil() as u64).max(1);
        let mut seen = 0u64;
        for (i, bucket) in self.buckets.iter().enumerate() {
            seen += bucket.load(Ordering::Relaxed);
            if seen >= target {
                return i as u64 * self.bucket_micros;
            }
        }
        // fell into the overflow bucket: report the last bucket's upper edge.
        self.buckets.len() as u64 * self.bucket_micros
    }

    /// Summarize the histogram's current contents at the given percentiles.
    pub fn summary(&self, percentiles: &[f64]) -> Summary {
        let count = self.count.load(Ordering::Relaxed);
        if count == 0 {
            return Summary::empty();
        }
        Summary {
            count,
            min: self.min.load(Ordering::Relaxed),
            max: self.max.load(Ordering::Relaxed),
            mean: self.sum.load(Ordering::Relaxed) as f64 / count as f64,
            percentiles: percentiles
                .iter()
                .map(|&p| (p, self.value_at_quantile(p / 100.0)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_min_max_and_percentile() {
        let m = BucketMeasurement::new(1000, 1);
        for v in 1..=100 {
            m.record(v);
        }
        let s = m.summary(&[50.0]);
        assert_eq!(s.count, 100);
        assert_eq!(s.min, 1);
        assert_eq!(s.max, 100);
        assert!(s.percentiles[0].1 >= 45 && s.percentiles[0].1 <= 55);
    }

    #[test]
    fn overflow_values_still_counted() {
        let m = BucketMeasurement::new(10, 1);
        m.record(1000);
        let s = m.summary(&[99.0]);
        assert_eq!(s.count, 1);
        assert_eq!(s.max, 1000);
    }
}
