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

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use rand::{thread_rng, Rng};

use super::{Generator, NumberGenerator};

/// An empirical CDF read once from a file of `<bucket> <count>` lines, e.g. a
/// recorded field-length distribution.
///
/// The file format matches the line-oriented bucket histograms used
/// elsewhere in this pack for replayed traces: each line is
/// `bucket_index count`, one bucket per line, in increasing bucket order.
#[derive(Debug)]
pub struct HistogramGenerator {
    /// Cumulative counts, indexed by bucket.
    cumulative: Vec<u64>,
    total: u64,
    mean: f64,
}

impl HistogramGenerator {
    /// Load an empirical CDF from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading histogram file {}", path.display()))?;
        Self::from_str(&contents)
    }

    /// Parse an empirical CDF from the textual bucket-count format.
    pub fn from_str(contents: &str) -> Result<Self> {
        let mut buckets: Vec<(usize, u64)> = vec![];
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let bucket: usize = parts
                .next()
                .context("missing bucket index")?
                .parse()
                .context("bucket index must be an integer")?;
            let count: u64 = parts
                .next()
                .context("missing bucket count")?
                .parse()
                .context("bucket count must be an integer")?;
            buckets.push((bucket, count));
        }
        ensure!(!buckets.is_empty(), "histogram file has no buckets");
        buckets.sort_unstable_by_key(|&(b, _)| b);

        let max_bucket = buckets.last().unwrap().0;
        let mut raw = vec![0u64; max_bucket + 1];
        let mut weighted_sum = 0f64;
        for (bucket, count) in buckets {
            raw[bucket] += count;
            weighted_sum += bucket as f64 * count as f64;
        }

        let mut cumulative = Vec::with_capacity(raw.len());
        let mut running = 0u64;
        for count in raw {
            running += count;
            cumulative.push(running);
        }
        let total = running;
        ensure!(total > 0, "histogram file has zero total weight");

        Ok(Self {
            cumulative,
            total,
            mean: weighted_sum / total as f64,
        })
    }
}

impl Generator for HistogramGenerator {
    type Output = usize;

    fn next(&self) -> Self::Output {
        let target = thread_rng().gen_range(0..self.total);
        self.cumulative
            .partition_point(|&cum| cum <= target)
            .min(self.cumulative.len() - 1)
    }
}

impl NumberGenerator for HistogramGenerator {
    fn mean(&self) -> f64 {
        self.mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_draws_in_range() {
        let g = HistogramGenerator::from_str("0 10\n1 20\n2 70\n").unwrap();
        for _ in 0..1000 {
            assert!(g.next() <= 2);
        }
    }

    #[test]
    fn rejects_empty_file() {
        assert!(HistogramGenerator::from_str("").is_err());
    }
}
