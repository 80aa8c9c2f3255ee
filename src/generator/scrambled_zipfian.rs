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

use anyhow::{ensure, Result};

use super::zipfian::{ZipfianGenerator, ZIPFIAN_CONSTANT};
use super::{Generator, NumberGenerator};
use crate::utils::fnvhash64;

/// Virtual universe size the inner Zipfian draws from, large enough that the
/// popularity profile stays stable as the real range grows during a run.
const ITEM_COUNT: u64 = 10_000_000_000;

/// Draws a Zipfian index over a large virtual universe and maps it through a
/// 64-bit hash into `[lo, hi)`, decorrelating popularity from key order while
/// preserving the skew profile: popular items stay popular as the keyspace grows.
#[derive(Debug)]
pub struct ScrambledZipfianGenerator {
    lo: u64,
    range: u64,
    inner: ZipfianGenerator,
}

impl ScrambledZipfianGenerator {
    /// Create a scrambled-Zipfian generator over `[lo, hi)` with the default skew.
    pub fn new(lo: u64, hi: u64) -> Result<Self> {
        Self::with_theta(lo, hi, ZIPFIAN_CONSTANT)
    }

    /// Create a scrambled-Zipfian generator over `[lo, hi)` with an explicit skew.
    pub fn with_theta(lo: u64, hi: u64, theta: f64) -> Result<Self> {
        ensure!(lo < hi, "scrambled zipfian requires lo < hi (lo={lo}, hi={hi})");
        let range = hi - lo;
        let inner = ZipfianGenerator::with_theta(0, ITEM_COUNT - 1, theta)?;
        Ok(Self { lo, range, inner })
    }
}

impl Generator for ScrambledZipfianGenerator {
    type Output = u64;

    fn next(&self) -> Self::Output {
        let z = self.inner.next();
        self.lo + fnvhash64(z) % self.range
    }
}

impl NumberGenerator for ScrambledZipfianGenerator {
    fn mean(&self) -> f64 {
        (self.lo as f64 + (self.lo + self.range - 1) as f64) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range() {
        let g = ScrambledZipfianGenerator::new(0, 1_000_000).unwrap();
        for _ in 0..10_000 {
            assert!(g.next() < 1_000_000);
        }
    }

    #[test]
    fn top_one_percent_gets_majority_of_draws() {
        let n = 1_000_000u64;
        let g = ScrambledZipfianGenerator::with_theta(0, n, 0.99).unwrap();
        let mut counts = std::collections::HashMap::new();
        let draws = 500_000;
        for _ in 0..draws {
            *counts.entry(g.next()).or_insert(0u64) += 1;
        }
        let mut values: Vec<_> = counts.into_values().collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        let top_one_percent = (n / 100).max(1) as usize;
        let top_sum: u64 = values.iter().take(top_one_percent).sum();
        let share = top_sum as f64 / draws as f64;
        assert!(share >= 0.45, "expected top-1% share >= 45%, got {share}");
    }
}
