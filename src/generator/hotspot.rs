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
use rand::{thread_rng, Rng};

use super::{Generator, NumberGenerator};

/// With probability `op_fraction`, picks uniformly from the first
/// `data_fraction` of `[lo, hi]`; otherwise picks uniformly from the remainder.
#[derive(Debug)]
pub struct HotSpotGenerator {
    lo: u64,
    hi: u64,
    hot_set_size: u64,
    hot_set_fraction: f64,
    hot_op_fraction: f64,
}

impl HotSpotGenerator {
    /// Create a hot-spot generator over `[lo, hi]`.
    pub fn new(lo: u64, hi: u64, data_fraction: f64, op_fraction: f64) -> Result<Self> {
        ensure!(lo <= hi, "hotspot requires lo <= hi (lo={lo}, hi={hi})");
        ensure!(
            (0.0..=1.0).contains(&data_fraction),
            "hotspot data fraction must be in [0, 1], got {data_fraction}"
        );
        ensure!(
            (0.0..=1.0).contains(&op_fraction),
            "hotspot op fraction must be in [0, 1], got {op_fraction}"
        );

        let items = hi - lo + 1;
        let hot_set_size = ((items as f64) * data_fraction).max(1.0) as u64;

        Ok(Self {
            lo,
            hi,
            hot_set_size,
            hot_set_fraction: data_fraction,
            hot_op_fraction: op_fraction,
        })
    }
}

impl Generator for HotSpotGenerator {
    type Output = u64;

    fn next(&self) -> Self::Output {
        let mut rng = thread_rng();
        if rng.gen_range(0.0..1.0) < self.hot_op_fraction {
            self.lo + rng.gen_range(0..self.hot_set_size)
        } else {
            let cold_start = self.lo + self.hot_set_size;
            let cold_size = (self.hi - self.lo + 1) - self.hot_set_size;
            if cold_size == 0 {
                self.lo
            } else {
                cold_start + rng.gen_range(0..cold_size)
            }
        }
    }
}

impl NumberGenerator for HotSpotGenerator {
    fn mean(&self) -> f64 {
        let hot_mean = self.lo as f64 + (self.hot_set_size as f64 - 1.0) / 2.0;
        let cold_size = (self.hi - self.lo + 1) as f64 - self.hot_set_size as f64;
        let cold_mean = if cold_size > 0.0 {
            (self.lo + self.hot_set_size) as f64 + (cold_size - 1.0) / 2.0
        } else {
            hot_mean
        };
        self.hot_op_fraction * hot_mean + (1.0 - self.hot_op_fraction) * cold_mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range() {
        let g = HotSpotGenerator::new(0, 999, 0.1, 0.9).unwrap();
        for _ in 0..10_000 {
            let v = g.next();
            assert!(v <= 999);
        }
    }

    #[test]
    fn hot_set_dominates_draws() {
        let g = HotSpotGenerator::new(0, 999, 0.1, 0.9).unwrap();
        let hot = (0..50_000).filter(|_| g.next() < 100).count();
        assert!(hot as f64 / 50_000.0 > 0.8);
    }
}
