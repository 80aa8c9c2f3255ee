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
use rand::thread_rng;
use rand_distr::{Distribution, Exp};

use super::{Generator, NumberGenerator};

/// Default percentile (as used by the original workload generator) at which
/// the exponential distribution's value equals `range`.
pub const DEFAULT_PERCENTILE: f64 = 95.0;
/// Default fraction of the keyspace that `range` covers.
pub const DEFAULT_FRAC: f64 = 0.8571428571;

/// Continuous exponential generator whose `percentile`-th value equals `range`.
///
/// Used by [`crate::workload`] to bias reads toward recently inserted
/// records: `id = last_acknowledged - draw()`, re-drawing on a negative
/// result.
#[derive(Debug)]
pub struct ExponentialGenerator {
    dist: Exp<f64>,
    rate: f64,
}

impl ExponentialGenerator {
    /// Create an exponential generator with the default percentile/range
    /// relationship over a keyspace of `item_count` records.
    pub fn new(item_count: u64) -> Result<Self> {
        Self::with_percentile(DEFAULT_PERCENTILE, item_count as f64 * DEFAULT_FRAC)
    }

    /// Create an exponential generator whose `percentile`-th value equals `range`.
    pub fn with_percentile(percentile: f64, range: f64) -> Result<Self> {
        ensure!(
            (0.0..100.0).contains(&percentile),
            "percentile must be in [0, 100), got {percentile}"
        );
        ensure!(range > 0.0, "range must be positive, got {range}");
        let rate = -(1.0 - percentile / 100.0).ln() / range;
        let dist = Exp::new(rate).map_err(|e| anyhow::anyhow!("invalid exponential rate: {e}"))?;
        Ok(Self { dist, rate })
    }
}

impl Generator for ExponentialGenerator {
    type Output = usize;

    fn next(&self) -> Self::Output {
        self.dist.sample(&mut thread_rng()) as usize
    }
}

impl NumberGenerator for ExponentialGenerator {
    fn mean(&self) -> f64 {
        1.0 / self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_percentile() {
        assert!(ExponentialGenerator::with_percentile(100.0, 10.0).is_err());
        assert!(ExponentialGenerator::with_percentile(50.0, 0.0).is_err());
    }

    #[test]
    fn draws_are_non_negative() {
        let g = ExponentialGenerator::new(10_000).unwrap();
        for _ in 0..1000 {
            let _ = g.next();
        }
    }
}
