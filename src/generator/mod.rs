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

/// A [`Generator`] generates value following some distribution.
pub trait Generator {
    /// Output type of the generator.
    type Output;

    /// Generate the next value.
    fn next(&self) -> Self::Output;
}

/// A [`NumberGenerator`] generates numeric values.
pub trait NumberGenerator: Generator {
    /// Return the expected value (mean) of the values this generator will generate.
    fn mean(&self) -> f64;
}

/// A [`Counter`] generates a sequence of integers.
pub trait Counter: Generator {
    /// Get the last generated value.
    ///
    /// # Panics
    ///
    /// `next()` must be called before calling `last()`.
    fn last(&self) -> Self::Output;
}

/// A [`AcknowledgedCounter`] only updates the last generated value with `acknowledge()` calls.
pub trait AcknowledgedCounter: Counter {
    /// Update the last generated value.
    fn acknowledge(&self, val: Self::Output);
}

/// Narrows a `u64`-output [`NumberGenerator`] to `usize`, so generators like
/// [`zipfian::ZipfianGenerator`] and [`hotspot::HotSpotGenerator`] can be boxed
/// alongside the `usize`-output generators a [`crate::workload::CoreWorkload`] chooses between.
pub struct U64AsUsize<G>(pub G);

impl<G> Generator for U64AsUsize<G>
where
    G: Generator<Output = u64>,
{
    type Output = usize;

    fn next(&self) -> Self::Output {
        self.0.next() as usize
    }
}

impl<G> NumberGenerator for U64AsUsize<G>
where
    G: NumberGenerator<Output = u64>,
{
    fn mean(&self) -> f64 {
        self.0.mean()
    }
}

/// Constant value generator.
pub mod constant;
/// Uniform value generator.
pub mod uniform;

/// Discrete value generator.
pub mod discrete;

/// Acknowledged atomic counters.
pub mod acknowledge;
/// Atomic counters.
pub mod counter;
/// Sequential generator.
pub mod sequential;

/// Zipfian-distributed generator.
pub mod zipfian;

/// Zipfian skew decorrelated from key order via hashing.
pub mod scrambled_zipfian;

/// Reads biased toward the newest acknowledged inserts.
pub mod skewed_latest;

/// Continuous exponential generator, biased toward recent records.
pub mod exponential;

/// Hot-spot generator: a configurable fraction of operations target a configurable fraction of the keyspace.
pub mod hotspot;

/// Empirical-CDF generator read once from a bucket-count file.
pub mod histogram_file;

/// Zipfian index into a fixed list of values.
pub mod list_zipfian;
