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

//! Measurement pipeline: a named registry of concurrent histograms that
//! workers record into and the status reporter / exporter read from.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{ensure, Result};
use parking_lot::RwLock;

/// Fixed-width bucket histogram.
pub mod bucket;
/// HDR (microsecond-resolution) histogram, the default.
pub mod hdr;
/// Keeps every value verbatim.
pub mod raw;
/// Windowed mean-over-time.
pub mod timeseries;
/// HDR + bucket histogram recorded in tandem.
pub mod pair;

use bucket::BucketMeasurement;
use hdr::HdrMeasurement;
use pair::PairMeasurement;
use raw::RawMeasurement;
use timeseries::TimeSeriesMeasurement;

/// Percentile set exported by default, matching the original workload generator.
pub const DEFAULT_PERCENTILES: &[f64] = &[50.0, 75.0, 95.0, 99.0, 99.9, 99.99];

/// Which underlying histogram implementation new named measurements use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementKind {
    /// [`HdrMeasurement`], the default.
    Hdr,
    /// [`BucketMeasurement`].
    Bucket,
    /// [`RawMeasurement`].
    Raw,
    /// [`TimeSeriesMeasurement`], windowed at the given granularity in seconds.
    TimeSeries(u64),
    /// [`PairMeasurement`].
    Pair,
}

impl Default for MeasurementKind {
    fn default() -> Self {
        MeasurementKind::Hdr
    }
}

/// A single named measurement, over one of the supported histogram kinds.
pub enum Measurement {
    /// See [`HdrMeasurement`].
    Hdr(HdrMeasurement),
    /// See [`BucketMeasurement`].
    Bucket(BucketMeasurement),
    /// See [`RawMeasurement`].
    Raw(RawMeasurement),
    /// See [`TimeSeriesMeasurement`].
    TimeSeries(TimeSeriesMeasurement),
    /// See [`PairMeasurement`].
    Pair(PairMeasurement),
}

impl Measurement {
    fn new(kind: MeasurementKind) -> anyhow::Result<Self> {
        Ok(match kind {
            MeasurementKind::Hdr => Measurement::Hdr(HdrMeasurement::new()?),
            MeasurementKind::Bucket => Measurement::Bucket(BucketMeasurement::new(10_000, 1)),
            MeasurementKind::Raw => Measurement::Raw(RawMeasurement::new()),
            MeasurementKind::TimeSeries(granularity) => {
                Measurement::TimeSeries(TimeSeriesMeasurement::new(granularity))
            }
            MeasurementKind::Pair => Measurement::Pair(PairMeasurement::new()?),
        })
    }

    /// Record one value, in microseconds.
    pub fn record(&self, value_micros: u64) {
        match self {
            Measurement::Hdr(m) => m.record(value_micros),
            Measurement::Bucket(m) => m.record(value_micros),
            Measurement::Raw(m) => m.record(value_micros),
            Measurement::TimeSeries(m) => m.record(value_micros),
            Measurement::Pair(m) => m.record(value_micros),
        }
    }

    /// Summarize the measurement's current contents at the given percentiles.
    pub fn summary(&self, percentiles: &[f64]) -> Summary {
        match self {
            Measurement::Hdr(m) => m.summary(percentiles),
            Measurement::Bucket(m) => m.summary(percentiles),
            Measurement::Raw(m) => m.summary(percentiles),
            Measurement::TimeSeries(m) => m.summary(percentiles),
            Measurement::Pair(m) => m.summary(percentiles),
        }
    }
}

/// Distribution summary of a measurement at a point in time.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Number of values recorded.
    pub count: u64,
    /// Smallest value recorded, in microseconds.
    pub min: u64,
    /// Largest value recorded, in microseconds.
    pub max: u64,
    /// Mean of all values recorded, in microseconds.
    pub mean: f64,
    /// `(percentile, value_micros)` pairs, in the order requested.
    pub percentiles: Vec<(f64, u64)>,
}

impl Summary {
    /// A summary of zero recorded values.
    pub fn empty() -> Self {
        Self {
            count: 0,
            min: 0,
            max: 0,
            mean: 0.0,
            percentiles: Vec::new(),
        }
    }
}

/// Process-wide table of named measurements.
///
/// Workers call [`Registry::record`] from every thread; the status reporter
/// and the final exporter call [`Registry::summary`] to read it back. Entries
/// are created lazily on first use so a workload never has to declare its
/// metric names up front.
pub struct Registry {
    default_kind: MeasurementKind,
    measurements: RwLock<HashMap<String, (MeasurementKind, Arc<Measurement>)>>,
}

impl Registry {
    /// Create an empty registry; [`Registry::record`] creates new metrics as `kind`.
    pub fn new(kind: MeasurementKind) -> Self {
        Self {
            default_kind: kind,
            measurements: RwLock::new(HashMap::new()),
        }
    }

    /// Return the existing measurement named `name`, or create one of `kind`.
    ///
    /// Errors if `name` already exists under a different kind — a metric's
    /// histogram implementation can't change mid-run.
    pub fn get_or_create(&self, name: &str, kind: MeasurementKind) -> Result<Arc<Measurement>> {
        if let Some((existing_kind, m)) = self.measurements.read().get(name) {
            ensure!(
                *existing_kind == kind,
                "measurement {name} already registered as {existing_kind:?}, requested {kind:?}"
            );
            return Ok(m.clone());
        }
        let mut w = self.measurements.write();
        if let Some((existing_kind, m)) = w.get(name) {
            ensure!(
                *existing_kind == kind,
                "measurement {name} already registered as {existing_kind:?}, requested {kind:?}"
            );
            return Ok(m.clone());
        }
        let m = Arc::new(Measurement::new(kind)?);
        w.insert(name.to_string(), (kind, m.clone()));
        Ok(m)
    }

    /// Record one value, in microseconds, under `name`, lazily creating it
    /// with the registry's default kind.
    pub fn record(&self, name: &str, value_micros: u64) {
        self.get_or_create(name, self.default_kind)
            .expect("record() never changes an existing metric's kind")
            .record(value_micros);
    }

    /// Summarize every recorded metric at the given percentiles, sorted by name.
    pub fn summary(&self, percentiles: &[f64]) -> Vec<(String, Summary)> {
        let measurements = self.measurements.read();
        let mut out: Vec<_> = measurements
            .iter()
            .map(|(name, (_, m))| (name.clone(), m.summary(percentiles)))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(MeasurementKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazily_creates_and_aggregates_named_metrics() {
        let registry = Registry::default();
        for v in 1..=10 {
            registry.record("READ", v);
        }
        registry.record("UPDATE", 5);

        let summary = registry.summary(&[50.0]);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].0, "READ");
        assert_eq!(summary[0].1.count, 10);
        assert_eq!(summary[1].0, "UPDATE");
        assert_eq!(summary[1].1.count, 1);
    }

    #[test]
    fn rejects_kind_mismatch_for_existing_metric() {
        let registry = Registry::default();
        registry.get_or_create("READ", MeasurementKind::Hdr).unwrap();
        assert!(registry.get_or_create("READ", MeasurementKind::Raw).is_err());
    }
}
