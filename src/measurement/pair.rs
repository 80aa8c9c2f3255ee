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

use super::bucket::BucketMeasurement;
use super::hdr::HdrMeasurement;
use super::Summary;

/// Records into both an [`HdrMeasurement`] and a [`BucketMeasurement`] at
/// once, for callers who want the bucket histogram's cheap coarse export
/// alongside the HDR histogram's precise one without picking a single kind.
pub struct PairMeasurement {
    hdr: HdrMeasurement,
    bucket: BucketMeasurement,
}

impl PairMeasurement {
    /// Create a paired measurement with a default 1000-bucket, 1us-wide bucket histogram.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            hdr: HdrMeasurement::new()?,
            bucket: BucketMeasurement::new(1000, 1),
        })
    }

    /// Record one value, in microseconds, into both underlying histograms.
    pub fn record(&self, value_micros: u64) {
        self.hdr.record(value_micros);
        self.bucket.record(value_micros);
    }

    /// Summarize using the HDR histogram; the bucket histogram exists for
    /// callers that want the coarser export specifically.
    pub fn summary(&self, percentiles: &[f64]) -> Summary {
        self.hdr.summary(percentiles)
    }

    /// Summarize using the bucket histogram specifically.
    pub fn bucket_summary(&self, percentiles: &[f64]) -> Summary {
        self.bucket.summary(percentiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_histograms_see_every_value() {
        let m = PairMeasurement::new().unwrap();
        for v in 1..=50 {
            m.record(v);
        }
        assert_eq!(m.summary(&[50.0]).count, 50);
        assert_eq!(m.bucket_summary(&[50.0]).count, 50);
    }
}
