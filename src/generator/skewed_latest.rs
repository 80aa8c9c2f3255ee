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

use std::sync::Arc;

use anyhow::Result;

use super::zipfian::ZipfianGenerator;
use super::{Counter, Generator};

/// Reads biased toward the newest acknowledged inserts.
///
/// Reads the current `limit` of an acknowledged counter, subtracts a
/// Zipfian-distributed offset, and clamps to the start of the keyspace — the
/// hottest key is always "whatever was most recently durably inserted".
pub struct SkewedLatestGenerator<C> {
    counter: Arc<C>,
    offset: ZipfianGenerator,
}

impl<C> SkewedLatestGenerator<C>
where
    C: Counter<Output = usize>,
{
    /// Create a generator biased toward the most recently acknowledged keys.
    pub fn new(counter: Arc<C>) -> Result<Self> {
        let last = counter.last() as u64;
        let offset = ZipfianGenerator::new(0, last.max(1))?;
        Ok(Self { counter, offset })
    }
}

impl<C> Generator for SkewedLatestGenerator<C>
where
    C: Counter<Output = usize>,
{
    type Output = usize;

    fn next(&self) -> Self::Output {
        let last = self.counter.last();
        self.offset.grow_items((last as u64).max(1));
        let delta = self.offset.next() as usize;
        last.saturating_sub(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::acknowledge::AcknowledgedUsizeCounter;
    use crate::generator::AcknowledgedCounter;

    #[test]
    fn never_exceeds_last_acknowledged() {
        let counter = Arc::new(AcknowledgedUsizeCounter::new(0));
        for i in 0..1000 {
            let v = counter.next();
            counter.acknowledge(v);
            let _ = i;
        }
        let gen = SkewedLatestGenerator::new(counter.clone()).unwrap();
        let last = counter.last();
        for _ in 0..1000 {
            assert!(gen.next() <= last);
        }
    }
}
