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
use super::Generator;

/// Draws a Zipfian-distributed index and returns `values[index]`.
pub struct ListZipfianGenerator<T> {
    values: Vec<T>,
    index: ZipfianGenerator,
}

impl<T: Clone> ListZipfianGenerator<T> {
    /// Create a generator that returns Zipfian-skewed draws from `values`.
    pub fn new(values: Vec<T>) -> Result<Self> {
        Self::with_theta(values, ZIPFIAN_CONSTANT)
    }

    /// Create a generator that returns Zipfian-skewed draws from `values` with
    /// an explicit skew `theta`.
    pub fn with_theta(values: Vec<T>, theta: f64) -> Result<Self> {
        ensure!(!values.is_empty(), "list zipfian requires a non-empty list");
        let index = ZipfianGenerator::with_theta(0, values.len() as u64 - 1, theta)?;
        Ok(Self { values, index })
    }
}

impl<T: Clone> Generator for ListZipfianGenerator<T> {
    type Output = T;

    fn next(&self) -> Self::Output {
        let idx = self.index.next() as usize;
        self.values[idx].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_list() {
        assert!(ListZipfianGenerator::<u32>::new(vec![]).is_err());
    }

    #[test]
    fn returns_only_listed_values() {
        let g = ListZipfianGenerator::new(vec!["a", "b", "c"]).unwrap();
        for _ in 0..1000 {
            assert!(["a", "b", "c"].contains(&g.next()));
        }
    }
}
