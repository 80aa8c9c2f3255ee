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

use super::Generator;

/// Choice of the generated value of [`DiscreteGenerator`].
pub struct Choice<T> {
    /// Value to generate.
    pub val: T,
    /// Possibility weight of the choice.
    pub weight: f64,
}

/// Generates a distribution by choosing from a discrete set of weighted values.
///
/// Also known as a weighted operation picker: labels with non-positive weight
/// are dropped at construction, and construction fails if no positive weight
/// remains.
pub struct DiscreteGenerator<T> {
    choices: Vec<Choice<T>>,
    sum: f64,
}

impl<T> DiscreteGenerator<T> {
    /// Create a generator that generates a distribution by choosing from a discrete set of values.
    ///
    /// Choices with `weight <= 0.0` are dropped silently (matching the
    /// original workload's treatment of zero-proportion operations).
    pub fn new(choices: Vec<Choice<T>>) -> Result<Self> {
        let choices: Vec<_> = choices.into_iter().filter(|c| c.weight > 0.0).collect();
        ensure!(!choices.is_empty(), "no choices with positive weight remain");
        let sum = choices.iter().map(|choice| choice.weight).sum();
        Ok(Self { choices, sum })
    }
}

impl<T> Generator for DiscreteGenerator<T>
where
    T: Clone,
{
    type Output = T;

    fn next(&self) -> Self::Output {
        let target = thread_rng().gen_range(0.0..self.sum);
        let mut acc = 0.0;
        for choice in self.choices.iter() {
            acc += choice.weight;
            if target < acc {
                return choice.val.clone();
            }
        }
        unreachable!()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_all_non_positive_weights() {
        let choices = vec![
            Choice { val: 'a', weight: 0.0 },
            Choice { val: 'b', weight: -1.0 },
        ];
        assert!(DiscreteGenerator::new(choices).is_err());
    }

    #[test]
    fn drops_non_positive_and_converges_to_weights() {
        let choices = vec![
            Choice { val: 'a', weight: 0.0 },
            Choice { val: 'b', weight: 3.0 },
            Choice { val: 'c', weight: 1.0 },
        ];
        let gen = DiscreteGenerator::new(choices).unwrap();
        let mut b = 0u32;
        let mut c = 0u32;
        let n = 100_000;
        for _ in 0..n {
            match gen.next() {
                'b' => b += 1,
                'c' => c += 1,
                other => panic!("unexpected value {other}, weight-0 choice should be dropped"),
            }
        }
        let ratio = b as f64 / c as f64;
        assert!((2.0..4.0).contains(&ratio), "expected ~3:1, got {ratio}");
    }
}
