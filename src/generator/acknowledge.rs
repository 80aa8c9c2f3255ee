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

use super::{AcknowledgedCounter, Counter, Generator};

use paste::paste;

use std::sync::atomic::{
    AtomicBool, AtomicI16, AtomicI32, AtomicI64, AtomicI8, AtomicIsize, AtomicU16, AtomicU32,
    AtomicU64, AtomicU8, AtomicUsize, Ordering,
};

use itertools::Itertools;
use parking_lot::RwLock;

/// Default window size: in-flight inserts must never exceed this many slots.
pub const DEFAULT_WINDOW_BITS: u32 = 20;

macro_rules! acknowledged {
    ($( {$atype:ty, $type:ty, $name:ident}, )*) => {
        paste! {
            $(
                /// Counter with an out-of-order acknowledgement protocol: producers call
                /// `next()` to reserve an ID, consumers call `acknowledge(id)` once the
                /// insertion is durable, and `last()` publishes the largest ID such that
                /// every ID in `[start, last()]` has been acknowledged.
                #[derive(Debug)]
                pub struct [<Acknowledged $name Counter>] {
                    // Relaxed is sufficient here: the only contract on `counter` is
                    // uniqueness of the dispensed value, not ordering with other memory.
                    counter: $atype,
                    windows: Vec<AtomicBool>,
                    window_mask: usize,
                    limit: RwLock<$type>,
                }

                impl [<Acknowledged $name Counter>] {
                    /// Create a counter that starts at `start`, using the default window size.
                    pub fn new(start: $type) -> Self {
                        Self::with_window_bits(start, DEFAULT_WINDOW_BITS)
                    }

                    /// Create a counter that starts at `start`, with a window of `2^bits` slots.
                    ///
                    /// In-flight (dispensed-but-unacknowledged) IDs must never exceed
                    /// `2^bits - 1` at once, or [`AcknowledgedCounter::acknowledge`] panics.
                    pub fn with_window_bits(start: $type, bits: u32) -> Self {
                        let window_size = 1usize << bits;
                        Self {
                            counter: $atype::new(start),
                            windows: (0..window_size).map(|_| AtomicBool::new(false)).collect_vec(),
                            window_mask: window_size - 1,
                            // `start` may be 0 (YCSB's default `insertstart`), so this can't
                            // be a plain `start - 1`; wrapping to the type's max is the
                            // "nothing acknowledged yet" sentinel one below `start`, and
                            // `acknowledge` advances out of it with the matching wrapping op.
                            limit: RwLock::new(start.wrapping_sub(1)),
                        }
                    }
                }

                impl Generator for [<Acknowledged $name Counter>] {
                    type Output = $type;

                    fn next(&self) -> Self::Output {
                        self.counter.fetch_add(1, Ordering::Relaxed)
                    }
                }

                impl Counter for [<Acknowledged $name Counter>] {
                    fn last(&self) -> Self::Output {
                        *self.limit.read()
                    }
                }

                impl AcknowledgedCounter for [<Acknowledged $name Counter>] {
                    fn acknowledge(&self, val: Self::Output) {
                        let slot = val as usize & self.window_mask;
                        if self.windows[slot].fetch_or(true, Ordering::SeqCst) {
                            panic!("Too many unacknowledged insertion keys.");
                        }

                        if let Some(mut limit) = self.limit.try_write() {
                            let stop = *limit as usize & self.window_mask;
                            let mut index = limit.wrapping_add(1);
                            while index as usize & self.window_mask != stop {
                                let slot = index as usize & self.window_mask;
                                if !self.windows[slot].load(Ordering::SeqCst) {
                                    break;
                                }
                                self.windows[slot].store(false, Ordering::SeqCst);
                                index = index.wrapping_add(1);
                            }
                            *limit = index.wrapping_sub(1);
                        }
                    }
                }
            )*
        }
    };
}

macro_rules! for_all_numeric_types {
    ($macro:ident) => {
        $macro! {
            {AtomicU8, u8, U8},
            {AtomicU16, u16, U16},
            {AtomicU32, u32, U32},
            {AtomicU64, u64, U64},
            {AtomicUsize, usize, Usize},
            {AtomicI8, i8, I8},
            {AtomicI16, i16, I16},
            {AtomicI32, i32, I32},
            {AtomicI64, i64, I64},
            {AtomicIsize, isize, Isize},
        }
    };
}

for_all_numeric_types! { acknowledged }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_and_bounded_by_acknowledged() {
        let c = AcknowledgedUsizeCounter::new(0);
        let ids: Vec<_> = (0..100).map(|_| c.next()).collect();
        // acknowledge out of order, leaving a gap at id 5.
        for &id in ids.iter().filter(|&&id| id != 5) {
            c.acknowledge(id);
        }
        assert_eq!(c.last(), 4);
        c.acknowledge(5);
        assert_eq!(c.last(), 99);
    }

    #[test]
    #[should_panic(expected = "Too many unacknowledged")]
    fn double_acknowledge_panics() {
        let c = AcknowledgedUsizeCounter::with_window_bits(0, 4);
        // Leave id 0 unacknowledged so the chain can't advance past it; that
        // keeps id 1's window slot set after its first acknowledge instead of
        // being cleared, so acknowledging it again finds the slot already set.
        let _gap = c.next();
        let id = c.next();
        c.acknowledge(id);
        c.acknowledge(id);
    }
}
