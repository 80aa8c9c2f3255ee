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

use std::collections::HashMap;

use crate::db::Db;

/// Reference in-memory adapter; ships with this repo so the CLI and test
/// suite are runnable without an external database.
pub mod basic;

/// Constructs the backing store for one run. Called once per `run`; the
/// result is shared (via `Arc`) across every worker thread, so adapters that
/// hold real connections or in-memory state see every worker's writes.
pub type DbConstructor = fn() -> Box<dyn Db<Config = ()> + Send + Sync>;

/// Maps a `-db` name to the constructor for its adapter.
///
/// External adapter crates extend the benchmark by registering into a table
/// built the same way, keyed by the name passed on the command line.
pub fn registry() -> HashMap<&'static str, DbConstructor> {
    let mut m: HashMap<&'static str, DbConstructor> = HashMap::new();
    m.insert("basic", || Box::new(basic::BasicDb::new()));
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_is_registered() {
        assert!(registry().contains_key("basic"));
    }
}
