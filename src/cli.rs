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

//! Command-line surface: `-threads`, `-target`, `-load`, `-t`, `-db`, `-P`,
//! `-p`, `-s`, `-l`.
//!
//! The grammar (single-dash multi-letter flags, a repeatable `-p key=value`)
//! doesn't fit `clap`'s attribute-derive model, so this uses the builder API
//! directly, the same way `clap::Arg::new(..).action(ArgAction::Append)` is
//! used elsewhere in the pack for repeatable flags.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, Command};

use crate::config::Config;
use crate::worker::Stage;

/// Parsed command line.
#[derive(Debug, Clone)]
pub struct Cli {
    /// `-load` / `-t`.
    pub stage: Stage,
    /// `-threads N`, overriding `threadcount` from the property files.
    pub threads: Option<usize>,
    /// `-target N`, overriding `target`.
    pub target: Option<u64>,
    /// `-db CLASS`, overriding `db`.
    pub db: Option<String>,
    /// `-P FILE`, repeatable, later file wins.
    pub property_files: Vec<PathBuf>,
    /// `-p key=value`, repeatable, wins over every file.
    pub properties: Vec<(String, String)>,
    /// `-s`.
    pub status: bool,
    /// `-l LABEL`.
    pub label: Option<String>,
}

fn command() -> Command {
    Command::new("ycsb-core")
        .about("A YCSB-style database benchmarking harness")
        .arg(Arg::new("load").long("load").action(ArgAction::SetTrue))
        .arg(
            Arg::new("transactions")
                .short('t')
                .long("transactions")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("threads").long("threads").value_name("N"))
        .arg(Arg::new("target").long("target").value_name("N"))
        .arg(Arg::new("db").long("db").value_name("CLASS"))
        .arg(
            Arg::new("property-file")
                .short('P')
                .value_name("FILE")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("property")
                .short('p')
                .value_name("KEY=VALUE")
                .action(ArgAction::Append),
        )
        .arg(Arg::new("status").short('s').action(ArgAction::SetTrue))
        .arg(Arg::new("label").short('l').value_name("LABEL"))
}

/// YCSB spells multi-letter flags with a single dash (`-threads`, `-load`,
/// `-db`); `clap` long flags require a double dash. Rewrite `-xy...` (two or
/// more letters after one dash) to `--xy...` before handing argv to `clap`;
/// genuine single-character short flags (`-P`, `-p`, `-s`, `-l`, `-t`) are
/// left untouched.
fn normalize_dashes(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            if arg.len() > 2 && arg.starts_with('-') && !arg.starts_with("--") {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}

impl Cli {
    /// Parse `args` (as from [`std::env::args`]), exiting the process with
    /// `clap`'s usage message on a malformed command line.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let matches = command().try_get_matches_from(normalize_dashes(args))?;

        let load = matches.get_flag("load");
        let transactions = matches.get_flag("transactions");
        if load && transactions {
            return Err(anyhow!("-load and -t are mutually exclusive"));
        }
        let stage = if load { Stage::Load } else { Stage::Transactions };

        let threads = matches
            .get_one::<String>("threads")
            .map(|s| s.parse())
            .transpose()
            .context("-threads must be a number")?;
        let target = matches
            .get_one::<String>("target")
            .map(|s| s.parse())
            .transpose()
            .context("-target must be a number")?;
        let db = matches.get_one::<String>("db").cloned();

        let property_files = matches
            .get_many::<String>("property-file")
            .into_iter()
            .flatten()
            .map(PathBuf::from)
            .collect();

        let properties = matches
            .get_many::<String>("property")
            .into_iter()
            .flatten()
            .map(|kv| {
                kv.split_once('=')
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .ok_or_else(|| anyhow!("-p {kv:?} is not a key=value pair"))
            })
            .collect::<Result<Vec<_>>>()?;

        let status = matches.get_flag("status");
        let label = matches.get_one::<String>("label").cloned();

        Ok(Self {
            stage,
            threads,
            target,
            db,
            property_files,
            properties,
            status,
            label,
        })
    }

    /// Build the merged [`Config`]: property files, then `-p` overrides,
    /// then this command's own flags (`-threads`/`-target`/`-db`/`-s`/`-l`),
    /// which win over everything since they were spelled out explicitly on
    /// this invocation.
    pub fn config(&self) -> Result<Config> {
        let mut overrides = self.properties.clone();
        if let Some(threads) = self.threads {
            overrides.push(("threadcount".to_string(), threads.to_string()));
        }
        if let Some(target) = self.target {
            overrides.push(("target".to_string(), target.to_string()));
        }
        if let Some(db) = &self.db {
            overrides.push(("db".to_string(), db.clone()));
        }
        if self.status {
            overrides.push(("status".to_string(), "true".to_string()));
        }
        if let Some(label) = &self.label {
            overrides.push(("label".to_string(), label.clone()));
        }
        Config::from_sources(&self.property_files, &overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        std::iter::once("ycsb-core".to_string())
            .chain(s.iter().map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn parses_ycsb_style_single_dash_flags() {
        let cli = Cli::parse(args(&[
            "-load",
            "-threads",
            "8",
            "-target",
            "1000",
            "-db",
            "basic",
            "-P",
            "a.properties",
            "-P",
            "b.properties",
            "-p",
            "recordcount=100",
            "-s",
            "-l",
            "mylabel",
        ]))
        .unwrap();

        assert_eq!(cli.stage, Stage::Load);
        assert_eq!(cli.threads, Some(8));
        assert_eq!(cli.target, Some(1000));
        assert_eq!(cli.db.as_deref(), Some("basic"));
        assert_eq!(cli.property_files, vec![PathBuf::from("a.properties"), PathBuf::from("b.properties")]);
        assert_eq!(cli.properties, vec![("recordcount".to_string(), "100".to_string())]);
        assert!(cli.status);
        assert_eq!(cli.label.as_deref(), Some("mylabel"));
    }

    #[test]
    fn defaults_to_transactions_stage() {
        let cli = Cli::parse(args(&[])).unwrap();
        assert_eq!(cli.stage, Stage::Transactions);
    }

    #[test]
    fn load_and_transactions_flags_are_exclusive() {
        assert!(Cli::parse(args(&["-load", "-t"])).is_err());
    }

    #[test]
    fn rejects_malformed_property() {
        assert!(Cli::parse(args(&["-p", "notakeyvalue"])).is_err());
    }

    #[test]
    fn flags_win_over_property_files_in_merged_config() {
        let cli = Cli::parse(args(&["-threads", "4"])).unwrap();
        let config = cli.config().unwrap();
        assert_eq!(config.thread_count().unwrap(), 4);
    }
}
