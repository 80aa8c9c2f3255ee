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

use std::io::Write;

use anyhow::{Context, Result};
use ycsb_core::cli::Cli;
use ycsb_core::{export, orchestrator};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse(std::env::args())?;
    let config = cli.config()?;

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let report = orchestrator::run(&config, cli.stage).context("run failed")?;

    let exporter = export::by_name(&config.exporter_name())?;
    match config.export_file() {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("creating export file {path}"))?;
            exporter.export(&report, &mut file)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            exporter.export(&report, &mut lock)?;
            lock.flush()?;
        }
    }

    Ok(())
}
