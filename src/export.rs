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

//! Renders a finished run's measurement summary: the default `[METRIC]`/
//! `[TOTAL]` text format, or `-p exporter=json`.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::measurement::Summary;

/// Totals describing the run as a whole, independent of any one metric.
#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    /// Number of operations completed.
    pub operations: u64,
    /// Wall-clock run duration.
    pub runtime_ms: u64,
    /// `operations / runtime`, in ops/sec.
    pub throughput_ops_per_sec: f64,
}

/// Everything exported at the end of a run.
#[derive(Debug, Clone)]
pub struct Report {
    /// Run-wide totals.
    pub totals: Totals,
    /// Per-metric summaries, in the order [`crate::measurement::Registry::summary`] returns them.
    pub metrics: Vec<(String, Summary)>,
}

/// Writes a [`Report`] in some serialization.
pub trait Exporter {
    /// Write `report` to `out`.
    fn export(&self, report: &Report, out: &mut dyn Write) -> Result<()>;
}

/// The `[METRIC]`/`[TOTAL]` line format from spec.md §6.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export(&self, report: &Report, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "[TOTAL], operations, {}", report.totals.operations)?;
        writeln!(out, "[TOTAL], runtime(ms), {}", report.totals.runtime_ms)?;
        writeln!(
            out,
            "[TOTAL], throughput(ops/sec), {:.2}",
            report.totals.throughput_ops_per_sec
        )?;

        for (name, summary) in &report.metrics {
            writeln!(out, "[{name}], Operations, {}", summary.count)?;
            writeln!(out, "[{name}], AverageLatency(us), {:.2}", summary.mean)?;
            writeln!(out, "[{name}], MinLatency(us), {}", summary.min)?;
            writeln!(out, "[{name}], MaxLatency(us), {}", summary.max)?;
            for (p, value) in &summary.percentiles {
                writeln!(out, "[{name}], {p}Percentile(us), {value}")?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonMetric {
    name: String,
    count: u64,
    min: u64,
    max: u64,
    mean: f64,
    percentiles: Vec<(f64, u64)>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    totals: &'a Totals,
    metrics: Vec<JsonMetric>,
}

/// `-p exporter=json`: the same fields, `serde_json`-serialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export(&self, report: &Report, out: &mut dyn Write) -> Result<()> {
        let json = JsonReport {
            totals: &report.totals,
            metrics: report
                .metrics
                .iter()
                .map(|(name, s)| JsonMetric {
                    name: name.clone(),
                    count: s.count,
                    min: s.min,
                    max: s.max,
                    mean: s.mean,
                    percentiles: s.percentiles.clone(),
                })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &json)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Resolve `-p exporter=...` (default `"text"`) to an [`Exporter`].
pub fn by_name(name: &str) -> Result<Box<dyn Exporter>> {
    match name {
        "text" => Ok(Box::new(TextExporter)),
        "json" => Ok(Box::new(JsonExporter)),
        other => anyhow::bail!("unknown exporter: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        Report {
            totals: Totals {
                operations: 1000,
                runtime_ms: 500,
                throughput_ops_per_sec: 2000.0,
            },
            metrics: vec![(
                "READ".to_string(),
                Summary {
                    count: 1000,
                    min: 10,
                    max: 500,
                    mean: 42.5,
                    percentiles: vec![(50.0, 40), (99.0, 200)],
                },
            )],
        }
    }

    #[test]
    fn text_exporter_emits_total_and_metric_lines() {
        let mut buf = Vec::new();
        TextExporter.export(&sample_report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("[TOTAL], operations, 1000"));
        assert!(text.contains("[READ], Operations, 1000"));
        assert!(text.contains("[READ], 99Percentile(us), 200"));
    }

    #[test]
    fn json_exporter_round_trips_as_valid_json() {
        let mut buf = Vec::new();
        JsonExporter.export(&sample_report(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["totals"]["operations"], 1000);
        assert_eq!(value["metrics"][0]["name"], "READ");
    }

    #[test]
    fn by_name_rejects_unknown_exporter() {
        assert!(by_name("xml").is_err());
    }
}
