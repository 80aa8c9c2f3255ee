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

//! A property bag, built from merged property files and `-p` overrides, with
//! typed accessors that apply the same defaults the teacher's
//! [`crate::workload::default`] module already uses.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};

use crate::measurement::MeasurementKind;
use crate::workload::{default, CoreWorkloadConfig};

/// A mapping from string property names to string values.
///
/// Built once, from `-P` property files (later file wins) then `-p`
/// overrides (win over every file), and passed explicitly to every
/// constructor that needs it. No process-wide statics.
#[derive(Debug, Clone, Default)]
pub struct Config {
    properties: HashMap<String, String>,
}

impl Config {
    /// Wrap an already-merged property map.
    pub fn new(properties: HashMap<String, String>) -> Self {
        Self { properties }
    }

    /// Merge property files (each later file overriding earlier ones on key
    /// collision) then a list of explicit `key=value` overrides (winning over
    /// every file).
    pub fn from_sources(files: &[impl AsRef<Path>], overrides: &[(String, String)]) -> Result<Self> {
        let mut properties = HashMap::new();
        for file in files {
            let file = file.as_ref();
            let contents = std::fs::read_to_string(file)
                .with_context(|| format!("reading property file {}", file.display()))?;
            for (lineno, line) in contents.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let (key, value) = line.split_once('=').ok_or_else(|| {
                    anyhow!("{}:{}: not a `key=value` line: {line:?}", file.display(), lineno + 1)
                })?;
                properties.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        for (key, value) in overrides {
            properties.insert(key.clone(), value.clone());
        }
        Ok(Self::new(properties))
    }

    /// Raw string value for `key`, or `default` if absent.
    pub fn get_str(&self, key: &str, default: &str) -> String {
        self.properties.get(key).cloned().unwrap_or_else(|| default.to_string())
    }

    /// Raw string value for `key`, if present.
    pub fn get_opt_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Parsed `usize` value for `key`, or `default` if absent.
    pub fn get_usize(&self, key: &str, default: usize) -> Result<usize> {
        self.get_parsed(key, default)
    }

    /// Parsed `u64` value for `key`, or `default` if absent.
    pub fn get_u64(&self, key: &str, default: u64) -> Result<u64> {
        self.get_parsed(key, default)
    }

    /// Parsed `f64` value for `key`, or `default` if absent.
    pub fn get_f64(&self, key: &str, default: f64) -> Result<f64> {
        self.get_parsed(key, default)
    }

    /// Parsed `bool` value for `key`, or `default` if absent.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        self.get_parsed(key, default)
    }

    fn get_parsed<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.properties.get(key) {
            Some(v) => v
                .parse()
                .map_err(|e| anyhow!("property {key}={v:?} is not valid: {e}")),
            None => Ok(default),
        }
    }

    /// The `workload` property, required by spec.md §6. Defaults to `"core"`
    /// since this repo only ships [`crate::workload::CoreWorkload`], but an
    /// explicit mismatching value is still rejected rather than silently
    /// ignored.
    pub fn workload_name(&self) -> Result<String> {
        let name = self.get_str("workload", "core");
        ensure!(name == "core", "unknown workload {name:?}: this build only ships \"core\"");
        Ok(name)
    }

    /// The `-db` adapter name.
    pub fn db_name(&self) -> String {
        self.get_str("db", "basic")
    }

    /// `threadcount`: number of worker threads, at least 1.
    pub fn thread_count(&self) -> Result<usize> {
        let n = self.get_usize("threadcount", 1)?;
        ensure!(n >= 1, "threadcount must be at least 1, got {n}");
        Ok(n)
    }

    /// `target`: total target ops/sec across all workers, or `None` for unthrottled.
    pub fn target_ops_per_sec(&self) -> Result<Option<u64>> {
        match self.get_opt_str("target") {
            None => Ok(None),
            Some(v) => {
                let target: u64 = v
                    .parse()
                    .map_err(|e| anyhow!("property target={v:?} is not valid: {e}"))?;
                ensure!(target > 0, "target must be positive if set, got {target}");
                Ok(Some(target))
            }
        }
    }

    /// `maxexecutiontime`, in seconds; `None` means run to `operationcount` / `recordcount`.
    pub fn max_execution_time_secs(&self) -> Result<Option<u64>> {
        match self.get_opt_str("maxexecutiontime") {
            None => Ok(None),
            Some(v) => Ok(Some(
                v.parse()
                    .map_err(|e| anyhow!("property maxexecutiontime={v:?} is not valid: {e}"))?,
            )),
        }
    }

    /// `operationcount`: total number of operations across all workers during TRANSACTIONS.
    pub fn operation_count(&self) -> Result<usize> {
        self.get_usize("operationcount", 0)
    }

    /// `measurementtype`: which [`MeasurementKind`] new metrics use.
    pub fn measurement_kind(&self) -> Result<MeasurementKind> {
        match self.get_str("measurementtype", "hdrhistogram").as_str() {
            "hdrhistogram" => Ok(MeasurementKind::Hdr),
            "histogram" => Ok(MeasurementKind::Bucket),
            "raw" => Ok(MeasurementKind::Raw),
            "hdrhistogram+histogram" => Ok(MeasurementKind::Pair),
            "timeseries" => {
                let granularity = self.get_u64("measurement.interval", 1000)? / 1000;
                Ok(MeasurementKind::TimeSeries(granularity.max(1)))
            }
            other => bail!("unknown measurementtype: {other}"),
        }
    }

    /// `status.interval`, in seconds (default 10, matching YCSB).
    pub fn status_interval_secs(&self) -> Result<u64> {
        self.get_u64("status.interval", 10)
    }

    /// `-s`: whether to emit status lines at all.
    pub fn status_enabled(&self) -> Result<bool> {
        self.get_bool("status", false)
    }

    /// `-l LABEL`: label prefixed to status output.
    pub fn status_label(&self) -> String {
        self.get_str("label", "")
    }

    /// Percentiles the exporter reports, default `{50, 75, 95, 99, 99.9, 99.99}`.
    pub fn export_percentiles(&self) -> Result<Vec<f64>> {
        match self.get_opt_str("exportpercentiles") {
            None => Ok(crate::measurement::DEFAULT_PERCENTILES.to_vec()),
            Some(v) => v
                .split(',')
                .map(|p| {
                    p.trim()
                        .parse::<f64>()
                        .map_err(|e| anyhow!("invalid percentile {p:?}: {e}"))
                })
                .collect(),
        }
    }

    /// `exporter`: `"text"` (default, `[METRIC]`/`[TOTAL]` lines) or `"json"`.
    pub fn exporter_name(&self) -> String {
        self.get_str("exporter", "text")
    }

    /// `exportfile`: optional path the exporter writes to instead of stdout.
    pub fn export_file(&self) -> Option<&str> {
        self.get_opt_str("exportfile")
    }

    /// Whether to additionally persist an HDR histogram log per metric.
    pub fn hdr_file_output(&self) -> Result<bool> {
        self.get_bool("hdrhistogram.fileoutput", false)
    }

    /// Directory/prefix HDR logs are written under, when enabled.
    pub fn hdr_output_path(&self) -> String {
        self.get_str("hdrhistogram.output.path", "")
    }

    /// `acknowledged.window.bits`: `log2` of the in-flight insert window size.
    pub fn acknowledged_window_bits(&self) -> Result<u32> {
        let bits = self.get_u64("acknowledged.window.bits", 20)?;
        ensure!(bits > 0 && bits < 32, "acknowledged.window.bits must be in 1..32, got {bits}");
        Ok(bits as u32)
    }

    /// `RUST_LOG`-style log filter; `-p log=LEVEL` wins over the environment variable.
    pub fn log_filter(&self) -> String {
        self.get_opt_str("log")
            .map(str::to_string)
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string())
    }

    /// Build a [`CoreWorkloadConfig`] from the YCSB-style (no-underscore) property
    /// names, applying the same defaults as [`crate::workload::default`].
    pub fn core_workload_config(&self) -> Result<CoreWorkloadConfig> {
        Ok(CoreWorkloadConfig {
            table: self.get_str("table", &default::table()),
            fields: self.get_usize("fieldcount", default::fields())?,
            field_name_prefix: self.get_str("fieldnameprefix", &default::field_name_prefix()),
            field_length_distribution: self
                .get_str("fieldlengthdistribution", &default::field_length_distribution()),
            min_field_length: self.get_usize("minfieldlength", default::min_field_length())?,
            max_field_length: self.get_usize("fieldlength", default::max_field_length())?,
            field_length_histogram_file: self
                .get_str("fieldlengthhistogramfile", &default::field_length_histogram_file()),
            hotspot_data_fraction: self.get_f64("hotspotdatafraction", default::hotspot_data_fraction())?,
            hotspot_op_fraction: self.get_f64("hotspotopfraction", default::hotspot_op_fraction())?,
            exponential_percentile: self
                .get_f64("exponentialpercentile", default::exponential_percentile())?,
            exponential_frac: self.get_f64("exponentialfrac", default::exponential_frac())?,
            record_count: self.get_usize("recordcount", default::record_count())?,
            request_distribution: self.get_str("requestdistribution", &default::request_distribution()),
            scan_length_distribution: self
                .get_str("scanlengthdistribution", &default::scan_length_distribution()),
            min_scan_length: self.get_usize("minscanlength", default::min_scan_length())?,
            max_scan_length: self.get_usize("maxscanlength", default::max_scan_length())?,
            insert_start: self.get_usize("insertstart", default::insert_start())?,
            zero_padding: self.get_usize("zeropadding", default::zero_padding())?,
            read_all_fields: self.get_bool("readallfields", default::read_all_fields())?,
            read_all_fields_by_name: self
                .get_bool("readallfieldsbyname", default::read_all_fields_by_name())?,
            write_all_fields: self.get_bool("writeallfields", default::write_all_fields())?,
            data_integrity: self.get_bool("dataintegrity", default::data_integrity())?,
            insert_order: self.get_str("insertorder", &default::insert_order()),
            read_proportion: self.get_f64("readproportion", default::read_proportion())?,
            update_proportion: self.get_f64("updateproportion", default::update_proportion())?,
            insert_proportion: self.get_f64("insertproportion", default::insert_proportion())?,
            scan_proportion: self.get_f64("scanproportion", default::scan_proportion())?,
            insertion_retry_limit: self.get_usize("insertionretrylimit", default::insertion_retry_limit())?,
            insertion_retry_interval: self
                .get_usize("insertionretryinterval", default::insertion_retry_interval())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        Config::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn typed_accessors_fall_back_to_defaults() {
        let c = Config::default();
        assert_eq!(c.get_usize("threadcount", 1).unwrap(), 1);
        assert_eq!(c.get_str("table", "ycsb"), "ycsb");
    }

    #[test]
    fn typed_accessors_parse_present_values() {
        let c = config(&[("threadcount", "8"), ("readproportion", "0.5")]);
        assert_eq!(c.thread_count().unwrap(), 8);
        assert_eq!(c.get_f64("readproportion", 0.0).unwrap(), 0.5);
    }

    #[test]
    fn rejects_unparseable_values() {
        let c = config(&[("threadcount", "nope")]);
        assert!(c.thread_count().is_err());
    }

    #[test]
    fn unknown_workload_name_is_rejected() {
        let c = config(&[("workload", "other")]);
        assert!(c.workload_name().is_err());
    }

    #[test]
    fn core_workload_config_applies_ycsb_style_keys() {
        let c = config(&[("fieldcount", "3"), ("fieldlength", "100"), ("zeropadding", "8")]);
        let cfg = c.core_workload_config().unwrap();
        assert_eq!(cfg.fields, 3);
        assert_eq!(cfg.max_field_length, 100);
        assert_eq!(cfg.zero_padding, 8);
    }
}
