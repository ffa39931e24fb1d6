//! Run reports: per-phase durations with text and JSON rendering.

use crate::config::HarnessConfig;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::time::Duration;

/// Identity of the machine a run executed on.
#[derive(Debug, Clone, Serialize)]
pub struct HostInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
}

impl HostInfo {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            family: std::env::consts::FAMILY,
        }
    }
}

/// Parameters the run executed with.
#[derive(Debug, Clone, Serialize)]
pub struct RunParams {
    pub dir_count: u32,
    pub dir_depth: u32,
    pub files_per_dir: u32,
    pub string_iterations: u64,
}

impl From<&HarnessConfig> for RunParams {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            dir_count: config.tree.dir_count,
            dir_depth: config.tree.dir_depth,
            files_per_dir: config.tree.files_per_dir,
            string_iterations: config.string_iterations,
        }
    }
}

/// One timed phase of a run.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub name: String,
    pub duration_ms: u64,

    /// Files seen during a traversal phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<u64>,

    /// Directories seen during a traversal phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dirs: Option<u64>,

    /// Loop count of a string phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,
}

impl PhaseReport {
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            files: None,
            dirs: None,
            iterations: None,
        }
    }

    pub fn with_visits(mut self, files: u64, dirs: u64) -> Self {
        self.files = Some(files);
        self.dirs = Some(dirs);
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    fn detail(&self) -> String {
        match (self.files, self.dirs, self.iterations) {
            (Some(files), Some(dirs), _) => format!("{} files, {} dirs", files, dirs),
            (_, _, Some(iterations)) => format!("{} iterations", iterations),
            _ => "-".to_string(),
        }
    }
}

/// Full report for one benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub host: HostInfo,
    pub volume: String,
    pub params: RunParams,
    pub phases: Vec<PhaseReport>,
}

impl RunReport {
    pub fn new(volume: impl Into<String>, config: &HarnessConfig) -> Self {
        Self {
            host: HostInfo::current(),
            volume: volume.into(),
            params: RunParams::from(config),
            phases: Vec::new(),
        }
    }

    pub fn push(&mut self, phase: PhaseReport) {
        self.phases.push(phase);
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable rendering: a header block plus one table row per phase.
    pub fn to_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Phase", "Duration", "Detail"]);
        for phase in &self.phases {
            table.add_row(vec![
                Cell::new(&phase.name),
                Cell::new(format_duration_ms(phase.duration_ms)),
                Cell::new(phase.detail()),
            ]);
        }

        format!(
            "{}\nhost: {}/{} ({})\nvolume: {}\ntree: {} x depth {} x {} files, {} string iterations\n{}",
            "Benchmark results".bold(),
            self.host.os,
            self.host.arch,
            self.host.family,
            self.volume,
            self.params.dir_count,
            self.params.dir_depth,
            self.params.files_per_dir,
            self.params.string_iterations,
            table
        )
    }
}

/// Render a duration the way the phase logs do, seconds plus leftover
/// milliseconds.
pub fn format_duration(duration: Duration) -> String {
    format_duration_ms(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

fn format_duration_ms(total_ms: u64) -> String {
    format!("{} s {} ms", total_ms / 1000, total_ms % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_splits_into_seconds_and_millis() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0 s 0 ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "0 s 999 ms");
        assert_eq!(format_duration(Duration::from_millis(2345)), "2 s 345 ms");
    }

    #[test]
    fn phase_detail_prefers_visit_counts() {
        let phase = PhaseReport::new("tree/walk", Duration::from_millis(10)).with_visits(125, 25);
        assert_eq!(phase.detail(), "125 files, 25 dirs");

        let phase =
            PhaseReport::new("strings/manual", Duration::from_millis(1)).with_iterations(10_000);
        assert_eq!(phase.detail(), "10000 iterations");

        let phase = PhaseReport::new("tree/generate", Duration::from_millis(5));
        assert_eq!(phase.detail(), "-");
    }

    #[test]
    fn json_rendering_is_structured() {
        let mut report = RunReport::new("memory", &HarnessConfig::default());
        report.push(PhaseReport::new("tree/generate", Duration::from_millis(7)));

        let value: serde_json::Value =
            serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["volume"], "memory");
        assert_eq!(value["params"]["dir_count"], 5);
        assert_eq!(value["phases"][0]["name"], "tree/generate");
        assert_eq!(value["phases"][0]["duration_ms"], 7);
        // optional fields stay absent when unset
        assert!(value["phases"][0].get("files").is_none());
    }

    #[test]
    fn table_rendering_lists_every_phase() {
        let mut report = RunReport::new("memory", &HarnessConfig::default());
        report.push(PhaseReport::new("tree/generate", Duration::from_millis(7)));
        report.push(PhaseReport::new("tree/walk", Duration::from_millis(3)).with_visits(6, 2));

        let rendered = report.to_table();

        assert!(rendered.contains("tree/generate"));
        assert!(rendered.contains("tree/walk"));
        assert!(rendered.contains("6 files, 2 dirs"));
        assert!(rendered.contains("volume: memory"));
    }
}
