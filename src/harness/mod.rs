//! Benchmark Harness
//!
//! Drives one full run: volume setup (mount plus format), the timed tree
//! generation and traversal phases, and the three string-concatenation
//! loops. Setup failures are fatal; phase-level failures are logged by the
//! tree routines and the run continues with whatever scope remains.

pub mod report;

pub use report::{HostInfo, PhaseReport, RunParams, RunReport};

use crate::config::HarnessConfig;
use crate::error::SetupError;
use crate::strings;
use crate::tree::{generator, walker};
use crate::volume::Volume;
use report::format_duration;
use std::time::Instant;
use tracing::{error, info};

/// Base name for the top-level tree directories; an index is appended.
const DIR_BASE_NAME: &str = "directory";

/// Base name for generated files; an index is appended.
const FILE_BASE_NAME: &str = "file";

pub struct Harness<'a> {
    volume: &'a mut dyn Volume,
    label: String,
    config: HarnessConfig,
}

impl<'a> Harness<'a> {
    pub fn new(volume: &'a mut dyn Volume, label: impl Into<String>, config: HarnessConfig) -> Self {
        Self {
            volume,
            label: label.into(),
            config,
        }
    }

    /// Mount and format the volume. Either failure ends the run.
    fn setup(&mut self) -> Result<(), SetupError> {
        info!("Mounting filesystem");
        self.volume.mount(true).map_err(|err| {
            error!(%err, "Mounting filesystem failed");
            SetupError::Mount(err)
        })?;

        info!("Formatting filesystem");
        self.volume.format().map_err(|err| {
            error!(%err, "Formatting filesystem failed");
            SetupError::Format(err)
        })?;
        Ok(())
    }

    /// Execute all phases against a freshly formatted volume.
    pub fn run(&mut self, list_visits: bool) -> Result<RunReport, SetupError> {
        self.setup()?;

        let mut run_report = RunReport::new(self.label.clone(), &self.config);
        run_report.push(self.generate_phase());
        run_report.push(self.walk_phase(list_visits));

        let mut text_buf = String::with_capacity(strings::SCRATCH_LEN);
        run_report.push(self.string_phase("strings/formatted", || {
            strings::concat_formatted(&mut text_buf);
            std::hint::black_box(&text_buf);
        }));
        run_report.push(self.string_phase("strings/copy_append", || {
            strings::concat_copy_append(&mut text_buf);
            std::hint::black_box(&text_buf);
        }));

        let mut raw_buf = [0u8; strings::SCRATCH_LEN];
        run_report.push(self.string_phase("strings/manual", || {
            strings::concat_manual(&mut raw_buf);
            std::hint::black_box(&raw_buf);
        }));

        info!("Benchmark run finished");
        Ok(run_report)
    }

    fn generate_phase(&mut self) -> PhaseReport {
        let tree = self.config.tree;
        info!(
            dir_count = tree.dir_count,
            dir_depth = tree.dir_depth,
            files_per_dir = tree.files_per_dir,
            "Creating directories and files"
        );

        let start = Instant::now();
        for index in 0..tree.dir_count {
            let base_dir_name = format!("{}_{}", DIR_BASE_NAME, index);
            generator::generate(
                &*self.volume,
                "/",
                &base_dir_name,
                FILE_BASE_NAME,
                tree.dir_depth,
                tree.files_per_dir,
            );
        }
        let duration = start.elapsed();

        info!(duration = %format_duration(duration), "Tree generation finished");
        PhaseReport::new("tree/generate", duration)
    }

    fn walk_phase(&mut self, list_visits: bool) -> PhaseReport {
        info!("Walking the directory tree");

        let start = Instant::now();
        let stats = walker::walk_root(&*self.volume, list_visits);
        let duration = start.elapsed();

        info!(
            files = stats.files,
            dirs = stats.dirs_entered,
            duration = %format_duration(duration),
            "Traversal finished"
        );
        PhaseReport::new("tree/walk", duration).with_visits(stats.files, stats.dirs_entered)
    }

    fn string_phase(&self, name: &'static str, mut iteration: impl FnMut()) -> PhaseReport {
        let iterations = self.config.string_iterations;
        info!(phase = name, iterations, "Running string concatenation");

        let start = Instant::now();
        for _ in 0..iterations {
            iteration();
        }
        let duration = start.elapsed();

        info!(phase = name, duration = %format_duration(duration), "String concatenation finished");
        PhaseReport::new(name, duration).with_iterations(iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeParams;
    use crate::volume::MemoryVolume;

    fn small_config() -> HarnessConfig {
        HarnessConfig {
            tree: TreeParams {
                dir_count: 2,
                dir_depth: 2,
                files_per_dir: 2,
            },
            string_iterations: 10,
            ..Default::default()
        }
    }

    #[test]
    fn full_run_reports_five_phases_in_order() {
        let mut volume = MemoryVolume::new();
        let mut harness = Harness::new(&mut volume, "memory", small_config());

        let run_report = harness.run(false).unwrap();

        let names: Vec<&str> = run_report.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "tree/generate",
                "tree/walk",
                "strings/formatted",
                "strings/copy_append",
                "strings/manual",
            ]
        );
        assert_eq!(run_report.volume, "memory");
    }

    #[test]
    fn walk_phase_counts_the_generated_tree() {
        let mut volume = MemoryVolume::new();
        let mut harness = Harness::new(&mut volume, "memory", small_config());

        let run_report = harness.run(false).unwrap();

        let walk = &run_report.phases[1];
        assert_eq!(walk.files, Some(8));
        assert_eq!(walk.dirs, Some(4));
    }

    #[test]
    fn string_phases_record_their_iteration_count() {
        let mut volume = MemoryVolume::new();
        let mut harness = Harness::new(&mut volume, "memory", small_config());

        let run_report = harness.run(false).unwrap();

        for phase in &run_report.phases[2..] {
            assert_eq!(phase.iterations, Some(10));
        }
    }

    #[test]
    fn mount_failure_ends_the_run() {
        let mut volume = MemoryVolume::new();
        volume.fail_mount();
        let mut harness = Harness::new(&mut volume, "memory", small_config());

        let err = harness.run(false).unwrap_err();

        assert!(matches!(err, SetupError::Mount(_)));
    }

    #[test]
    fn format_failure_ends_the_run() {
        let mut volume = MemoryVolume::new();
        volume.fail_format();
        let mut harness = Harness::new(&mut volume, "memory", small_config());

        let err = harness.run(false).unwrap_err();

        assert!(matches!(err, SetupError::Format(_)));
    }

    #[test]
    fn stale_volume_content_is_wiped_before_generation() {
        let mut volume = MemoryVolume::mounted();
        volume.mkdir("/stale").unwrap();
        volume.open_write("/stale/leftover").unwrap();

        let mut harness = Harness::new(&mut volume, "memory", small_config());
        let run_report = harness.run(false).unwrap();

        // only the fresh tree is visited
        assert_eq!(run_report.phases[1].files, Some(8));
        assert_eq!(run_report.phases[1].dirs, Some(4));
    }

    #[test]
    fn partial_generation_still_produces_a_report() {
        let mut volume = MemoryVolume::new();
        volume.fail_mkdir_on("/directory_1_1");
        let mut harness = Harness::new(&mut volume, "memory", small_config());

        let run_report = harness.run(false).unwrap();

        // one whole branch is missing, the other is intact
        assert_eq!(run_report.phases[1].files, Some(4));
        assert_eq!(run_report.phases[1].dirs, Some(2));
    }
}
