use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use trajcore::prelude::ProcessingStage;
use trajcore::processing::{AssemblyStage, KinematicsStage, SmoothingStage};
use trajcore::schema::{to_pretty_json, MobiusDocument};
use trajcore::telemetry::{ConversionMetrics, MetricsRecorder};
use trajcore::trajectory::read_trajectory_file;

#[derive(Debug)]
pub struct WorkflowResult {
    pub output_path: PathBuf,
    pub frame_rate: u32,
    /// `false` when the input had no `framerate` header.
    pub frame_rate_from_header: bool,
    pub metrics: ConversionMetrics,
}

/// Sampling rate a conversion ran at and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRateSource {
    pub frame_rate: u32,
    pub from_header: bool,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Converts `input` and writes the JSON document to the configured output file.
    pub fn execute(&self, input: &Path) -> anyhow::Result<WorkflowResult> {
        let metrics = MetricsRecorder::new();
        let (document, source) = self.convert(input, &metrics)?;
        let json = to_pretty_json(&document).context("serializing simulation document")?;
        fs::write(&self.config.output_file, json)
            .with_context(|| format!("writing {}", self.config.output_file.display()))?;

        let snapshot = metrics.snapshot();
        info!(
            "converted {} rows, {} agents, {} frames into {}",
            snapshot.rows,
            snapshot.agents,
            snapshot.frames,
            self.config.output_file.display()
        );
        Ok(WorkflowResult {
            output_path: self.config.output_file.clone(),
            frame_rate: source.frame_rate,
            frame_rate_from_header: source.from_header,
            metrics: snapshot,
        })
    }

    /// Runs the three stages over `input` without touching the output file.
    pub fn convert(
        &self,
        input: &Path,
        metrics: &MetricsRecorder,
    ) -> anyhow::Result<(MobiusDocument, FrameRateSource)> {
        let table = read_trajectory_file(input, self.config.fallback_frame_rate)?;
        metrics.record_rows(table.rows.len());
        let source = FrameRateSource {
            frame_rate: table.frame_rate,
            from_header: table.frame_rate_from_header,
        };
        let stage_config = self.config.to_stage_config(source.frame_rate);

        let mut kinematics_stage = KinematicsStage::new();
        kinematics_stage
            .initialize(&stage_config)
            .context("initializing kinematics stage")?;
        let kinematics = kinematics_stage
            .execute(table.rows)
            .context("executing kinematics stage")?;
        kinematics_stage.cleanup();
        metrics.record_agents(kinematics.summaries.len());

        let mut smoothing_stage = SmoothingStage::new();
        smoothing_stage
            .initialize(&stage_config)
            .context("initializing smoothing stage")?;
        let smoothed = smoothing_stage
            .execute(kinematics)
            .context("executing smoothing stage")?;
        smoothing_stage.cleanup();

        let mut assembly_stage = AssemblyStage::new();
        assembly_stage
            .initialize(&stage_config)
            .context("initializing assembly stage")?;
        let document = assembly_stage
            .execute(smoothed)
            .context("executing assembly stage")?;
        assembly_stage.cleanup();
        metrics.record_frames(document.simulation.len());

        Ok((document, source))
    }
}
