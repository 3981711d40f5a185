//! Builds the Mobius document from annotated rows.
//!
//! Rows are bucketed into simulation frames by exact equality of their
//! computed `time`. Two frames whose times differ only by floating-point
//! error land in separate buckets; this matches the reference converter's
//! output and is a known limitation for inputs with irregular timing.

use crate::math::stats::StatsHelper;
use crate::prelude::{ProcessingStage, StageConfig, StageError, StageResult};
use crate::processing::smoothing::SmoothedOutput;
use crate::schema::document::{
    EntityRecord, Metadata, MobiusDocument, Position, SampleRecord, SimulationFrame,
    DEFAULT_PLANE,
};
use crate::telemetry::log::LogManager;
use crate::trajectory::{AgentSummary, AnnotatedRow};

const ROUND_PLACES: usize = 3;

/// Assembles `entities`, `simulation` and `metadata` from derived rows.
pub fn assemble(
    rows: &[AnnotatedRow],
    summaries: &[AgentSummary],
    frame_rate: u32,
    default_mode: &str,
) -> StageResult<MobiusDocument> {
    if frame_rate == 0 {
        return Err(StageError::MalformedInput(
            "frame rate must be a positive integer".into(),
        ));
    }
    let time_step = 1.0 / f64::from(frame_rate);

    let mut ordered = summaries.to_vec();
    ordered.sort_by_key(|summary| summary.agent_id);
    let entities = ordered
        .iter()
        .map(|summary| {
            Ok(EntityRecord {
                id: entity_index(summary.agent_id)?,
                name: format!("Agent{}", summary.agent_id),
                sim_time_s: "0.0".to_string(),
                max_speed: StatsHelper::round_to(summary.max_speed, ROUND_PLACES),
                m_plane: DEFAULT_PLANE.to_string(),
                map: 0,
            })
        })
        .collect::<StageResult<Vec<_>>>()?;

    let simulation = group_by_time(rows)
        .into_iter()
        .map(|(time, bucket)| {
            let samples = bucket
                .into_iter()
                .map(|row| sample_for(row, default_mode))
                .collect::<StageResult<Vec<_>>>()?;
            Ok(SimulationFrame { time, samples })
        })
        .collect::<StageResult<Vec<_>>>()?;

    let duration = StatsHelper::max(rows.iter().map(AnnotatedRow::time)).unwrap_or(0.0);
    let metadata = Metadata::new(
        duration,
        StatsHelper::round_to(time_step, ROUND_PLACES),
        entities.len(),
    );

    Ok(MobiusDocument {
        entities,
        simulation,
        metadata,
    })
}

/// Zero-based entity index for a one-based agent id.
fn entity_index(agent_id: i64) -> StageResult<u64> {
    agent_id
        .checked_sub(1)
        .and_then(|index| u64::try_from(index).ok())
        .ok_or_else(|| {
            StageError::SchemaAssembly(format!(
                "agent id {agent_id} maps to a negative entity id"
            ))
        })
}

fn sample_for(row: &AnnotatedRow, default_mode: &str) -> StageResult<SampleRecord> {
    let source = &row.kinematics.source;
    Ok(SampleRecord {
        entity: entity_index(source.agent_id)?,
        position: Position {
            x: source.x,
            y: source.y,
            z: source.z,
        },
        mode: default_mode.to_string(),
        rotation: row.heading,
        speed: row.kinematics.speed,
    })
}

/// Buckets rows by identical `time`, ascending; rows within a bucket keep
/// their input order.
fn group_by_time(rows: &[AnnotatedRow]) -> Vec<(f64, Vec<&AnnotatedRow>)> {
    let mut ordered: Vec<&AnnotatedRow> = rows.iter().collect();
    ordered.sort_by(|a, b| a.time().total_cmp(&b.time()));

    ordered
        .chunk_by(|a, b| a.time() == b.time())
        .map(|bucket| (bucket[0].time(), bucket.to_vec()))
        .collect()
}

/// Pipeline stage wrapping [`assemble`].
pub struct AssemblyStage {
    config: Option<StageConfig>,
    logger: LogManager,
}

impl AssemblyStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::for_stage("assembly"),
        }
    }
}

impl Default for AssemblyStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for AssemblyStage {
    type Input = SmoothedOutput;
    type Output = MobiusDocument;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        config.time_step()?;
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let document = assemble(
            &input.rows,
            &input.summaries,
            config.frame_rate,
            &config.default_mode,
        )?;
        self.logger.record(&format!(
            "assembled {} entities over {} frames, duration {:.3}s",
            document.entities.len(),
            document.simulation.len(),
            document.metadata.duration
        ));
        Ok(document)
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
