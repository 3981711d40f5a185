use crate::math::stats::StatsHelper;
use crate::prelude::{ProcessingStage, StageConfig, StageError, StageResult};
use crate::telemetry::log::LogManager;
use crate::trajectory::{index_by_agent, AgentSummary, KinematicRow, TrajectoryRow};

/// Rows with derived kinematics, in input order, plus per-agent maxima.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicsOutput {
    pub rows: Vec<KinematicRow>,
    /// One entry per agent, ascending by agent id.
    pub summaries: Vec<AgentSummary>,
}

/// Derives time, displacement, speed and raw heading for every row.
///
/// Displacement is taken against the same agent's previous row in input
/// order, so each agent's rows must already be sorted by frame.
pub fn derive(rows: &[TrajectoryRow], frame_rate: u32) -> StageResult<KinematicsOutput> {
    if frame_rate == 0 {
        return Err(StageError::MalformedInput(
            "frame rate must be a positive integer".into(),
        ));
    }
    if let Some(row) = rows.iter().find(|row| row.agent_id < 1) {
        return Err(StageError::MalformedInput(format!(
            "agent id {} at frame {} would map to a negative entity id",
            row.agent_id, row.frame
        )));
    }

    let time_step = 1.0 / f64::from(frame_rate);
    let by_agent = index_by_agent(rows.iter().map(|row| row.agent_id));

    let mut predecessor: Vec<Option<usize>> = vec![None; rows.len()];
    for indices in by_agent.values() {
        for pair in indices.windows(2) {
            predecessor[pair[1]] = Some(pair[0]);
        }
    }

    let derived: Vec<KinematicRow> = rows
        .iter()
        .zip(&predecessor)
        .map(|(row, prev)| KinematicRow::between(prev.map(|i| &rows[i]), row, time_step))
        .collect();

    let summaries = by_agent
        .iter()
        .map(|(&agent_id, indices)| AgentSummary {
            agent_id,
            max_speed: StatsHelper::max(indices.iter().map(|&i| derived[i].speed))
                .unwrap_or(0.0),
        })
        .collect();

    Ok(KinematicsOutput {
        rows: derived,
        summaries,
    })
}

/// Pipeline stage wrapping [`derive`].
pub struct KinematicsStage {
    config: Option<StageConfig>,
    logger: LogManager,
}

impl KinematicsStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::for_stage("kinematics"),
        }
    }
}

impl Default for KinematicsStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for KinematicsStage {
    type Input = Vec<TrajectoryRow>;
    type Output = KinematicsOutput;

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

        let output = derive(&input, config.frame_rate)?;
        for summary in &output.summaries {
            self.logger.detail(&format!(
                "agent {} max speed {:.3}",
                summary.agent_id, summary.max_speed
            ));
        }
        self.logger.record(&format!(
            "derived {} rows for {} agents at {} fps",
            output.rows.len(),
            output.summaries.len(),
            config.frame_rate
        ));
        Ok(output)
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
