use crate::math::angles::AngleHelper;
use crate::prelude::{ProcessingStage, StageConfig, StageError, StageResult};
use crate::processing::kinematics::KinematicsOutput;
use crate::telemetry::log::LogManager;
use crate::trajectory::{index_by_agent, AgentSummary, AnnotatedRow, KinematicRow};

/// Rows carrying the smoothed heading, still in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedOutput {
    pub rows: Vec<AnnotatedRow>,
    pub summaries: Vec<AgentSummary>,
}

/// Rate-limits one agent's heading sequence.
///
/// Each step moves the previous output toward the new heading along the
/// shorter arc, by at most `max_change` degrees. The result accumulates and
/// is not wrapped back into a bounded range.
pub fn smooth(headings: &[f64], max_change: f64) -> Vec<f64> {
    let Some((&first, rest)) = headings.split_first() else {
        return Vec::new();
    };

    std::iter::once(first)
        .chain(rest.iter().scan(first, |previous, &heading| {
            let step = AngleHelper::clamp_step(AngleHelper::wrap(heading - *previous), max_change);
            *previous += step;
            Some(*previous)
        }))
        .collect()
}

/// Applies [`smooth`] to every agent independently and returns the rows
/// annotated with their smoothed heading, in the original order.
pub fn smooth_agents(rows: Vec<KinematicRow>, max_change: f64) -> Vec<AnnotatedRow> {
    let mut headings: Vec<f64> = rows.iter().map(|row| row.raw_heading).collect();

    for indices in index_by_agent(rows.iter().map(KinematicRow::agent_id)).values() {
        let raw: Vec<f64> = indices.iter().map(|&i| rows[i].raw_heading).collect();
        for (&i, heading) in indices.iter().zip(smooth(&raw, max_change)) {
            headings[i] = heading;
        }
    }

    rows.into_iter()
        .zip(headings)
        .map(|(kinematics, heading)| AnnotatedRow {
            kinematics,
            heading,
        })
        .collect()
}

/// Pipeline stage wrapping [`smooth_agents`].
pub struct SmoothingStage {
    max_change: Option<f64>,
    logger: LogManager,
}

impl SmoothingStage {
    pub fn new() -> Self {
        Self {
            max_change: None,
            logger: LogManager::for_stage("smoothing"),
        }
    }
}

impl Default for SmoothingStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for SmoothingStage {
    type Input = KinematicsOutput;
    type Output = SmoothedOutput;

    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        self.max_change = Some(config.max_heading_change()?);
        Ok(())
    }

    fn execute(&mut self, input: Self::Input) -> StageResult<Self::Output> {
        let max_change = self
            .max_change
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let agent_count = input.summaries.len();
        let rows = smooth_agents(input.rows, max_change);
        self.logger.record(&format!(
            "smoothed headings of {} agents, max {:.3} deg per step",
            agent_count, max_change
        ));

        Ok(SmoothedOutput {
            rows,
            summaries: input.summaries,
        })
    }

    fn cleanup(&mut self) {
        self.max_change = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::kinematics::derive;
    use crate::trajectory::TrajectoryRow;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_sequence_smooths_to_empty() {
        assert!(smooth(&[], 3.6).is_empty());
    }

    #[test]
    fn preserves_length_and_first_sample() {
        let raw = [42.0, -17.0, 100.0, 100.0];
        let out = smooth(&raw, 3.6);
        assert_eq!(out.len(), raw.len());
        assert_eq!(out[0], raw[0]);
    }

    #[test]
    fn constant_heading_passes_through() {
        assert_eq!(smooth(&[0.0, 0.0], 3.6), vec![0.0, 0.0]);
    }

    #[test]
    fn small_changes_are_not_limited() {
        let out = smooth(&[10.0, 12.0, 9.5], 3.6);
        assert_close(out[1], 12.0);
        assert_close(out[2], 9.5);
    }

    #[test]
    fn large_turns_are_rate_limited() {
        let out = smooth(&[0.0, 170.0, -170.0], 3.6);
        assert_close(out[1], 3.6);
        // -170 is 173.6 degrees clockwise of 3.6, so the limiter steps back.
        assert_close(out[2], 0.0);
    }

    #[test]
    fn steps_across_the_wrap_along_the_short_arc() {
        // 170 -> -170 is a +20 degree turn, not -340.
        let out = smooth(&[170.0, -170.0], 3.6);
        assert_close(out[1], 173.6);
    }

    #[test]
    fn accumulated_heading_is_not_rewrapped() {
        // Keep turning counter-clockwise in 45 degree steps.
        let raw: Vec<f64> = (0..20)
            .map(|i| AngleHelper::wrap(f64::from(i) * 45.0))
            .collect();
        let out = smooth(&raw, 60.0);
        assert_close(out[19], 855.0);
    }

    #[test]
    fn wrapped_step_never_exceeds_limit() {
        let raw = [0.0, 179.0, -179.0, 90.0, -90.0, 45.0, 180.0, -135.0, 3.0];
        let limit = 3.6;
        let out = smooth(&raw, limit);
        for pair in out.windows(2) {
            assert!(AngleHelper::wrap(pair[1] - pair[0]).abs() <= limit + 1e-9);
        }
    }

    #[test]
    fn agents_are_smoothed_independently() {
        let rows = [
            TrajectoryRow::new(1, 0, 0.0, 0.0, 0.0),
            TrajectoryRow::new(2, 0, 0.0, 0.0, 0.0),
            TrajectoryRow::new(1, 1, 0.0, 1.0, 0.0),
            TrajectoryRow::new(2, 1, 1.0, 0.0, 0.0),
        ];
        let kinematics = derive(&rows, 25).unwrap();
        let annotated = smooth_agents(kinematics.rows, 3.6);
        assert_eq!(annotated.len(), 4);
        assert_eq!(annotated[0].heading, 0.0);
        assert_eq!(annotated[1].heading, 0.0);
        assert_close(annotated[2].heading, 3.6);
        assert_close(annotated[3].heading, 0.0);
    }

    #[test]
    fn stage_uses_turn_rate_times_time_step() {
        let rows = vec![
            TrajectoryRow::new(1, 0, 0.0, 0.0, 0.0),
            TrajectoryRow::new(1, 1, 0.0, 0.0, 0.0),
            TrajectoryRow::new(1, 2, 0.0, 1.0, 0.0),
        ];
        let config = StageConfig::new(10);
        let kinematics = derive(&rows, config.frame_rate).unwrap();

        let mut stage = SmoothingStage::new();
        stage.initialize(&config).unwrap();
        let output = stage.execute(kinematics).unwrap();
        assert_close(output.rows[2].heading, 9.0);
        stage.cleanup();
    }
}
