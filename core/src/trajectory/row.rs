use crate::math::AngleHelper;
use std::collections::BTreeMap;

/// One observed position of one agent at one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRow {
    pub agent_id: i64,
    pub frame: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TrajectoryRow {
    pub fn new(agent_id: i64, frame: u64, x: f64, y: f64, z: f64) -> Self {
        Self {
            agent_id,
            frame,
            x,
            y,
            z,
        }
    }
}

/// A row with its frame-to-frame kinematics attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicRow {
    pub source: TrajectoryRow,
    pub time: f64,
    pub dx: f64,
    pub dy: f64,
    pub distance: f64,
    pub speed: f64,
    /// Direction of horizontal travel in degrees; 0.0 while stationary.
    pub raw_heading: f64,
}

impl KinematicRow {
    /// Derives the kinematics of `current` relative to the same agent's
    /// previous row. The first row of an agent has no predecessor and
    /// therefore zero displacement.
    pub fn between(previous: Option<&TrajectoryRow>, current: &TrajectoryRow, time_step: f64) -> Self {
        let (dx, dy) = match previous {
            Some(prev) => (current.x - prev.x, current.y - prev.y),
            None => (0.0, 0.0),
        };
        let distance = (dx * dx + dy * dy).sqrt();
        let raw_heading = if distance > 0.0 {
            AngleHelper::heading(dx, dy)
        } else {
            0.0
        };

        Self {
            source: *current,
            time: current.frame as f64 * time_step,
            dx,
            dy,
            distance,
            speed: distance / time_step,
            raw_heading,
        }
    }

    pub fn agent_id(&self) -> i64 {
        self.source.agent_id
    }
}

/// A fully derived row: kinematics plus the rate-limited heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedRow {
    pub kinematics: KinematicRow,
    pub heading: f64,
}

impl AnnotatedRow {
    pub fn agent_id(&self) -> i64 {
        self.kinematics.source.agent_id
    }

    pub fn time(&self) -> f64 {
        self.kinematics.time
    }
}

/// Per-agent aggregate emitted as an entity record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSummary {
    pub agent_id: i64,
    pub max_speed: f64,
}

/// Groups row positions by agent id, keeping each agent's rows in input
/// order. Iterating the map yields agents in ascending id order.
pub fn index_by_agent<I>(agent_ids: I) -> BTreeMap<i64, Vec<usize>>
where
    I: IntoIterator<Item = i64>,
{
    let mut by_agent: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (index, agent_id) in agent_ids.into_iter().enumerate() {
        by_agent.entry(agent_id).or_default().push(index);
    }
    by_agent
}
