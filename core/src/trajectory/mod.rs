pub mod reader;
pub mod row;

pub use reader::{parse_trajectory, read_trajectory_file, TrajectoryTable};
pub use row::{index_by_agent, AgentSummary, AnnotatedRow, KinematicRow, TrajectoryRow};
