pub mod assembly;
pub mod kinematics;
pub mod smoothing;

pub use assembly::{assemble, AssemblyStage};
pub use kinematics::{derive, KinematicsOutput, KinematicsStage};
pub use smoothing::{smooth, smooth_agents, SmoothedOutput, SmoothingStage};
