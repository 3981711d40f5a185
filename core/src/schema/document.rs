use serde::{Deserialize, Serialize};

/// Floor plane every entity is placed on.
pub const DEFAULT_PLANE: &str = "F#0";

/// Root of the simulation file consumed by Mobius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobiusDocument {
    pub entities: Vec<EntityRecord>,
    pub simulation: Vec<SimulationFrame>,
    pub metadata: Metadata,
}

/// Static description of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename = "simTimeS")]
    pub sim_time_s: String,
    pub max_speed: f64,
    pub m_plane: String,
    pub map: u32,
}

/// All samples sharing one simulation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationFrame {
    pub time: f64,
    pub samples: Vec<SampleRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub entity: u64,
    pub position: Position,
    pub mode: String,
    pub rotation: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub duration: f64,
    pub used_planes: Vec<String>,
    pub distance_maps_used: Vec<DistanceMapRecord>,
    pub timestamp_geometry: u64,
    pub timestamp_people: u64,
    pub timestamp_exits_links: u64,
    #[serde(rename = "model_GUID")]
    pub model_guid: String,
    pub sampling_rate: f64,
    pub max_num_entities: usize,
    #[serde(rename = "isSI")]
    pub is_si: bool,
    #[serde(rename = "isDeg")]
    pub is_deg: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMapRecord {
    pub index: u32,
    pub name: String,
    pub num_users: usize,
    pub use_ground: u32,
    pub ground_elevation: f64,
    pub people_density_catg_num: u32,
}

impl DistanceMapRecord {
    /// The single distance map shared by all entities.
    pub fn default_map(num_users: usize) -> Self {
        Self {
            index: 0,
            name: "Default Distance Map".to_string(),
            num_users,
            use_ground: 0,
            ground_elevation: 0.0,
            people_density_catg_num: 2,
        }
    }
}

impl Metadata {
    pub fn new(duration: f64, sampling_rate: f64, entity_count: usize) -> Self {
        Self {
            duration,
            used_planes: vec![DEFAULT_PLANE.to_string()],
            distance_maps_used: vec![DistanceMapRecord::default_map(entity_count)],
            timestamp_geometry: 0,
            timestamp_people: 0,
            timestamp_exits_links: 0,
            model_guid: String::new(),
            sampling_rate,
            max_num_entities: entity_count,
            is_si: true,
            is_deg: true,
        }
    }
}
