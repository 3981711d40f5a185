pub mod document;
pub mod writer;

pub use document::{
    DistanceMapRecord, EntityRecord, Metadata, MobiusDocument, Position, SampleRecord,
    SimulationFrame,
};
pub use writer::{to_pretty_json, write_document};
