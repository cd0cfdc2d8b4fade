//! Response-generation and repair pipeline
//!
//! skeleton call -> per-topic enrichment -> normalization -> flowchart.
//! Model output has no format guarantee, so every parse goes through the
//! [`JsonExtractor`], which may issue one repair call.

mod basic;
mod caller;
mod enrich;
mod error;
mod extract;
mod flowchart;
mod normalize;
mod repair;
mod video;

pub use basic::BasicPathGenerator;
pub use caller::ModelCaller;
pub use enrich::TopicEnricher;
pub use error::PipelineError;
pub use extract::{JsonExtractor, JsonObject, parse_local};
pub use flowchart::render;
pub use normalize::normalize;
pub use repair::{REPAIR_TEMPERATURE, Repairer};
pub use video::to_embed_url;
