//! Core data model shared by every stage of the analysis pipeline.
//!
//! Types here are intentionally plain data: discovery, parsers, analyzers,
//! the scoring engine, the recommender and the renderers all read and write
//! these structures but none of them owns business logic that belongs to
//! another stage.

pub mod result;
pub mod sample;
pub mod score;
pub mod target;
pub mod types;

pub use result::{AnalysisResult, Evidence, MetricValue};
pub use sample::C7Sample;
pub use score::{
    CategoryDelta, CategoryScore, EffortLabel, ImprovementPrompt, Recommendation, RunMetadata, ScoredResult, SubScore,
};
pub use target::{AnalysisTarget, TargetPayload};
pub use types::{CategoryId, Direction, Language, Tier};
