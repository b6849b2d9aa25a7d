//! Stage 3: the C1-C6 reference analyzers.
//!
//! Each analyzer claims one [`CategoryId`] and runs over every
//! [`AnalysisTarget`] discovery produced, regardless of language — a Rust
//! analyzer reading a `TargetPayload::Unparsed` target simply reports its
//! metrics unavailable for that target rather than erroring. C7 (agent
//! evaluation) is a separate subsystem in [`crate::agent`]; it isn't an
//! `Analyzer` because it runs async subprocess probes rather than a pure
//! in-process pass over parsed ASTs.

pub(crate) mod architecture;
mod conventions;
pub(crate) mod documentation;
mod duplication;
pub(crate) mod structure;
mod testing;

use crate::core::{AnalysisResult, AnalysisTarget, CategoryId};

/// One pass over every discovered target that produces metrics for a single category.
///
/// Implementations must never panic: a bug in one analyzer should degrade
/// that category to `unavailable`, not abort the run. The pipeline
/// orchestrator enforces this by catching unwinds around each call.
pub trait Analyzer: Send + Sync {
    fn category(&self) -> CategoryId;
    fn analyze(&self, targets: &[AnalysisTarget]) -> AnalysisResult;
}

/// The reference C1-C6 analyzers, in category order.
pub fn reference_analyzers() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(structure::StructureAnalyzer),
        Box::new(duplication::DuplicationAnalyzer),
        Box::new(testing::TestingAnalyzer),
        Box::new(architecture::ArchitectureAnalyzer),
        Box::new(documentation::DocumentationAnalyzer),
        Box::new(conventions::ConventionsAnalyzer),
    ]
}
