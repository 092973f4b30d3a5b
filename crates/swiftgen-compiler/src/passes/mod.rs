//! Intention Passes: a fixed sequence of `IntentionCollection`
//! mutations. Each pass is a plain function; later passes rely on
//! invariants the earlier ones establish, so [`run_all`] is the only
//! sanctioned entry point — nothing downstream should call an individual
//! pass out of order except from its own tests.

pub mod conformance_nullability;
pub mod dedup;
pub mod file_grouping;
pub mod override_detection;
pub mod property_merge;
pub mod synthesize_backing;
pub mod usage_analysis;

use tracing::instrument;

use swiftgen_core::Interner;

use crate::intention::IntentionCollection;

pub use usage_analysis::UsageIndex;

/// Runs every structural pass in its fixed order and returns the usage index
/// Usage Analysis builds last, for the body queue to consult.
#[instrument(skip_all)]
pub fn run_all(collection: &mut IntentionCollection, interner: &mut Interner) -> UsageIndex {
    file_grouping::apply(collection, interner);
    dedup::apply(collection);
    property_merge::apply(collection, interner);
    conformance_nullability::apply(collection, interner);
    synthesize_backing::apply(collection, interner);
    override_detection::apply(collection, interner);
    usage_analysis::apply(collection)
}
