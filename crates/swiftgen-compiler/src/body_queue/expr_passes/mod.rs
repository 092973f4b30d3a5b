//! The four expression-rewriting passes the body queue runs in order: type
//! resolution, nil-coalescing insertion, cast insertion, automatic if-let
//! rewriting. They run in this fixed order over every [`super::WorkItem`]
//! because each later pass reads the `resolved_type` the first one fills in.

pub mod cast_insertion;
pub mod iflet_rewrite;
pub mod nil_coalescing;
pub mod type_resolution;

use swiftgen_core::Interner;

use crate::intention::IntentionCollection;
use crate::passes::UsageIndex;

use super::WorkItem;

pub fn run_all(items: &mut [WorkItem], collection: &IntentionCollection, interner: &Interner, usage: &UsageIndex) {
    type_resolution::run(items, collection);
    nil_coalescing::run(items);
    cast_insertion::run(items, interner);
    iflet_rewrite::run(items, collection, usage);
}
