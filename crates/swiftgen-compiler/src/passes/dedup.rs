//! Duplicate Type Removal.
//!
//! File Grouping already folds a header's type into its implementation
//! counterpart and removes the header-sourced node as part of that merge
//! (crate::passes::file_grouping), so by the time this pass runs, header/impl
//! duplicates from *different* files are already gone. What's left is the
//! narrower case this pass targets: two same-named class-like intentions
//! inside a single file (e.g. a forward `@interface` redeclared later in the
//! same implementation file) — keep the richer one, drop the other.

use swiftgen_core::{IntentionId, Symbol};

use crate::intention::{IntentionCollection, IntentionPayload};

pub fn apply(collection: &mut IntentionCollection) {
    for file_id in collection.files().to_vec() {
        dedupe_file(collection, file_id);
    }
}

fn dedupe_file(collection: &mut IntentionCollection, file_id: IntentionId) {
    let types = match &collection.get(file_id).map(|n| &n.payload) {
        Some(IntentionPayload::File(f)) => f.types.clone(),
        _ => return,
    };

    let mut kept: Vec<IntentionId> = Vec::new();
    for candidate in types {
        let Some((name, tag)) = identity(collection, candidate) else {
            kept.push(candidate);
            continue;
        };
        let clash = kept.iter().position(|id| identity(collection, *id) == Some((name, tag)));
        match clash {
            None => kept.push(candidate),
            Some(pos) => {
                let winner = richer(collection, kept[pos], candidate);
                let loser = if winner == kept[pos] { candidate } else { kept[pos] };
                if winner != kept[pos] {
                    kept[pos] = winner;
                }
                collection.push_history(winner, "dedup", "kept over a same-named duplicate in the same file");
                collection.remove(loser);
            }
        }
    }

    if let Some(node) = collection.get_mut(file_id) {
        if let IntentionPayload::File(f) = &mut node.payload {
            f.types = kept;
        }
    }
}

fn identity(collection: &IntentionCollection, id: IntentionId) -> Option<(Symbol, &'static str)> {
    match &collection.get(id)?.payload {
        IntentionPayload::Class(c) => Some((c.type_name, "class")),
        IntentionPayload::ClassExtension(c) => Some((c.type_name, "class_extension")),
        IntentionPayload::Struct(s) => Some((s.type_name, "struct")),
        IntentionPayload::Enum(e) => Some((e.type_name, "enum")),
        _ => None,
    }
}

fn member_count(collection: &IntentionCollection, id: IntentionId) -> usize {
    match &collection.get(id).map(|n| &n.payload) {
        Some(IntentionPayload::Class(c)) => c.ivars.len() + c.properties.len() + c.methods.len(),
        Some(IntentionPayload::ClassExtension(c)) => c.ivars.len() + c.properties.len() + c.methods.len(),
        Some(IntentionPayload::Struct(s)) => s.ivars.len(),
        Some(IntentionPayload::Enum(e)) => e.cases.len(),
        _ => 0,
    }
}

/// Whichever of the two carries more members wins; ties keep the first one
/// encountered (the earlier declaration in source order).
fn richer(collection: &IntentionCollection, a: IntentionId, b: IntentionId) -> IntentionId {
    if member_count(collection, b) > member_count(collection, a) {
        b
    } else {
        a
    }
}
