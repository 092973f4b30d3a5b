//! Function Body Queue: after the structural pipeline is done,
//! collects every body-carrying intention into work items and hands them to
//! the expression-rewriting passes.
//!
//! Collection runs over `rayon`'s work-stealing pool: each worker reads
//! one intention's body independently and the only shared mutable state,
//! the output `Vec<WorkItem>`, is appended to under a single mutex held for
//! the duration of one push — the one parallel region this crate has besides
//! source intake.

pub mod expr_passes;

use std::sync::Mutex;

use rayon::prelude::*;
use swiftgen_core::{Interner, IntentionId, IntentionKind};

use crate::intention::{IntentionCollection, IntentionPayload};
use crate::passes::UsageIndex;
use crate::reader::swift_ast::Block;

/// Which kind of declaration a work item's body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyCarrier {
    Global(IntentionId),
    Init(IntentionId),
    Method(IntentionId),
    /// `is_setter` distinguishes a property's setter body from its getter.
    Property { property: IntentionId, is_setter: bool },
}

impl BodyCarrier {
    pub fn owner(self) -> IntentionId {
        match self {
            BodyCarrier::Global(id) | BodyCarrier::Init(id) | BodyCarrier::Method(id) => id,
            BodyCarrier::Property { property, .. } => property,
        }
    }
}

/// Per-item translation context a caller-supplied delegate produces:
/// here, the owning type (if any) and whether the body runs in a class
/// (static) context, both of which the expression passes need to resolve
/// identifiers against the right scope.
#[derive(Debug, Clone, Copy)]
pub struct BodyContext {
    pub owning_type: Option<IntentionId>,
    pub is_class_scope: bool,
}

#[derive(Debug, Clone)]
pub struct WorkItem {
    pub carrier: BodyCarrier,
    pub body: Block,
    pub context: BodyContext,
}

/// Walks the collection once, gathering every body-carrying intention's
/// `(carrier, body, context)` in parallel, then hands back a plain `Vec` for
/// the caller to drain sequentially into the expression passes.
pub fn collect(collection: &IntentionCollection) -> Vec<WorkItem> {
    let sources = enumerate_sources(collection);
    let items: Mutex<Vec<WorkItem>> = Mutex::new(Vec::with_capacity(sources.len()));

    sources.into_par_iter().for_each(|source| {
        if let Some(item) = build_item(collection, source) {
            items.lock().expect("body queue mutex poisoned").push(item);
        }
    });

    items.into_inner().expect("body queue mutex poisoned")
}

/// Writes each work item's (possibly rewritten) body back onto its owning
/// intention once the expression passes have finished with it.
pub fn write_back(collection: &mut IntentionCollection, items: Vec<WorkItem>) {
    for item in items {
        match item.carrier {
            BodyCarrier::Global(id) => {
                if let Some(node) = collection.get_mut(id) {
                    if let IntentionPayload::GlobalFunction(g) = &mut node.payload {
                        g.body = Some(item.body);
                    }
                }
            }
            BodyCarrier::Init(id) => {
                if let Some(node) = collection.get_mut(id) {
                    if let IntentionPayload::Initializer(i) = &mut node.payload {
                        i.body = Some(item.body);
                    }
                }
            }
            BodyCarrier::Method(id) => {
                if let Some(node) = collection.get_mut(id) {
                    if let IntentionPayload::Method(m) = &mut node.payload {
                        m.body = Some(item.body);
                    }
                }
            }
            BodyCarrier::Property { property, is_setter } => {
                if let Some(node) = collection.get_mut(property) {
                    if let IntentionPayload::Property(p) = &mut node.payload {
                        use crate::intention::property::PropertyMode;
                        match &mut p.mode {
                            PropertyMode::Getter { body } if !is_setter => *body = item.body,
                            PropertyMode::GetterSetter { getter, .. } if !is_setter => *getter = item.body,
                            PropertyMode::GetterSetter { setter, .. } if is_setter => *setter = item.body,
                            _ => {}
                        }
                    }
                }
            }
        }
        collection.push_history(item.carrier.owner(), "body_queue", "body passed through the expression-rewriting pipeline");
    }
}

/// Runs the four expression passes over every item, then writes the
/// results back onto the collection. `usage` and `interner` are read-only
/// from this point on — the structural graph is frozen once the body queue
/// starts.
pub fn run(collection: &mut IntentionCollection, interner: &Interner, usage: &UsageIndex) {
    let mut items = collect(collection);
    expr_passes::run_all(&mut items, collection, interner, usage);
    write_back(collection, items);
}

enum Source {
    Global(IntentionId),
    Init(IntentionId, Option<IntentionId>, bool),
    Method(IntentionId, Option<IntentionId>, bool),
    Property(IntentionId, Option<IntentionId>, bool, bool),
}

fn enumerate_sources(collection: &IntentionCollection) -> Vec<Source> {
    let mut sources = Vec::new();

    for file_id in collection.files() {
        if let Some(IntentionPayload::File(f)) = collection.get(*file_id).map(|n| &n.payload) {
            for id in &f.global_functions {
                sources.push(Source::Global(*id));
            }
        }
    }

    for type_id in collection
        .iter_of_kind(IntentionKind::Class)
        .chain(collection.iter_of_kind(IntentionKind::ClassExtension))
    {
        let Some((methods, initializers, properties)) = type_member_lists(collection, type_id) else { continue };
        for id in initializers {
            sources.push(Source::Init(id, Some(type_id), false));
        }
        for id in methods {
            let is_class = matches!(
                collection.get(id).map(|n| &n.payload),
                Some(IntentionPayload::Method(m)) if m.is_class_method
            );
            sources.push(Source::Method(id, Some(type_id), is_class));
        }
        for id in properties {
            use crate::intention::property::PropertyMode;
            let Some(IntentionPayload::Property(p)) = collection.get(id).map(|n| &n.payload) else { continue };
            let is_class = p.attributes.is_class;
            match &p.mode {
                PropertyMode::Getter { .. } => sources.push(Source::Property(id, Some(type_id), is_class, false)),
                PropertyMode::GetterSetter { .. } => {
                    sources.push(Source::Property(id, Some(type_id), is_class, false));
                    sources.push(Source::Property(id, Some(type_id), is_class, true));
                }
                PropertyMode::Field => {}
            }
        }
    }

    sources
}

fn type_member_lists(collection: &IntentionCollection, type_id: IntentionId) -> Option<(Vec<IntentionId>, Vec<IntentionId>, Vec<IntentionId>)> {
    match &collection.get(type_id)?.payload {
        IntentionPayload::Class(c) => Some((c.methods.clone(), c.initializers.clone(), c.properties.clone())),
        IntentionPayload::ClassExtension(c) => Some((c.methods.clone(), c.initializers.clone(), c.properties.clone())),
        _ => None,
    }
}

fn build_item(collection: &IntentionCollection, source: Source) -> Option<WorkItem> {
    match source {
        Source::Global(id) => {
            let IntentionPayload::GlobalFunction(g) = &collection.get(id)?.payload else { return None };
            let body = g.body.clone()?;
            Some(WorkItem {
                carrier: BodyCarrier::Global(id),
                body,
                context: BodyContext { owning_type: None, is_class_scope: false },
            })
        }
        Source::Init(id, owner, is_class) => {
            let IntentionPayload::Initializer(i) = &collection.get(id)?.payload else { return None };
            let body = i.body.clone()?;
            Some(WorkItem {
                carrier: BodyCarrier::Init(id),
                body,
                context: BodyContext { owning_type: owner, is_class_scope: is_class },
            })
        }
        Source::Method(id, owner, is_class) => {
            let IntentionPayload::Method(m) = &collection.get(id)?.payload else { return None };
            let body = m.body.clone()?;
            Some(WorkItem {
                carrier: BodyCarrier::Method(id),
                body,
                context: BodyContext { owning_type: owner, is_class_scope: is_class },
            })
        }
        Source::Property(id, owner, is_class, is_setter) => {
            use crate::intention::property::PropertyMode;
            let IntentionPayload::Property(p) = &collection.get(id)?.payload else { return None };
            let body = match (&p.mode, is_setter) {
                (PropertyMode::Getter { body }, false) => body.clone(),
                (PropertyMode::GetterSetter { getter, .. }, false) => getter.clone(),
                (PropertyMode::GetterSetter { setter, .. }, true) => setter.clone(),
                _ => return None,
            };
            Some(WorkItem {
                carrier: BodyCarrier::Property { property: id, is_setter },
                body,
                context: BodyContext { owning_type: owner, is_class_scope: is_class },
            })
        }
    }
}
