//! The intention graph: the mutable intermediate representation every
//! reader, pass and the body queue operates on.
//!
//! Intentions live in one generational arena ([`IntentionCollection`]) rather
//! than behind individually owned `Box`es, so a weak parent back-reference
//! is just an [`IntentionId`] — looking one up after its owner has been
//! removed returns `None` instead of dangling.

pub mod class;
pub mod enum_;
pub mod file;
pub mod global;
pub mod history;
pub mod ivar;
pub mod method;
pub mod property;
pub mod protocol;
pub mod storage;
pub mod struct_;

pub use swiftgen_core::IntentionId;
use swiftgen_core::{IntentionKind, Span};

use history::History;

use class::{ClassData, ClassExtensionData};
use enum_::EnumData;
use file::FileData;
use global::GlobalVariableData;
use ivar::InstanceVariableData;
use method::{GlobalFunctionData, InitializerData, MethodData};
use property::PropertyData;
use protocol::ProtocolData;
use struct_::StructData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentionPayload {
    File(FileData),
    Class(ClassData),
    ClassExtension(ClassExtensionData),
    Protocol(ProtocolData),
    Struct(StructData),
    Enum(EnumData),
    GlobalVariable(GlobalVariableData),
    GlobalFunction(GlobalFunctionData),
    Method(MethodData),
    Property(PropertyData),
    InstanceVariable(InstanceVariableData),
    Initializer(InitializerData),
}

impl IntentionPayload {
    pub fn kind(&self) -> IntentionKind {
        match self {
            IntentionPayload::File(_) => IntentionKind::File,
            IntentionPayload::Class(_) => IntentionKind::Class,
            IntentionPayload::ClassExtension(_) => IntentionKind::ClassExtension,
            IntentionPayload::Protocol(_) => IntentionKind::Protocol,
            IntentionPayload::Struct(_) => IntentionKind::Struct,
            IntentionPayload::Enum(_) => IntentionKind::Enum,
            IntentionPayload::GlobalVariable(_) => IntentionKind::GlobalVariable,
            IntentionPayload::GlobalFunction(_) => IntentionKind::GlobalFunction,
            IntentionPayload::Method(_) => IntentionKind::Method,
            IntentionPayload::Property(_) => IntentionKind::Property,
            IntentionPayload::InstanceVariable(_) => IntentionKind::InstanceVariable,
            IntentionPayload::Initializer(_) => IntentionKind::Initializer,
        }
    }
}

/// One intention node: identity, weak parent link, provenance and history
/// are uniform across every kind; `payload` carries the kind-specific data
///.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentionNode {
    pub parent: Option<IntentionId>,
    pub source: Span,
    pub in_nonnull_context: bool,
    pub history: History,
    pub payload: IntentionPayload,
}

impl IntentionNode {
    pub fn kind(&self) -> IntentionKind {
        self.payload.kind()
    }
}

enum Slot {
    Occupied { generation: u32, node: IntentionNode },
    Vacant { generation: u32 },
}

/// Owns every intention produced during a translation run. Re-parenting or
/// removing an intention never invalidates other `IntentionId`s; a stale id
/// simply fails to resolve once its generation has moved on.
#[derive(Default)]
pub struct IntentionCollection {
    slots: Vec<Slot>,
    free: Vec<u32>,
    files: Vec<IntentionId>,
    history_seq: u64,
}

impl IntentionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[IntentionId] {
        &self.files
    }

    /// Inserts a new intention, eagerly recording its `Creation` history
    /// record. `parent` is `None` only for file intentions, which the
    /// collection itself owns as roots.
    pub fn insert(
        &mut self,
        parent: Option<IntentionId>,
        source: Span,
        in_nonnull_context: bool,
        payload: IntentionPayload,
    ) -> IntentionId {
        let is_file = matches!(payload, IntentionPayload::File(_));
        let mut history = History::new();
        let seq = self.next_seq();
        history.push(seq, "reader", "created");

        let node = IntentionNode {
            parent,
            source,
            in_nonnull_context,
            history,
            payload,
        };

        let id = match self.free.pop() {
            Some(index) => {
                let generation = match &self.slots[index as usize] {
                    Slot::Vacant { generation } => *generation,
                    Slot::Occupied { .. } => unreachable!("free list pointed at an occupied slot"),
                };
                self.slots[index as usize] = Slot::Occupied { generation, node };
                IntentionId::new(index, generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot::Occupied { generation: 0, node });
                IntentionId::new(index, 0)
            }
        };

        if is_file {
            self.files.push(id);
        }

        id
    }

    pub fn get(&self, id: IntentionId) -> Option<&IntentionNode> {
        match self.slots.get(id.index() as usize)? {
            Slot::Occupied { generation, node } if *generation == id.generation() => Some(node),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: IntentionId) -> Option<&mut IntentionNode> {
        match self.slots.get_mut(id.index() as usize)? {
            Slot::Occupied { generation, node } if *generation == id.generation() => Some(node),
            _ => None,
        }
    }

    /// Removes an intention from the arena. Does not unlink it from its
    /// parent's child list — callers (passes) do that first through the
    /// typed accessor they already hold, since only they know which list to
    /// touch.
    pub fn remove(&mut self, id: IntentionId) -> Option<IntentionNode> {
        let index = id.index() as usize;
        let matches = matches!(
            self.slots.get(index),
            Some(Slot::Occupied { generation, .. }) if *generation == id.generation()
        );
        if !matches {
            return None;
        }
        let next_generation = id.generation().wrapping_add(1);
        let old = std::mem::replace(
            &mut self.slots[index],
            Slot::Vacant {
                generation: next_generation,
            },
        );
        self.files.retain(|f| *f != id);
        self.free.push(index as u32);
        match old {
            Slot::Occupied { node, .. } => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    /// Re-parents `child` onto `new_parent`. This must unlink the
    /// child from its previous parent's typed child list first; passes are
    /// expected to have already done that mutation directly (they hold the
    /// concrete payload type), so this only updates the weak back-reference
    /// and appends a history record.
    pub fn set_parent(&mut self, child: IntentionId, new_parent: Option<IntentionId>, pass: &'static str) {
        let seq = self.next_seq();
        if let Some(node) = self.get_mut(child) {
            node.parent = new_parent;
            node.history.push(seq, pass, "re-parented");
        }
    }

    pub fn push_history(&mut self, id: IntentionId, pass: &'static str, message: impl Into<String>) {
        let seq = self.next_seq();
        if let Some(node) = self.get_mut(id) {
            node.history.push(seq, pass, message);
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.history_seq;
        self.history_seq += 1;
        seq
    }

    pub fn iter_of_kind(&self, kind: IntentionKind) -> impl Iterator<Item = IntentionId> + '_ {
        self.slots.iter().enumerate().filter_map(move |(index, slot)| match slot {
            Slot::Occupied { generation, node } if node.kind() == kind => {
                Some(IntentionId::new(index as u32, *generation))
            }
            _ => None,
        })
    }

    pub fn iter_all(&self) -> impl Iterator<Item = IntentionId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Occupied { generation, .. } => Some(IntentionId::new(index as u32, *generation)),
            Slot::Vacant { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, Slot::Occupied { .. })).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod intention_collection_tests {
    use super::*;
    use file::{FileData, FileKind};
    use swiftgen_core::Span;

    fn file_payload(path: &str) -> IntentionPayload {
        IntentionPayload::File(FileData::new(path, FileKind::Header))
    }

    #[test]
    fn insert_records_a_creation_history_entry() {
        let mut col = IntentionCollection::new();
        let id = col.insert(None, Span::new(0, 0), false, file_payload("Foo.h"));
        let node = col.get(id).unwrap();
        assert_eq!(node.history.records().len(), 1);
        assert_eq!(node.history.records()[0].pass, "reader");
    }

    #[test]
    fn files_are_tracked_as_roots() {
        let mut col = IntentionCollection::new();
        let id = col.insert(None, Span::new(0, 0), false, file_payload("Foo.h"));
        assert_eq!(col.files(), &[id]);
    }

    #[test]
    fn remove_then_reinsert_bumps_generation_so_old_id_is_stale() {
        let mut col = IntentionCollection::new();
        let id = col.insert(None, Span::new(0, 0), false, file_payload("Foo.h"));
        col.remove(id);
        assert!(col.get(id).is_none());
        let id2 = col.insert(None, Span::new(0, 0), false, file_payload("Bar.h"));
        assert_eq!(id2.index(), id.index());
        assert_ne!(id2.generation(), id.generation());
        assert!(col.get(id).is_none());
        assert!(col.get(id2).is_some());
    }

    #[test]
    fn push_history_appends_in_sequence() {
        let mut col = IntentionCollection::new();
        let id = col.insert(None, Span::new(0, 0), false, file_payload("Foo.h"));
        col.push_history(id, "file_grouping", "merged header");
        let node = col.get(id).unwrap();
        assert_eq!(node.history.records().len(), 2);
        assert!(node.history.records()[1].seq > node.history.records()[0].seq);
    }
}
