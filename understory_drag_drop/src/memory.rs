// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`Document`] for tests and headless hosts.
//!
//! [`MemoryDocument`] keeps an arena of labelled nodes under a single body
//! node. Nodes are never freed; detaching a node only clears its parent link.
//! Listeners are recorded rather than wired to an event loop, so callers can
//! assert which listeners the coordinator holds at any point.
//!
//! ## Minimal example
//!
//! ```
//! use understory_drag_drop::Document;
//! use understory_drag_drop::memory::MemoryDocument;
//!
//! let mut doc = MemoryDocument::new();
//! let body = doc.body();
//! let list = doc.create_element("list");
//! doc.set_element_id(list, "list");
//! doc.append_child(body, list);
//!
//! let item = doc.create_element("item");
//! doc.append_child(list, item);
//!
//! assert_eq!(doc.element_by_id("list"), Some(list));
//! assert_eq!(doc.owner_id(item).as_ref().map(|id| id.as_str()), Some("list"));
//! assert_eq!(doc.child_labels(list), ["item"]);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::document::{Document, EventKind, ListenTarget, ListenerId, ProxyStyle};
use crate::zone::ZoneId;

/// Handle to a node of a [`MemoryDocument`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug, Default)]
struct NodeData {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element_id: Option<ZoneId>,
    owner: Option<ZoneId>,
    classes: SmallVec<[String; 2]>,
    sort_order: Option<f64>,
    style: Option<ProxyStyle>,
}

/// Arena-backed element tree implementing [`Document`].
#[derive(Clone, Debug)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    listeners: HashMap<ListenerId, (ListenTarget<NodeId>, EventKind)>,
    next_listener: u64,
    focus_count: usize,
    legacy_engine: bool,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A document holding only its body.
    pub fn new() -> Self {
        Self {
            nodes: alloc::vec![NodeData {
                label: "body".to_string(),
                ..NodeData::default()
            }],
            listeners: HashMap::new(),
            next_listener: 0,
            focus_count: 0,
            legacy_engine: false,
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, label: &str) -> NodeId {
        self.nodes.push(NodeData {
            label: label.to_string(),
            ..NodeData::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Give `node` an element id. The node is also stamped as owned by that id.
    pub fn set_element_id(&mut self, node: NodeId, id: impl Into<ZoneId>) {
        if let Some(data) = self.data_mut(node) {
            let id = id.into();
            data.owner = Some(id.clone());
            data.element_id = Some(id);
        }
    }

    /// Stamp `node` as owned by the zone `id`, without giving it an element id.
    pub fn set_owner(&mut self, node: NodeId, id: impl Into<ZoneId>) {
        if let Some(data) = self.data_mut(node) {
            data.owner = Some(id.into());
        }
    }

    /// Set or clear the sort order of `node`.
    pub fn set_sort_order(&mut self, node: NodeId, order: Option<f64>) {
        if let Some(data) = self.data_mut(node) {
            data.sort_order = order;
        }
    }

    /// Report the document as a legacy engine, which makes drags suppress native selection.
    pub fn set_legacy_engine(&mut self, legacy: bool) {
        self.legacy_engine = legacy;
    }

    /// Label given at creation.
    pub fn label(&self, node: NodeId) -> &str {
        self.data(node).map_or("", |data| data.label.as_str())
    }

    /// Labels of the children of `node`, in order.
    pub fn child_labels(&self, node: NodeId) -> Vec<&str> {
        self.data(node)
            .map(|data| data.children.iter().map(|&c| self.label(c)).collect())
            .unwrap_or_default()
    }

    /// Classes of `node`, in insertion order.
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.data(node)
            .map(|data| data.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Last proxy style applied to `node`.
    pub fn proxy_style(&self, node: NodeId) -> Option<ProxyStyle> {
        self.data(node).and_then(|data| data.style)
    }

    /// Whether `node` is connected to the body.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.body(), node)
    }

    /// Number of live listeners of `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.values().filter(|(_, k)| *k == kind).count()
    }

    /// Whether a live listener of `kind` is attached to `target`.
    pub fn is_listening(&self, target: ListenTarget<NodeId>, kind: EventKind) -> bool {
        self.listeners
            .values()
            .any(|(t, k)| *t == target && *k == kind)
    }

    /// Number of times the body has been focused.
    pub fn focus_count(&self) -> usize {
        self.focus_count
    }

    fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0)
    }

    fn data_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.0)
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(data) = self.data_mut(parent) {
            data.children.retain(|&c| c != child);
        }
        if let Some(data) = self.data_mut(child) {
            data.parent = None;
        }
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn body(&self) -> NodeId {
        NodeId(0)
    }

    fn element_id(&self, node: NodeId) -> Option<ZoneId> {
        self.data(node).and_then(|data| data.element_id.clone())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|data| data.element_id.as_ref().is_some_and(|e| e == id))
            .map(NodeId)
    }

    /// Nearest owner stamp on `node` or its ancestors.
    fn owner_id(&self, node: NodeId) -> Option<ZoneId> {
        let mut current = Some(node);
        while let Some(n) = current {
            let data = self.data(n)?;
            if let Some(owner) = &data.owner {
                return Some(owner.clone());
            }
            current = data.parent;
        }
        None
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).and_then(|data| data.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.data(node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.data(node)
            .is_some_and(|data| data.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let Some(data) = self.data_mut(node) else {
            return;
        };
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.data_mut(node) {
            data.classes.retain(|c| c.as_str() != class);
        }
    }

    /// Copies label, classes and sort order of the subtree. Element ids and owner stamps are not copied.
    fn clone_deep(&mut self, node: NodeId) -> NodeId {
        let Some(data) = self.data(node) else {
            return node;
        };
        let copy = NodeData {
            label: data.label.clone(),
            classes: data.classes.clone(),
            sort_order: data.sort_order,
            ..NodeData::default()
        };
        let children = data.children.clone();
        self.nodes.push(copy);
        let clone = NodeId(self.nodes.len() - 1);
        for child in children {
            let child_clone = self.clone_deep(child);
            self.append_child(clone, child_clone);
        }
        clone
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.data(parent).is_none() || self.data(child).is_none() {
            return;
        }
        // A node cannot be moved under itself.
        if self.contains(child, parent) {
            log::warn!("refusing to append {child:?} under its own descendant {parent:?}");
            return;
        }
        self.detach(child);
        if let Some(data) = self.data_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.data_mut(parent) {
            data.children.push(child);
        }
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    fn sort_order(&self, node: NodeId) -> Option<f64> {
        self.data(node).and_then(|data| data.sort_order)
    }

    fn set_proxy_style(&mut self, node: NodeId, style: ProxyStyle) {
        if let Some(data) = self.data_mut(node) {
            data.style = Some(style);
        }
    }

    fn focus_body(&mut self) {
        self.focus_count += 1;
    }

    fn listen(&mut self, target: ListenTarget<NodeId>, kind: EventKind) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId::new(self.next_listener);
        self.listeners.insert(id, (target, kind));
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn is_legacy_engine(&self) -> bool {
        self.legacy_engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_moves_between_parents() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let item = doc.create_element("item");
        doc.append_child(body, a);
        doc.append_child(body, b);
        doc.append_child(a, item);

        doc.append_child(b, item);

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), [item]);
        assert_eq!(doc.parent(item), Some(b));
    }

    #[test]
    fn append_under_own_descendant_is_refused() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let outer = doc.create_element("outer");
        let inner = doc.create_element("inner");
        doc.append_child(body, outer);
        doc.append_child(outer, inner);

        doc.append_child(inner, outer);

        assert_eq!(doc.parent(outer), Some(body));
        assert_eq!(doc.parent(inner), Some(outer));
    }

    #[test]
    fn clone_deep_copies_subtree_without_ids() {
        let mut doc = MemoryDocument::new();
        let card = doc.create_element("card");
        doc.set_element_id(card, "card");
        doc.add_class(card, "handle");
        doc.set_sort_order(card, Some(4.0));
        let title = doc.create_element("title");
        doc.append_child(card, title);

        let clone = doc.clone_deep(card);

        assert_ne!(clone, card);
        assert_eq!(doc.label(clone), "card");
        assert!(doc.has_class(clone, "handle"));
        assert_eq!(doc.sort_order(clone), Some(4.0));
        assert_eq!(doc.child_labels(clone), ["title"]);
        assert_eq!(doc.element_id(clone), None);
        assert_eq!(doc.parent(clone), None);
        assert_eq!(doc.element_by_id("card"), Some(card));
    }

    #[test]
    fn owner_id_walks_up_to_the_stamp() {
        let mut doc = MemoryDocument::new();
        let zone = doc.create_element("zone");
        doc.set_element_id(zone, "zone");
        let item = doc.create_element("item");
        let label = doc.create_element("label");
        doc.append_child(zone, item);
        doc.append_child(item, label);

        assert_eq!(doc.owner_id(label), Some(ZoneId::new("zone")));
        let stray = doc.create_element("stray");
        assert_eq!(doc.owner_id(stray), None);
    }

    #[test]
    fn classes_are_deduplicated() {
        let mut doc = MemoryDocument::new();
        let n = doc.create_element("n");
        doc.add_class(n, "a");
        doc.add_class(n, "a");
        doc.add_class(n, "b");
        assert_eq!(doc.classes(n), ["a", "b"]);
        doc.remove_class(n, "a");
        assert_eq!(doc.classes(n), ["b"]);
    }

    #[test]
    fn listeners_are_tracked_until_released() {
        let mut doc = MemoryDocument::new();
        let n = doc.create_element("n");
        let id = doc.listen(ListenTarget::Node(n), EventKind::PointerDown);
        doc.listen(ListenTarget::Document, EventKind::PointerUp);

        assert!(doc.is_listening(ListenTarget::Node(n), EventKind::PointerDown));
        assert_eq!(doc.listener_count(EventKind::PointerUp), 1);

        doc.unlisten(id);
        assert!(!doc.is_listening(ListenTarget::Node(n), EventKind::PointerDown));
    }

    #[test]
    fn closest_with_class_walks_ancestors() {
        let mut doc = MemoryDocument::new();
        let zone = doc.create_element("zone");
        let handle = doc.create_element("handle");
        doc.add_class(handle, "grip");
        let icon = doc.create_element("icon");
        doc.append_child(zone, handle);
        doc.append_child(handle, icon);

        assert_eq!(doc.closest_with_class(icon, "grip", zone), Some(handle));
        assert_eq!(doc.closest_with_class(handle, "grip", zone), Some(handle));
        assert_eq!(doc.closest_with_class(icon, "missing", zone), None);
    }

    #[test]
    fn closest_with_class_stops_at_root() {
        let mut doc = MemoryDocument::new();
        let wrapper = doc.create_element("wrapper");
        doc.add_class(wrapper, "grip");
        let zone = doc.create_element("zone");
        let item = doc.create_element("item");
        doc.append_child(wrapper, zone);
        doc.append_child(zone, item);
        let outside = doc.create_element("outside");
        doc.add_class(outside, "grip");

        assert_eq!(doc.closest_with_class(item, "grip", zone), None);
        assert_eq!(doc.closest_with_class(outside, "grip", zone), None);
        doc.add_class(zone, "grip");
        assert_eq!(doc.closest_with_class(item, "grip", zone), Some(zone));
    }
}
