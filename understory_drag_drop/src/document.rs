// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document contract: everything the coordinator needs from the host's element tree.
//!
//! The coordinator never walks or mutates a tree directly. It asks a [`Document`]
//! to resolve ids, test and toggle classes, clone and move nodes, position the
//! drag proxy, and attach or release listeners. Hosts implement the trait over
//! their own node handles; [`MemoryDocument`](crate::memory::MemoryDocument) is
//! an in-memory implementation for tests and headless use.
//!
//! ## Listeners
//!
//! [`Document::listen`] records that the host should deliver a kind of event for
//! a node (or for the whole document) to the coordinator. The coordinator keeps
//! every returned [`ListenerId`] and hands it back to [`Document::unlisten`] when
//! a zone is replaced, unregistered, or the coordinator is disposed.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Point;

use crate::zone::ZoneId;

/// Handle to a listener attached through [`Document::listen`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw listener handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw listener handle.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Where a listener is attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenTarget<N> {
    /// A single element.
    Node(N),
    /// The whole document (global listeners such as pointer-up).
    Document,
}

/// Kinds of host events the coordinator listens for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer pressed on a zone.
    PointerDown,
    /// Pointer moved anywhere in the document.
    PointerMove,
    /// Pointer entered a zone or one of its descendants.
    PointerOver,
    /// Pointer left a zone or one of its descendants.
    PointerOut,
    /// Pointer released anywhere in the document.
    PointerUp,
    /// Native text selection is about to start (legacy engines only).
    SelectStart,
}

/// Style applied to the drag proxy while it follows the pointer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProxyStyle {
    /// Whether the proxy is displayed.
    pub visible: bool,
    /// Top-left corner in page pixels.
    pub position: Point,
}

/// Element tree operations used by the coordinator.
pub trait Document {
    /// Handle to a node in the tree.
    type Node: Copy + Eq + Hash + Debug + 'static;

    /// The document body, parent of the drag proxy while a drag is in flight.
    fn body(&self) -> Self::Node;

    /// The caller-assigned id of an element, if it has one.
    fn element_id(&self, node: Self::Node) -> Option<ZoneId>;

    /// Look an element up by id.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Id of the zone that `node` belongs to.
    fn owner_id(&self, node: Self::Node) -> Option<ZoneId>;

    /// Parent of `node`, or `None` for detached nodes and the root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Children of `node` in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Whether `node` carries `class`.
    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    /// Add `class` to `node`. Adding a class twice keeps a single entry.
    fn add_class(&mut self, node: Self::Node, class: &str);

    /// Remove `class` from `node`.
    fn remove_class(&mut self, node: Self::Node, class: &str);

    /// Deep clone of `node` and its subtree. The clone is detached.
    fn clone_deep(&mut self, node: Self::Node) -> Self::Node;

    /// Append `child` to `parent`, moving it out of its current parent first.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Remove `child` from `parent`. No-op when `child` is not a child of `parent`.
    fn remove_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Numeric sort order attached to `node`, if any.
    fn sort_order(&self, node: Self::Node) -> Option<f64>;

    /// Apply visibility and position to a proxy node.
    fn set_proxy_style(&mut self, node: Self::Node, style: ProxyStyle);

    /// Move focus to the body, clearing any native text selection.
    fn focus_body(&mut self);

    /// Attach a listener for `kind` on `target`.
    fn listen(&mut self, target: ListenTarget<Self::Node>, kind: EventKind) -> ListenerId;

    /// Release a listener returned by [`Document::listen`].
    fn unlisten(&mut self, id: ListenerId);

    /// Whether the host is a legacy engine that needs native selection suppressed during drags.
    fn is_legacy_engine(&self) -> bool {
        false
    }

    /// Detach every child of `node`.
    fn remove_children(&mut self, node: Self::Node) {
        for child in self.children(node) {
            self.remove_child(node, child);
        }
    }

    /// Append `children` to `parent` as one batch, in order.
    ///
    /// Hosts with a fragment primitive should override this to insert in a single step.
    fn append_children(&mut self, parent: Self::Node, children: &[Self::Node]) {
        for &child in children {
            self.append_child(parent, child);
        }
    }

    /// Nearest node carrying `class`, starting at `node` and walking up through
    /// its ancestors no further than `root`.
    ///
    /// `root` itself is checked last. Returns `None` when `node` is not inside
    /// `root`, so nothing above `root` is ever returned.
    fn closest_with_class(
        &self,
        node: Self::Node,
        class: &str,
        root: Self::Node,
    ) -> Option<Self::Node> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.has_class(n, class) {
                return self.contains(root, n).then_some(n);
            }
            if n == root {
                return None;
            }
            current = self.parent(n);
        }
        None
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }
}
