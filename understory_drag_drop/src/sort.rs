// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-drop ordering of a zone's children.

use alloc::vec::Vec;

use crate::document::Document;

/// Reorder the children of `parent` by their numeric sort order.
///
/// Children are sorted ascending and stably, so equal orders keep their
/// document order. Every child is detached first and only the children that
/// carry a sort order are re-appended, in one batch. Children without a sort
/// order are left out of `parent`.
///
/// Returns the number of children re-appended.
pub fn sort_children<D: Document + ?Sized>(doc: &mut D, parent: D::Node) -> usize {
    let mut sortable: Vec<(f64, D::Node)> = doc
        .children(parent)
        .into_iter()
        .filter_map(|child| doc.sort_order(child).map(|order| (order, child)))
        .collect();
    sortable.sort_by(|a, b| a.0.total_cmp(&b.0));

    let ordered: Vec<D::Node> = sortable.into_iter().map(|(_, child)| child).collect();
    doc.remove_children(parent);
    doc.append_children(parent, &ordered);
    log::trace!("sorted {} children of {parent:?}", ordered.len());
    ordered.len()
}
