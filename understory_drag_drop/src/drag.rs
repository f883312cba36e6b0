// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State of the drag in flight: the element being moved and the proxy following the pointer.

use kurbo::Point;

use crate::zone::ZoneId;

/// The real element picked up by a drag, and the zone that owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceElement<N> {
    pub(crate) node: N,
    pub(crate) dd_owner: ZoneId,
}

impl<N: Copy> SourceElement<N> {
    pub(crate) fn new(node: N, dd_owner: ZoneId) -> Self {
        Self { node, dd_owner }
    }

    /// The element being moved.
    pub fn node(&self) -> N {
        self.node
    }

    /// Id of the zone currently owning the element.
    ///
    /// This is the zone the drag started in until a drop commits, then the zone it was dropped into.
    pub fn dd_owner(&self) -> &ZoneId {
        &self.dd_owner
    }
}

/// Clone of the dragged element that follows the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct DragProxy<N> {
    pub(crate) node: N,
    pub(crate) position: Point,
    pub(crate) visible: bool,
    pub(crate) over_drop_zone: bool,
}

impl<N: Copy> DragProxy<N> {
    pub(crate) fn new(node: N, position: Point) -> Self {
        Self {
            node,
            position,
            visible: false,
            over_drop_zone: false,
        }
    }

    /// The cloned node.
    pub fn node(&self) -> N {
        self.node
    }

    /// Last pointer position applied to the proxy, in page pixels.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Whether the proxy has been shown. It stays hidden until the first pointer move.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the proxy carries the over-drop-zone class.
    pub fn is_over_drop_zone(&self) -> bool {
        self.over_drop_zone
    }
}
