// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop lifecycle hooks.
//!
//! Each zone owns two ordered hook lists:
//!
//! - **before drop**: runs before a drop into the zone commits. Hooks run in
//!   subscription order and the first [`HookResult::Cancel`] short-circuits the
//!   rest and vetoes the drop.
//! - **after drop**: runs once the dragged node has been re-parented, the owner
//!   updated and the zone sorted. These hooks cannot veto anything.
//!
//! Hooks receive a [`DropEvent`] borrowing the current [`DropContext`] and a
//! read-only view of the zone registry; neither is retained after the call
//! returns.

use alloc::rc::Rc;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

use crate::drag::SourceElement;
use crate::zone::{ZoneId, ZoneRegistry};

/// Result of a before-drop hook.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum HookResult {
    /// Let the drop continue.
    #[default]
    Proceed,
    /// Veto the drop. The proxy is still removed, but nothing is re-parented.
    Cancel,
}

/// Identifies a hook subscription so it can be removed again.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// What is being dropped where.
#[derive(Debug)]
pub struct DropContext<'a, N> {
    /// The element being moved and its current owner.
    pub source: &'a SourceElement<N>,
    /// Id of the zone the pointer is over.
    pub drop_zone_target: &'a ZoneId,
    /// The resolved element of that zone.
    pub zone_target: N,
}

/// Argument passed to drop hooks.
#[derive(Debug)]
pub struct DropEvent<'a, N> {
    /// Pointer position of the release, in page pixels.
    pub page: Point,
    /// Every registered zone, for hooks that inspect the other drop zones.
    pub zones: &'a ZoneRegistry<N>,
    /// The drop being performed.
    pub context: DropContext<'a, N>,
}

/// Hook run before a drop commits.
pub type BeforeDropHook<N> = Rc<dyn Fn(&DropEvent<'_, N>) -> HookResult>;

/// Hook run after a drop commits.
pub type AfterDropHook<N> = Rc<dyn Fn(&DropEvent<'_, N>)>;

/// Ordered hook lists of one zone.
pub(crate) struct ZoneHooks<N> {
    before: SmallVec<[(SubscriptionId, BeforeDropHook<N>); 1]>,
    after: SmallVec<[(SubscriptionId, AfterDropHook<N>); 1]>,
}

impl<N> Default for ZoneHooks<N> {
    fn default() -> Self {
        Self {
            before: SmallVec::new(),
            after: SmallVec::new(),
        }
    }
}

impl<N> fmt::Debug for ZoneHooks<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let before: SmallVec<[SubscriptionId; 1]> = self.before.iter().map(|(id, _)| *id).collect();
        let after: SmallVec<[SubscriptionId; 1]> = self.after.iter().map(|(id, _)| *id).collect();
        f.debug_struct("ZoneHooks")
            .field("before", &before)
            .field("after", &after)
            .finish()
    }
}

impl<N> ZoneHooks<N> {
    pub(crate) fn push_before(&mut self, id: SubscriptionId, hook: BeforeDropHook<N>) {
        self.before.push((id, hook));
    }

    pub(crate) fn push_after(&mut self, id: SubscriptionId, hook: AfterDropHook<N>) {
        self.after.push((id, hook));
    }

    /// Remove a subscription from either list.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let len = self.len();
        self.before.retain(|(sub, _)| *sub != id);
        self.after.retain(|(sub, _)| *sub != id);
        self.len() != len
    }

    pub(crate) fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    /// Run before-drop hooks in order, stopping at the first cancellation.
    pub(crate) fn run_before(&self, event: &DropEvent<'_, N>) -> HookResult {
        for (_, hook) in &self.before {
            if hook(event) == HookResult::Cancel {
                return HookResult::Cancel;
            }
        }
        HookResult::Proceed
    }

    /// Run every after-drop hook in order.
    pub(crate) fn run_after(&self, event: &DropEvent<'_, N>) {
        for (_, hook) in &self.after {
            hook(event);
        }
    }
}
