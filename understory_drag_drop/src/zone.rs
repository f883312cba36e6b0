// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zones: registered elements acting as drag sources, drop targets, or both.
//!
//! A [`ZoneRegistry`] is a flat map from [`ZoneId`] to [`Zone`]. The drag-zone
//! and drop-zone registries are views over it, filtered by [`ZoneRole`]. A zone
//! registered with both roles appears in both views under the same id, and
//! inserting an id that already exists replaces the previous record.

use alloc::borrow::ToOwned;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::document::ListenerId;
use crate::hooks::{AfterDropHook, BeforeDropHook, DropEvent, HookResult, ZoneHooks};

/// Caller-assigned id of a zone element.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ZoneId(String);

impl ZoneId {
    /// Create an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ZoneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ZoneId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ZoneId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ZoneId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ZoneId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

bitflags::bitflags! {
    /// Roles a zone plays.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ZoneRole: u8 {
        /// The zone can start drags.
        const DRAG = 0b0000_0001;
        /// The zone accepts drops.
        const DROP = 0b0000_0010;
    }
}

impl ZoneRole {
    /// Drag source and drop target.
    pub const BOTH: Self = Self::DRAG.union(Self::DROP);
}

/// Typed per-zone configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneConfig {
    /// Class marking drag handles. When unset, any descendant of the zone can be dragged.
    pub drag_cls: Option<String>,
    /// Reorder the zone's children by sort order after a drop.
    pub sort: bool,
    /// Insert the proxy clone on drop instead of moving the original element.
    pub drop_proxy: bool,
    /// Arbitrary caller data, readable from the zone record.
    pub attrs: HashMap<String, String>,
}

impl ZoneConfig {
    /// Look up a caller attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

/// Options accepted by the registration entry points.
///
/// Carries the typed [`ZoneConfig`] plus the hooks to subscribe on every
/// registered zone. Hooks are shared, so one options value can register a
/// composite of many zones.
pub struct ZoneOptions<N> {
    pub(crate) config: ZoneConfig,
    pub(crate) before_drop: Vec<BeforeDropHook<N>>,
    pub(crate) after_drop: Vec<AfterDropHook<N>>,
}

impl<N> Default for ZoneOptions<N> {
    fn default() -> Self {
        Self {
            config: ZoneConfig::default(),
            before_drop: Vec::new(),
            after_drop: Vec::new(),
        }
    }
}

impl<N> fmt::Debug for ZoneOptions<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneOptions")
            .field("config", &self.config)
            .field("before_drop", &self.before_drop.len())
            .field("after_drop", &self.after_drop.len())
            .finish()
    }
}

impl<N> ZoneOptions<N> {
    /// Empty options: no drag handle class, no sorting, original-node drops, no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: ZoneConfig) -> Self {
        self.config = config;
        self
    }

    /// Only nodes carrying `class` (or with an ancestor carrying it) start drags.
    #[must_use]
    pub fn drag_cls(mut self, class: impl Into<String>) -> Self {
        self.config.drag_cls = Some(class.into());
        self
    }

    /// Reorder children by sort order after each drop into this zone.
    #[must_use]
    pub fn sort(mut self, sort: bool) -> Self {
        self.config.sort = sort;
        self
    }

    /// Insert the proxy clone on drop instead of the original element.
    #[must_use]
    pub fn drop_proxy(mut self, drop_proxy: bool) -> Self {
        self.config.drop_proxy = drop_proxy;
        self
    }

    /// Attach an arbitrary caller attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.attrs.insert(key.into(), value.into());
        self
    }

    /// Subscribe a hook run before a drop commits. Returning [`HookResult::Cancel`] vetoes the drop.
    #[must_use]
    pub fn on_before_drop(
        mut self,
        hook: impl Fn(&DropEvent<'_, N>) -> HookResult + 'static,
    ) -> Self {
        self.before_drop.push(Rc::new(hook));
        self
    }

    /// Subscribe a hook run after a drop commits.
    #[must_use]
    pub fn on_after_drop(mut self, hook: impl Fn(&DropEvent<'_, N>) + 'static) -> Self {
        self.after_drop.push(Rc::new(hook));
        self
    }

    /// The configuration these options carry.
    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }
}

/// Elements passed to a registration call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Zones<N> {
    /// A single element.
    Element(N),
    /// An ordered collection; each element becomes an independent zone.
    Composite(Vec<N>),
}

impl<N> Zones<N> {
    /// Build a composite from any collection of nodes.
    pub fn composite(nodes: impl IntoIterator<Item = N>) -> Self {
        Self::Composite(nodes.into_iter().collect())
    }

    pub(crate) fn into_nodes(self) -> Vec<N> {
        match self {
            Self::Element(node) => alloc::vec![node],
            Self::Composite(nodes) => nodes,
        }
    }
}

/// A registered zone.
#[derive(Debug)]
pub struct Zone<N> {
    pub(crate) id: ZoneId,
    pub(crate) node: N,
    pub(crate) role: ZoneRole,
    pub(crate) config: ZoneConfig,
    pub(crate) hooks: ZoneHooks<N>,
    pub(crate) listeners: SmallVec<[ListenerId; 3]>,
}

impl<N: Copy> Zone<N> {
    /// A zone with no configuration, hooks, or listeners.
    pub(crate) fn bare(id: ZoneId, node: N, role: ZoneRole) -> Self {
        Self {
            id,
            node,
            role,
            config: ZoneConfig::default(),
            hooks: ZoneHooks::default(),
            listeners: SmallVec::new(),
        }
    }

    /// The zone's id.
    pub fn id(&self) -> &ZoneId {
        &self.id
    }

    /// The zone element.
    pub fn node(&self) -> N {
        self.node
    }

    /// Roles this zone plays.
    pub fn role(&self) -> ZoneRole {
        self.role
    }

    /// The zone's configuration.
    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    /// Whether the zone can start drags.
    pub fn is_drag(&self) -> bool {
        self.role.contains(ZoneRole::DRAG)
    }

    /// Whether the zone accepts drops.
    pub fn is_drop(&self) -> bool {
        self.role.contains(ZoneRole::DROP)
    }

    /// Whether pointer listeners are attached to the zone element.
    ///
    /// Zones added with [`Coordinator::add_drop_targets`](crate::Coordinator::add_drop_targets)
    /// have none and never see pointer events themselves.
    pub fn is_listening(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Listener handles attached at registration.
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Number of hooks subscribed to this zone, before and after.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }
}

/// Flat map of zones by id.
///
/// Read-only outside the crate: zones are added and removed through the
/// [`Coordinator`](crate::Coordinator) registration calls.
#[derive(Debug)]
pub struct ZoneRegistry<N> {
    zones: HashMap<ZoneId, Zone<N>>,
}

impl<N> Default for ZoneRegistry<N> {
    fn default() -> Self {
        Self {
            zones: HashMap::new(),
        }
    }
}

impl<N: Copy + PartialEq> ZoneRegistry<N> {
    /// Create an empty registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a zone, returning the record it replaced.
    pub(crate) fn insert(&mut self, zone: Zone<N>) -> Option<Zone<N>> {
        self.zones.insert(zone.id.clone(), zone)
    }

    /// Remove a zone.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Zone<N>> {
        self.zones.remove(id)
    }

    /// Any zone with this id.
    pub fn get(&self, id: &str) -> Option<&Zone<N>> {
        self.zones.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Zone<N>> {
        self.zones.get_mut(id)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Zone<N>> + '_ {
        self.zones.values_mut()
    }

    /// The drag zone with this id.
    pub fn drag_zone(&self, id: &str) -> Option<&Zone<N>> {
        self.get(id).filter(|zone| zone.is_drag())
    }

    /// The drop zone with this id.
    pub fn drop_zone(&self, id: &str) -> Option<&Zone<N>> {
        self.get(id).filter(|zone| zone.is_drop())
    }

    /// All drag zones, in no particular order.
    pub fn drag_zones(&self) -> impl Iterator<Item = &Zone<N>> + '_ {
        self.zones.values().filter(|zone| zone.is_drag())
    }

    /// All drop zones, in no particular order.
    pub fn drop_zones(&self) -> impl Iterator<Item = &Zone<N>> + '_ {
        self.zones.values().filter(|zone| zone.is_drop())
    }

    /// The listening zone whose element is `node`.
    pub fn listening_zone(&self, node: N) -> Option<&Zone<N>> {
        self.zones
            .values()
            .find(|zone| zone.node == node && zone.is_listening())
    }

    /// Number of registered zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns `true` if no zone is registered.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Remove every zone, yielding the records.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Zone<N>> + '_ {
        self.zones.drain().map(|(_, zone)| zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_is_drag_and_drop() {
        assert!(ZoneRole::BOTH.contains(ZoneRole::DRAG));
        assert!(ZoneRole::BOTH.contains(ZoneRole::DROP));
    }

    #[test]
    fn registry_views_follow_role() {
        let mut reg = ZoneRegistry::new();
        reg.insert(Zone::bare("a".into(), 1_u32, ZoneRole::DRAG));
        reg.insert(Zone::bare("b".into(), 2_u32, ZoneRole::DROP));
        reg.insert(Zone::bare("c".into(), 3_u32, ZoneRole::BOTH));

        assert!(reg.drag_zone("a").is_some());
        assert!(reg.drop_zone("a").is_none());
        assert!(reg.drag_zone("b").is_none());
        assert!(reg.drop_zone("b").is_some());
        assert!(reg.drag_zone("c").is_some());
        assert!(reg.drop_zone("c").is_some());
        assert_eq!(reg.drag_zones().count(), 2);
        assert_eq!(reg.drop_zones().count(), 2);
    }

    #[test]
    fn insert_replaces_same_id() {
        let mut reg = ZoneRegistry::new();
        reg.insert(Zone::bare("a".into(), 1_u32, ZoneRole::BOTH));
        let old = reg.insert(Zone::bare("a".into(), 9_u32, ZoneRole::DRAG));

        assert_eq!(old.map(|z| z.node()), Some(1));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("a").map(|z| z.node()), Some(9));
        assert!(reg.drop_zone("a").is_none());
    }

    #[test]
    fn bare_zones_do_not_listen() {
        let mut reg = ZoneRegistry::new();
        reg.insert(Zone::bare("a".into(), 1_u32, ZoneRole::DROP));
        assert!(reg.listening_zone(1).is_none());
    }

    #[test]
    fn options_builder_collects_config() {
        let opts: ZoneOptions<u32> = ZoneOptions::new()
            .drag_cls("handle")
            .sort(true)
            .drop_proxy(true)
            .attr("group", "tasks");

        assert_eq!(opts.config().drag_cls.as_deref(), Some("handle"));
        assert!(opts.config().sort);
        assert!(opts.config().drop_proxy);
        assert_eq!(opts.config().attr("group"), Some("tasks"));
        assert_eq!(opts.config().attr("missing"), None);
    }

    #[test]
    fn zone_id_compares_with_str() {
        let id = ZoneId::new("left");
        assert_eq!(id, "left");
        assert_eq!(id.as_str(), "left");
        assert_eq!(alloc::format!("{id}"), "left");
    }
}
