// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag-drop coordinator: zone registration and the pointer-driven drag/drop state machine.
//!
//! ## Event sequence
//!
//! The host delivers pointer events for the listeners the coordinator asked
//! for through [`Document::listen`]:
//!
//! 1) [`Coordinator::pointer_down`] on a drag zone picks up an element and
//!    appends a proxy clone to the body.
//! 2) [`Coordinator::pointer_move`] makes the proxy follow the pointer.
//! 3) [`Coordinator::pointer_over`] / [`Coordinator::pointer_out`] record and
//!    clear the drop zone under the pointer.
//! 4) [`Coordinator::pointer_up`] commits the drop into that zone, or aborts.
//!
//! Each handler checks whether a drag is in flight, so out-of-order events are
//! ignored instead of rejected.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Point;
use smallvec::SmallVec;

use crate::document::{Document, EventKind, ListenTarget, ListenerId, ProxyStyle};
use crate::drag::{DragProxy, SourceElement};
use crate::error::RegisterError;
use crate::hooks::{DropContext, DropEvent, HookResult, SubscriptionId, ZoneHooks};
use crate::sort::sort_children;
use crate::zone::{Zone, ZoneId, ZoneOptions, ZoneRegistry, ZoneRole, Zones};

/// Class added to the proxy while a drag is in flight.
pub const DRAGGING_CLASS: &str = "Pete_dragging";

/// Class added to the proxy while it hovers an eligible drop zone.
pub const OVER_DROP_ZONE_CLASS: &str = "Pete_overDropZone";

/// How a drop target is compared with the source's current owner on release.
///
/// A drop only commits when the target is not "within" the owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum OwnerMatch {
    /// The target is within the owner only when the ids are equal.
    #[default]
    Exact,
    /// The target is within the owner when the owner id is a substring of the target id.
    ///
    /// Compatible with hierarchical ids such as `list` / `list-archive`, where
    /// dropping into `list-archive` from `list` is treated as staying put.
    Substring,
}

impl OwnerMatch {
    /// Whether `target` counts as the same zone as `owner`.
    pub fn is_within(self, target: &str, owner: &str) -> bool {
        match self {
            Self::Exact => target == owner,
            Self::Substring => target.contains(owner),
        }
    }
}

/// Coordinator-wide settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Class added to the proxy for the whole drag.
    pub dragging_class: String,
    /// Class added to the proxy while it hovers an eligible drop zone.
    pub over_drop_zone_class: String,
    /// Comparison used on release to decide whether the target is the owning zone.
    pub owner_match: OwnerMatch,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            dragging_class: DRAGGING_CLASS.to_string(),
            over_drop_zone_class: OVER_DROP_ZONE_CLASS.to_string(),
            owner_match: OwnerMatch::Exact,
        }
    }
}

/// A pointer event delivered to a zone listener.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent<N> {
    /// The node the pointer is actually over.
    pub target: N,
    /// The zone element whose listener is handling the event.
    pub current_target: N,
    /// Pointer position in page pixels, scroll offset included.
    pub page: Point,
}

impl<N> PointerEvent<N> {
    /// Create a pointer event.
    pub fn new(target: N, current_target: N, page: Point) -> Self {
        Self {
            target,
            current_target,
            page,
        }
    }
}

/// Any event the coordinator listens for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event<N> {
    /// Pointer pressed on a zone.
    PointerDown(PointerEvent<N>),
    /// Pointer moved, at the given page position.
    PointerMove(Point),
    /// Pointer entered a zone or a descendant.
    PointerOver(PointerEvent<N>),
    /// Pointer left a zone or a descendant.
    PointerOut(PointerEvent<N>),
    /// Pointer released, at the given page position.
    PointerUp(Point),
    /// Native selection about to start.
    SelectStart,
}

/// What the host should do with the native default action of an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventResponse {
    /// Let the default action run.
    Continue,
    /// Suppress the default action.
    PreventDefault,
}

/// Result of a pointer release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was in flight.
    Idle,
    /// Released outside any eligible zone, back over the owning zone, or the
    /// zone refused the element. The proxy was removed and ownership is unchanged.
    Aborted,
    /// A before-drop hook vetoed the drop. The proxy was removed.
    Cancelled,
    /// The element was moved into `zone`.
    Dropped {
        /// The zone that now owns the element.
        zone: ZoneId,
    },
}

/// Ids and subscriptions created by one registration call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registration {
    zones: Vec<ZoneId>,
    subscriptions: Vec<SubscriptionId>,
}

impl Registration {
    /// Registered zone ids, in input order.
    pub fn zones(&self) -> &[ZoneId] {
        &self.zones
    }

    /// Hook subscriptions created for the registered zones.
    pub fn subscriptions(&self) -> &[SubscriptionId] {
        &self.subscriptions
    }
}

/// Owns the zone registry and the state of the drag in flight.
///
/// One coordinator drives at most one drag at a time. It owns its
/// [`Document`], reachable through [`Coordinator::document`] and
/// [`Coordinator::document_mut`].
#[derive(Debug)]
pub struct Coordinator<D: Document> {
    doc: D,
    config: CoordinatorConfig,
    zones: ZoneRegistry<D::Node>,
    source: Option<SourceElement<D::Node>>,
    proxy: Option<DragProxy<D::Node>>,
    drop_target: Option<ZoneId>,
    pointer_up: Option<ListenerId>,
    pointer_move: Option<ListenerId>,
    select_start: Option<ListenerId>,
    next_subscription: u64,
}

impl<D: Document> Coordinator<D> {
    /// Create a coordinator with the default configuration.
    pub fn new(doc: D) -> Self {
        Self::with_config(doc, CoordinatorConfig::default())
    }

    /// Create a coordinator with an explicit configuration.
    pub fn with_config(doc: D, config: CoordinatorConfig) -> Self {
        Self {
            doc,
            config,
            zones: ZoneRegistry::new(),
            source: None,
            proxy: None,
            drop_target: None,
            pointer_up: None,
            pointer_move: None,
            select_start: None,
            next_subscription: 0,
        }
    }

    /// The coordinator's configuration.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// The document.
    pub fn document(&self) -> &D {
        &self.doc
    }

    /// The document, mutably.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    /// Give the document back.
    ///
    /// Listeners are not released; call [`Coordinator::dispose`] first if the document outlives the coordinator.
    pub fn into_document(self) -> D {
        self.doc
    }

    // --- registration ---

    /// Register elements that can start drags but not accept drops.
    pub fn drag_zone(
        &mut self,
        zones: Zones<D::Node>,
        options: ZoneOptions<D::Node>,
    ) -> Result<Registration, RegisterError> {
        self.register(zones, ZoneRole::DRAG, options)
    }

    /// Register elements that accept drops but cannot start drags.
    pub fn drop_zone(
        &mut self,
        zones: Zones<D::Node>,
        options: ZoneOptions<D::Node>,
    ) -> Result<Registration, RegisterError> {
        self.register(zones, ZoneRole::DROP, options)
    }

    /// Register elements that both start drags and accept drops.
    pub fn init_dd(
        &mut self,
        zones: Zones<D::Node>,
        options: ZoneOptions<D::Node>,
    ) -> Result<Registration, RegisterError> {
        self.register(zones, ZoneRole::BOTH, options)
    }

    /// Register elements as zones with `role`.
    ///
    /// Every element gets pointer-down, pointer-over and pointer-out listeners,
    /// the hooks of `options`, and a copy of its configuration. An id that is
    /// already registered is replaced, and its old listeners are released.
    ///
    /// All ids are resolved before anything is registered: on error the
    /// registry is unchanged.
    pub fn register(
        &mut self,
        zones: Zones<D::Node>,
        role: ZoneRole,
        options: ZoneOptions<D::Node>,
    ) -> Result<Registration, RegisterError> {
        let resolved = self.resolve(zones.into_nodes())?;
        self.bind_pointer_up();

        let mut registration = Registration::default();
        for (node, id) in resolved {
            self.release(id.as_str());

            let listeners: SmallVec<[ListenerId; 3]> = [
                EventKind::PointerDown,
                EventKind::PointerOver,
                EventKind::PointerOut,
            ]
            .into_iter()
            .map(|kind| self.doc.listen(ListenTarget::Node(node), kind))
            .collect();

            let mut hooks = ZoneHooks::default();
            for hook in &options.before_drop {
                let sub = self.next_subscription();
                hooks.push_before(sub, Rc::clone(hook));
                registration.subscriptions.push(sub);
            }
            for hook in &options.after_drop {
                let sub = self.next_subscription();
                hooks.push_after(sub, Rc::clone(hook));
                registration.subscriptions.push(sub);
            }

            log::debug!("registered zone {id} as {role:?}");
            self.zones.insert(Zone {
                id: id.clone(),
                node,
                role,
                config: options.config.clone(),
                hooks,
                listeners,
            });
            registration.zones.push(id);
        }
        Ok(registration)
    }

    /// Add elements straight to the drop registry.
    ///
    /// No listeners, hooks or configuration are attached: such a zone only sees
    /// pointer events once some other registration listens on it. An id that is
    /// already registered keeps its record and gains the drop role.
    pub fn add_drop_targets(
        &mut self,
        nodes: impl IntoIterator<Item = D::Node>,
    ) -> Result<Registration, RegisterError> {
        let resolved = self.resolve(nodes.into_iter().collect())?;
        self.bind_pointer_up();

        let mut registration = Registration::default();
        for (node, id) in resolved {
            match self.zones.get_mut(id.as_str()) {
                Some(zone) => zone.role |= ZoneRole::DROP,
                None => {
                    self.zones.insert(Zone::bare(id.clone(), node, ZoneRole::DROP));
                }
            }
            log::debug!("added drop target {id}");
            registration.zones.push(id);
        }
        Ok(registration)
    }

    /// Remove a zone and release its listeners. Returns `false` if the id was not registered.
    pub fn unregister(&mut self, id: &str) -> bool {
        if self.drop_target.as_ref().is_some_and(|target| target == id) {
            self.drop_target = None;
        }
        self.release(id).is_some()
    }

    /// Subscribe a before-drop hook on a registered zone.
    pub fn subscribe_before_drop(
        &mut self,
        id: &str,
        hook: impl Fn(&DropEvent<'_, D::Node>) -> HookResult + 'static,
    ) -> Option<SubscriptionId> {
        let sub = self.next_subscription();
        let zone = self.zones.get_mut(id)?;
        zone.hooks.push_before(sub, Rc::new(hook));
        Some(sub)
    }

    /// Subscribe an after-drop hook on a registered zone.
    pub fn subscribe_after_drop(
        &mut self,
        id: &str,
        hook: impl Fn(&DropEvent<'_, D::Node>) + 'static,
    ) -> Option<SubscriptionId> {
        let sub = self.next_subscription();
        let zone = self.zones.get_mut(id)?;
        zone.hooks.push_after(sub, Rc::new(hook));
        Some(sub)
    }

    /// Remove a hook subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, sub: SubscriptionId) -> bool {
        self.zones.iter_mut().any(|zone| zone.hooks.remove(sub))
    }

    /// Release every listener, drop an in-flight proxy, and forget all zones.
    ///
    /// The coordinator can be reused afterwards; the next registration binds
    /// the global pointer-up listener again.
    pub fn dispose(&mut self) {
        if let Some(proxy) = self.proxy.take() {
            self.detach_proxy(&proxy);
        }
        self.stop_tracking();

        let listeners: Vec<ListenerId> = self
            .zones
            .drain()
            .flat_map(|zone| zone.listeners)
            .collect();
        for id in listeners {
            self.doc.unlisten(id);
        }
        if let Some(id) = self.pointer_up.take() {
            self.doc.unlisten(id);
        }
        self.drop_target = None;
        self.source = None;
        log::debug!("coordinator disposed");
    }

    // --- queries ---

    /// The zone registry.
    pub fn zones(&self) -> &ZoneRegistry<D::Node> {
        &self.zones
    }

    /// Any registered zone with this id.
    pub fn zone(&self, id: &str) -> Option<&Zone<D::Node>> {
        self.zones.get(id)
    }

    /// All drop zones.
    pub fn drop_zones(&self) -> impl Iterator<Item = &Zone<D::Node>> + '_ {
        self.zones.drop_zones()
    }

    /// All drag zones.
    pub fn drag_zones(&self) -> impl Iterator<Item = &Zone<D::Node>> + '_ {
        self.zones.drag_zones()
    }

    /// The proxy of the drag in flight.
    pub fn drag_proxy(&self) -> Option<&DragProxy<D::Node>> {
        self.proxy.as_ref()
    }

    /// The element picked up by the current or most recent drag.
    pub fn source(&self) -> Option<&SourceElement<D::Node>> {
        self.source.as_ref()
    }

    /// The drop zone currently under the pointer.
    pub fn drop_target(&self) -> Option<&ZoneId> {
        self.drop_target.as_ref()
    }

    /// Whether a drag is in flight.
    pub fn is_dragging(&self) -> bool {
        self.proxy.is_some()
    }

    /// Whether the global pointer-up listener is bound.
    pub fn is_bound(&self) -> bool {
        self.pointer_up.is_some()
    }

    // --- events ---

    /// Dispatch any event to its handler.
    pub fn handle(&mut self, event: Event<D::Node>) -> EventResponse {
        match event {
            Event::PointerDown(ev) => self.pointer_down(&ev),
            Event::PointerMove(page) => {
                self.pointer_move(page);
                EventResponse::Continue
            }
            Event::PointerOver(ev) => {
                self.pointer_over(&ev);
                EventResponse::Continue
            }
            Event::PointerOut(ev) => {
                self.pointer_out(&ev);
                EventResponse::Continue
            }
            Event::PointerUp(page) => {
                self.pointer_up(page);
                EventResponse::Continue
            }
            Event::SelectStart => {
                if self.select_start.is_some() {
                    EventResponse::PreventDefault
                } else {
                    EventResponse::Continue
                }
            }
        }
    }

    /// Pointer pressed on a zone element.
    ///
    /// Starts a drag when the handling zone is a drag zone and the pointer is on
    /// a drag handle (or the zone has no handle class). Handles are searched
    /// from the target up to the zone element, never above it. The default
    /// action is always prevented.
    pub fn pointer_down(&mut self, event: &PointerEvent<D::Node>) -> EventResponse {
        let zone = self
            .doc
            .owner_id(event.current_target)
            .and_then(|owner| self.zones.drag_zone(owner.as_str()))
            .filter(|zone| zone.node == event.current_target && zone.is_listening());
        let Some(zone) = zone else {
            return EventResponse::PreventDefault;
        };

        let owner = zone.id.clone();
        let handle = match zone.config.drag_cls.as_deref() {
            Some(class) => self
                .doc
                .closest_with_class(event.target, class, event.current_target),
            None => Some(event.target),
        };

        match handle {
            Some(node) => self.start_drag(node, owner, event.page),
            None => log::trace!("pointer down in {owner} is not on a drag handle"),
        }

        self.doc.focus_body();
        if self.doc.is_legacy_engine() && self.select_start.is_none() {
            self.select_start = Some(
                self.doc
                    .listen(ListenTarget::Document, EventKind::SelectStart),
            );
        }
        EventResponse::PreventDefault
    }

    /// Pointer moved: the proxy follows it.
    pub fn pointer_move(&mut self, page: Point) {
        let Some(proxy) = self.proxy.as_mut() else {
            return;
        };
        proxy.visible = true;
        proxy.position = page;
        self.doc.set_proxy_style(
            proxy.node,
            ProxyStyle {
                visible: true,
                position: page,
            },
        );
    }

    /// Pointer entered a zone element or one of its descendants.
    ///
    /// Records the hovered zone as the drop target when it is a drop zone other
    /// than the source's owner.
    pub fn pointer_over(&mut self, event: &PointerEvent<D::Node>) {
        if self.proxy.is_none() || self.zones.listening_zone(event.current_target).is_none() {
            return;
        }
        let Some(owner) = self.doc.owner_id(event.target) else {
            return;
        };
        let eligible = self.source.as_ref().is_some_and(|source| source.dd_owner != owner)
            && self.zones.drop_zone(owner.as_str()).is_some();
        if !eligible {
            return;
        }

        if let Some(proxy) = self.proxy.as_mut() {
            self.doc
                .add_class(proxy.node, &self.config.over_drop_zone_class);
            proxy.over_drop_zone = true;
        }
        log::trace!("hovering drop zone {owner}");
        self.drop_target = Some(owner);
    }

    /// Pointer left a zone element or one of its descendants: the drop target is cleared.
    pub fn pointer_out(&mut self, event: &PointerEvent<D::Node>) {
        if self.zones.listening_zone(event.current_target).is_none() {
            return;
        }
        let Some(proxy) = self.proxy.as_mut() else {
            return;
        };
        self.drop_target = None;
        self.doc
            .remove_class(proxy.node, &self.config.over_drop_zone_class);
        proxy.over_drop_zone = false;
    }

    /// Pointer released anywhere: commit or abort the drag in flight.
    pub fn pointer_up(&mut self, page: Point) -> DropOutcome {
        let Some(proxy) = self.proxy.take() else {
            self.stop_tracking();
            return DropOutcome::Idle;
        };

        let outcome = match self.drop_target.take() {
            Some(target) if !self.is_within_owner(&target) => self.commit(target, &proxy, page),
            _ => {
                self.detach_proxy(&proxy);
                log::debug!("drop aborted outside any eligible zone");
                DropOutcome::Aborted
            }
        };
        self.stop_tracking();
        outcome
    }

    // --- internals ---

    fn commit(&mut self, target: ZoneId, proxy: &DragProxy<D::Node>, page: Point) -> DropOutcome {
        let Some(zone_target) = self.doc.element_by_id(target.as_str()) else {
            log::warn!("drop zone {target} no longer resolves to an element");
            self.detach_proxy(proxy);
            return DropOutcome::Aborted;
        };
        let Some(source) = self.source.as_ref() else {
            self.detach_proxy(proxy);
            return DropOutcome::Aborted;
        };
        let Some(zone) = self
            .zones
            .drop_zone(target.as_str())
            .filter(|zone| zone.id != source.dd_owner)
        else {
            log::warn!("no drop zone {target} to receive the drop");
            self.detach_proxy(proxy);
            return DropOutcome::Aborted;
        };

        let drop_proxy = zone.config.drop_proxy;
        let sort = zone.config.sort;
        let source_node = source.node;
        let verdict = zone.hooks.run_before(&DropEvent {
            page,
            zones: &self.zones,
            context: DropContext {
                source,
                drop_zone_target: &target,
                zone_target,
            },
        });

        self.detach_proxy(proxy);
        if verdict == HookResult::Cancel {
            log::debug!("drop into {target} cancelled by a hook");
            return DropOutcome::Cancelled;
        }

        let moved = if drop_proxy { proxy.node } else { source_node };
        self.doc.append_child(zone_target, moved);
        if self.doc.parent(moved) != Some(zone_target) {
            log::warn!("{target} refused {moved:?}; ownership unchanged");
            return DropOutcome::Aborted;
        }
        if let Some(source) = self.source.as_mut() {
            source.dd_owner = target.clone();
        }
        if sort {
            sort_children(&mut self.doc, zone_target);
        }

        if let (Some(source), Some(zone)) = (self.source.as_ref(), self.zones.get(target.as_str())) {
            zone.hooks.run_after(&DropEvent {
                page,
                zones: &self.zones,
                context: DropContext {
                    source,
                    drop_zone_target: &target,
                    zone_target,
                },
            });
        }
        log::debug!("dropped {moved:?} into {target}");
        DropOutcome::Dropped { zone: target }
    }

    fn start_drag(&mut self, node: D::Node, owner: ZoneId, page: Point) {
        if let Some(stale) = self.proxy.take() {
            self.detach_proxy(&stale);
        }
        match self.source.as_mut() {
            Some(source) => {
                source.node = node;
                source.dd_owner = owner;
            }
            None => self.source = Some(SourceElement::new(node, owner)),
        }

        let clone = self.doc.clone_deep(node);
        self.doc.add_class(clone, &self.config.dragging_class);
        let body = self.doc.body();
        self.doc.append_child(body, clone);
        self.proxy = Some(DragProxy::new(clone, page));

        if self.pointer_move.is_none() {
            self.pointer_move = Some(
                self.doc
                    .listen(ListenTarget::Document, EventKind::PointerMove),
            );
        }
        log::debug!("drag started on {node:?}");
    }

    fn is_within_owner(&self, target: &ZoneId) -> bool {
        self.source.as_ref().is_some_and(|source| {
            self.config
                .owner_match
                .is_within(target.as_str(), source.dd_owner.as_str())
        })
    }

    fn detach_proxy(&mut self, proxy: &DragProxy<D::Node>) {
        let body = self.doc.body();
        self.doc.remove_child(body, proxy.node);
    }

    fn stop_tracking(&mut self) {
        if let Some(id) = self.select_start.take() {
            self.doc.unlisten(id);
        }
        if let Some(id) = self.pointer_move.take() {
            self.doc.unlisten(id);
        }
    }

    fn bind_pointer_up(&mut self) {
        if self.pointer_up.is_none() {
            self.pointer_up = Some(self.doc.listen(ListenTarget::Document, EventKind::PointerUp));
        }
    }

    fn resolve(&self, nodes: Vec<D::Node>) -> Result<Vec<(D::Node, ZoneId)>, RegisterError> {
        nodes
            .into_iter()
            .map(|node| {
                self.doc
                    .element_id(node)
                    .map(|id| (node, id))
                    .ok_or_else(|| RegisterError::UnresolvedElement {
                        node: format!("{node:?}"),
                    })
            })
            .collect()
    }

    /// Remove a zone and release its listeners.
    fn release(&mut self, id: &str) -> Option<Zone<D::Node>> {
        let zone = self.zones.remove(id)?;
        for &listener in zone.listeners() {
            self.doc.unlisten(listener);
        }
        Some(zone)
    }

    fn next_subscription(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDocument, NodeId};

    struct Fixture {
        dd: Coordinator<MemoryDocument>,
        left: NodeId,
        right: NodeId,
        item: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let left = doc.create_element("left");
        doc.set_element_id(left, "left");
        let right = doc.create_element("right");
        doc.set_element_id(right, "right");
        doc.append_child(body, left);
        doc.append_child(body, right);
        let item = doc.create_element("item");
        doc.append_child(left, item);

        let mut dd = Coordinator::new(doc);
        dd.init_dd(Zones::Element(left), ZoneOptions::new()).unwrap();
        dd.init_dd(Zones::Element(right), ZoneOptions::new()).unwrap();
        Fixture {
            dd,
            left,
            right,
            item,
        }
    }

    #[test]
    fn owner_match_policies() {
        assert!(OwnerMatch::Exact.is_within("list", "list"));
        assert!(!OwnerMatch::Exact.is_within("list-2", "list"));
        assert!(OwnerMatch::Substring.is_within("list-2", "list"));
        assert!(!OwnerMatch::Substring.is_within("grid", "list"));
    }

    #[test]
    fn pointer_down_starts_a_drag() {
        let mut f = fixture();
        let response = f
            .dd
            .pointer_down(&PointerEvent::new(f.item, f.left, Point::new(3.0, 4.0)));

        assert_eq!(response, EventResponse::PreventDefault);
        let proxy = f.dd.drag_proxy().unwrap().clone();
        assert_ne!(proxy.node(), f.item);
        assert!(!proxy.is_visible());
        assert!(f.dd.document().has_class(proxy.node(), DRAGGING_CLASS));
        assert_eq!(f.dd.document().parent(proxy.node()), Some(f.dd.document().body()));
        assert_eq!(f.dd.source().map(|s| s.dd_owner().as_str()), Some("left"));
        assert_eq!(f.dd.document().focus_count(), 1);
        assert_eq!(f.dd.document().listener_count(EventKind::PointerMove), 1);
    }

    #[test]
    fn pointer_move_positions_proxy() {
        let mut f = fixture();
        f.dd.pointer_down(&PointerEvent::new(f.item, f.left, Point::ZERO));
        f.dd.pointer_move(Point::new(40.0, 25.0));

        let proxy = f.dd.drag_proxy().unwrap();
        assert!(proxy.is_visible());
        assert_eq!(proxy.position(), Point::new(40.0, 25.0));
        assert_eq!(
            f.dd.document().proxy_style(proxy.node()),
            Some(ProxyStyle {
                visible: true,
                position: Point::new(40.0, 25.0),
            })
        );
    }

    #[test]
    fn pointer_move_without_drag_is_ignored() {
        let mut f = fixture();
        f.dd.pointer_move(Point::new(1.0, 1.0));
        assert!(f.dd.drag_proxy().is_none());
    }

    #[test]
    fn drop_moves_item_and_transfers_ownership() {
        let mut f = fixture();
        f.dd.pointer_down(&PointerEvent::new(f.item, f.left, Point::ZERO));
        f.dd.pointer_over(&PointerEvent::new(f.right, f.right, Point::ZERO));
        let proxy = f.dd.drag_proxy().unwrap().node();

        let outcome = f.dd.pointer_up(Point::ZERO);

        assert_eq!(outcome, DropOutcome::Dropped { zone: "right".into() });
        assert_eq!(f.dd.document().parent(f.item), Some(f.right));
        assert!(!f.dd.document().is_attached(proxy));
        assert_eq!(f.dd.source().map(|s| s.dd_owner().as_str()), Some("right"));
        assert!(!f.dd.is_dragging());
        assert!(f.dd.drop_target().is_none());
        assert_eq!(f.dd.document().listener_count(EventKind::PointerMove), 0);
    }

    #[test]
    fn release_with_nothing_in_flight_is_idle() {
        let mut f = fixture();
        assert_eq!(f.dd.pointer_up(Point::ZERO), DropOutcome::Idle);
    }

    #[test]
    fn stale_target_detaches_proxy() {
        let mut f = fixture();
        f.dd.pointer_down(&PointerEvent::new(f.item, f.left, Point::ZERO));
        f.dd.pointer_over(&PointerEvent::new(f.right, f.right, Point::ZERO));
        let proxy = f.dd.drag_proxy().unwrap().node();

        // The zone disappears from the registry while the target is still recorded.
        f.dd.zones.remove("right");

        assert_eq!(f.dd.pointer_up(Point::ZERO), DropOutcome::Aborted);
        assert!(!f.dd.document().is_attached(proxy));
        assert_eq!(f.dd.document().parent(f.item), Some(f.left));
    }

    #[test]
    fn dispose_releases_everything() {
        let mut f = fixture();
        f.dd.pointer_down(&PointerEvent::new(f.item, f.left, Point::ZERO));
        let proxy = f.dd.drag_proxy().unwrap().node();

        f.dd.dispose();

        let doc = f.dd.document();
        assert!(!doc.is_attached(proxy));
        for kind in [
            EventKind::PointerDown,
            EventKind::PointerOver,
            EventKind::PointerOut,
            EventKind::PointerMove,
            EventKind::PointerUp,
        ] {
            assert_eq!(doc.listener_count(kind), 0, "{kind:?} listener left behind");
        }
        assert!(f.dd.zones().is_empty());
        assert!(!f.dd.is_bound());
    }

    #[test]
    fn select_start_is_suppressed_on_legacy_engines() {
        let mut f = fixture();
        f.dd.document_mut().set_legacy_engine(true);
        f.dd.pointer_down(&PointerEvent::new(f.item, f.left, Point::ZERO));

        assert_eq!(f.dd.handle(Event::SelectStart), EventResponse::PreventDefault);
        assert_eq!(f.dd.document().listener_count(EventKind::SelectStart), 1);

        f.dd.pointer_up(Point::ZERO);
        assert_eq!(f.dd.handle(Event::SelectStart), EventResponse::Continue);
        assert_eq!(f.dd.document().listener_count(EventKind::SelectStart), 0);
    }
}
