// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag_drop --heading-base-level=0

//! Understory Drag Drop: drag-and-drop coordination for element trees.
//!
//! Elements of a document tree are registered as **zones**: drag sources, drop
//! targets, or both. A [`Coordinator`] turns the host's pointer events into a
//! drag: it clones the picked-up element into a proxy that follows the
//! pointer, tracks which drop zone is under it, and on release moves the
//! element into that zone, optionally reordering the zone's children.
//!
//! The crate does not own a tree or an event loop. The host implements
//! [`Document`] over its own nodes and forwards the events the coordinator
//! listens for. [`memory::MemoryDocument`] is an in-memory implementation for
//! tests and headless use.
//!
//! ## Registration
//!
//! - [`Coordinator::drag_zone`]: the element can start drags but accepts no drops.
//! - [`Coordinator::drop_zone`]: the element accepts drops but starts no drags.
//! - [`Coordinator::init_dd`]: both.
//! - [`Coordinator::add_drop_targets`]: add elements to the drop registry without
//!   listeners or configuration.
//!
//! Each call takes a single element or a composite ([`Zones`]) and
//! [`ZoneOptions`]: a drag handle class, post-drop sorting, proxy insertion,
//! caller attributes, and before/after drop hooks. Registering an id again
//! replaces the previous zone.
//!
//! ## Drop lifecycle
//!
//! On release over a drop zone other than the one owning the element, the
//! zone's before-drop hooks run in order; any [`HookResult::Cancel`] vetoes the
//! drop. Otherwise the element (or its proxy, with
//! [`ZoneOptions::drop_proxy`]) is appended to the zone, the zone becomes the
//! element's owner, children are sorted if [`ZoneOptions::sort`] is set, and
//! the after-drop hooks run. In every case the proxy leaves the body.
//!
//! ## Visual contract
//!
//! The proxy carries [`DRAGGING_CLASS`] for the whole drag and
//! [`OVER_DROP_ZONE_CLASS`] while it hovers an eligible drop zone. Both names
//! can be changed through [`CoordinatorConfig`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_drag_drop::memory::MemoryDocument;
//! use understory_drag_drop::{
//!     Coordinator, Document, DropOutcome, PointerEvent, ZoneOptions, Zones,
//! };
//!
//! let mut doc = MemoryDocument::new();
//! let body = doc.body();
//! let todo = doc.create_element("todo");
//! doc.set_element_id(todo, "todo");
//! let done = doc.create_element("done");
//! doc.set_element_id(done, "done");
//! doc.append_child(body, todo);
//! doc.append_child(body, done);
//! let task = doc.create_element("task");
//! doc.append_child(todo, task);
//!
//! let mut dd = Coordinator::new(doc);
//! dd.init_dd(Zones::Element(todo), ZoneOptions::new())?;
//! dd.drop_zone(Zones::Element(done), ZoneOptions::new())?;
//!
//! // Pick the task up, carry it over `done`, and let go.
//! dd.pointer_down(&PointerEvent::new(task, todo, Point::new(5.0, 5.0)));
//! dd.pointer_move(Point::new(120.0, 8.0));
//! dd.pointer_over(&PointerEvent::new(done, done, Point::new(120.0, 8.0)));
//! let outcome = dd.pointer_up(Point::new(120.0, 8.0));
//!
//! assert_eq!(outcome, DropOutcome::Dropped { zone: "done".into() });
//! assert_eq!(dd.document().parent(task), Some(done));
//! # Ok::<(), understory_drag_drop::RegisterError>(())
//! ```
//!
//! ## Features
//!
//! - `std` (default): build Kurbo with the standard library.
//! - `libm`: build Kurbo's float math on `libm` for `no_std` targets.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod coordinator;
mod document;
mod drag;
mod error;
mod hooks;
pub mod memory;
mod sort;
mod zone;

pub use coordinator::{
    Coordinator, CoordinatorConfig, DRAGGING_CLASS, DropOutcome, Event, EventResponse,
    OVER_DROP_ZONE_CLASS, OwnerMatch, PointerEvent, Registration,
};
pub use document::{Document, EventKind, ListenTarget, ListenerId, ProxyStyle};
pub use drag::{DragProxy, SourceElement};
pub use error::RegisterError;
pub use hooks::{AfterDropHook, BeforeDropHook, DropContext, DropEvent, HookResult, SubscriptionId};
pub use sort::sort_children;
pub use zone::{Zone, ZoneConfig, ZoneId, ZoneOptions, ZoneRegistry, ZoneRole, Zones};
