//! Page-builder engine: component catalog, instance tree, and drag-and-drop.
//!
//! This crate owns the full client-side lifecycle of the page builder:
//! translating gesture events into tree mutations, maintaining selection
//! state, merging catalog defaults with per-instance overrides, and rendering
//! the instance tree into an abstract UI-node tree. The host UI layer is
//! responsible only for wiring its gesture backend to the engine, drawing the
//! [`render::UiNode`] tree, and persisting the resulting [`engine::Action`]s
//! to the server.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level testable [`engine::EngineCore`] and its actions |
//! | [`catalog`] | Read-only component definition registry |
//! | [`doc`] | Flat instance store and derived tree views |
//! | [`props`] | Default/override merging and typed property access |
//! | [`render`] | Recursive render into an abstract UI-node tree |
//! | [`input`] | Drag payloads, drop targets, and the gesture state machine |
//! | [`sync`] | Optimistic-mutation ledger for server reconciliation |
//! | [`consts`] | Shared constants (drag threshold, placeholder image) |

pub mod catalog;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod input;
pub mod props;
pub mod render;
pub mod sync;
