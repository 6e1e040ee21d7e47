//! Floatchat - an embeddable demo chat widget.
//!
//! The crate is split into a headless core and an optional Dioxus UI:
//!
//! - [`types`] - the message model shared with the backend wire format
//! - [`store`] - the append-only message store with typing flag, persistence,
//!   and remote dispatch
//! - [`storage`] - best-effort durable history storage
//! - [`api`] - backend client, fetch-once configuration, reply sources
//! - [`widget`] - the self-healing launcher/frame injector and the loader
//!   script served to host pages
//! - [`theme`] - per-domain UI configuration rendered to CSS
//! - [`ui`] / [`views`] - the Dioxus chat surface (behind the `ui` feature)

pub mod api;
pub mod storage;
pub mod store;
pub mod theme;
pub mod types;
pub mod widget;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;
