//! Pulse news reader
//!
//! Browses a paginated article API with category, source and text filters,
//! keeps bookmarks in a local store and pre-caches the app shell for
//! offline use.
//!
//! # Modules
//!
//! - [view]: the article list state machine, driven by [view::Command]s
//! - [store]: durable local storage (bookmarks, theme)
//! - [offline]: the versioned asset cache and its fetch policy

#![deny(missing_docs)]

pub mod config;
pub mod offline;
pub mod store;
pub mod trace;
pub mod view;
