//! airjuke — a local-network music jukebox.
//!
//! Indexes a music library into an in-memory [`catalog`](crate::catalog)
//! and serves it over an embedded HTTP [`server`](crate::server): catalog
//! queries as JSON, track bytes with full HTTP range semantics, and a
//! bundled web player.

pub mod catalog;
pub mod config;
pub mod library;
pub mod net;
pub mod server;
pub mod streaming;
