//! Avatar video studio backend
//!
//! Submits talking-avatar render requests to a remote video service, tracks
//! them to completion with a shared status poller, and exposes a small HTTP
//! API (generation, status, catalog listings, streaming tokens) to a browser
//! front end.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
