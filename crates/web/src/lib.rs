//! Naqlah web application library.
//!
//! Everything the `naqlah-web` binary serves lives here so the router can be
//! built and exercised in tests without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod error;
pub mod filters;
pub mod geo;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod pwa;
pub mod routes;
pub mod state;
