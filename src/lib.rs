//! K360 Admin - administrative web console for the K360 cycle-tracking app
//!
//! This library provides the screens, backend client and helpers for the
//! K360 admin console. The console owns no data of its own; every screen is
//! a view over the remote K360 REST backend.

pub mod backend;
pub mod config;
pub mod models;
pub mod services;
pub mod session;
pub mod web;
