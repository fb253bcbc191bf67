//! Pitchside: a small sports records web app.
//!
//! Server-rendered pages for:
//! - a player roster with create and seed endpoints
//! - match fixtures imported from CSV, with per-student result predictions
//! - student accounts (password or Google sign-in) and course enrollment

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod import;
pub mod routes;
pub mod services;
pub mod state;
pub mod views;
