//! Survey and voting service.
//!
//! Surveys own ordered options; options carry a vote counter that the public
//! vote endpoint increments atomically. Management routes are restricted to
//! admin bearer tokens.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod models;
pub mod observability;
pub mod routes;
pub mod store;
