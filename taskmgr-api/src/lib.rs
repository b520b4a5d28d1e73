//! # taskmgr API Server Library
//!
//! HTTP surface for the task tracker: registration, login, per-user task
//! CRUD and admin user lookup.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
