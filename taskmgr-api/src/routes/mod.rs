/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `tasks`: Task CRUD for the calling user
/// - `users`: Admin user lookup

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
