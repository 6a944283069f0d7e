/// EstatePro - property booking service
///
/// Listing catalog, booking store with deterministic pricing, and an
/// account system with role-based access and login lockout, served over
/// HTTP.

pub mod account;
pub mod api;
pub mod auth;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod pricing;
pub mod server;
pub mod validation;
