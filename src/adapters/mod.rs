//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Token verification (JWT, mock)
//! - `http` - REST API (axum routers, middleware, DTOs)
//! - `memory` - In-memory port implementations for tests and local dev
//! - `postgres` - PostgreSQL-backed persistence

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
