//! Waypost - Onboarding Wizard Progression & Entitlement Service
//!
//! This crate implements the progression evaluator and plan-based quota
//! checker behind a multi-tenant community onboarding-wizard product.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
