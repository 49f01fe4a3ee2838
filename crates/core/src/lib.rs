//! Core business logic for Spendra.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, the approval workflow engine, and calculations live here.
//!
//! # Modules
//!
//! - `approval` - Approval workflow engine (rule matching, step planning, completion)
//! - `currency` - Currency conversion math
//! - `auth` - Password hashing

pub mod approval;
pub mod auth;
pub mod currency;
