//! Shared domain types for Karigar.
//!
//! This crate contains the core domain types used across the Karigar
//! marketplace: users, providers, bookings, messages, reviews, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod booking;
pub mod catalog;
pub mod config;
pub mod error;
pub mod message;
pub mod provider;
pub mod query;
pub mod review;
pub mod user;
