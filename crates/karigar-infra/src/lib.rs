//! Infrastructure implementations for Karigar.
//!
//! Adapters for the ports defined in `karigar-core`: SQLite repositories,
//! the file-backed session cache, the keyword query interpreter, plus
//! configuration loading and directory seeding.

pub mod config;
pub mod interpreter;
pub mod seed;
pub mod session;
pub mod sqlite;
