#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! - `fixtures`: JSON builders for interface documents

pub mod fixtures;
