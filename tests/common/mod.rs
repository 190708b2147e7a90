//! Shared helpers for sitepipe integration tests.
//!
//! - `fixtures`: a small site source tree on disk and a fake stylesheet compiler
//! - `env`: runs the `sitepipe` binary against a fixture
//! - `assertions`: snapshots of output trees and event polling

#![allow(dead_code)]

pub mod assertions;
pub mod env;

pub use assertions::*;
pub use env::*;
pub use fixtures::*;
