//! Reusable test utilities: mock HTTP servers for the Caldera API and the
//! upstream controller.

// Allow unused code in test fixtures - they are utilities shared across
// test binaries that each use a subset
#![allow(dead_code)]

pub mod mock_caldera;
pub mod mock_controller;

pub use mock_caldera::MockCalderaServer;
pub use mock_controller::MockControllerServer;
