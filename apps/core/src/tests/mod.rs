//! Test Module
//!
//! Test suite for the intentbot core.
//!
//! ## Test Categories
//! - `fixtures`: a tiny trained model, vocabulary, classes and corpus shared by all tests
//! - `brain_tests`: pipeline properties and dialogue scenarios
//! - `session_tests`: session actor ordering, history and timeouts
//! - `integration_tests`: artifacts on disk through preflight, loading and a full conversation

pub mod fixtures;
