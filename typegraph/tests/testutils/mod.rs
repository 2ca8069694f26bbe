//! Test utilities for TypeGraph integration tests
//!
//! - GraphFixture: a transit schema plus helpers that build common graphs
//! - EventRecorder: listener that records structural events in order

#![allow(dead_code)]

pub mod event_recorder;
pub mod graph_fixture;
