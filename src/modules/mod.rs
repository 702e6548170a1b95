//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the photo store and the flood classification model client.

pub mod classifier;
pub mod storage;
