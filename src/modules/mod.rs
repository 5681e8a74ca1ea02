//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the image storage backends used by report uploads.

pub mod storage;
