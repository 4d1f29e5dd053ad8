//! Library exports for tokensnap.
//!
//! Exposes the render tree, the export pipeline and the two exportable views
//! so that other front ends can drive exports the same way the binary does.

pub mod config;
pub mod draw;
pub mod export;
pub mod records;
pub mod scene;
pub mod views;

pub use config::Config;
