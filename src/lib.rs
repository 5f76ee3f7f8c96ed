//! Flowchart rendering for workflows extracted from documents.
//!
//! A [`Workflow`] is laid out on a fixed grid, its connections are routed as
//! straight or S-curved arrows, and the whole diagram is painted with cairo
//! onto a 2000×1200 raster that can be exported as PNG or JPEG.

#![forbid(unsafe_code)]

pub mod connector;
pub mod error;
pub mod export;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod render;
pub mod style;
pub mod text;

pub use error::{Error, Result};
pub use export::{download, export, file_name, Download, ImageFormat};
pub use model::{NodeKind, Workflow, WorkflowNode};
pub use render::{render, Raster, RenderOptions, RenderStats, RenderedDiagram, Scene};
