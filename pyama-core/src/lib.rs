//! pyama-core: Core types for the PyAMA viewer session and dataset model.
//!
//! This crate provides the dataset descriptor, particle registry, viewer
//! coordinate, and session state machine that keep an interactive view of a
//! multi-dimensional microscopy dataset (positions × channels × frames ×
//! particles) consistent across navigation and particle toggling.
//!

pub mod coordinate;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod track;

pub use coordinate::{Axis, ViewerCoordinate};
pub use descriptor::DatasetDescriptor;
pub use error::{Error, Result};
pub use registry::ParticleRegistry;
pub use render::{Artifact, ArtifactRenderer, RenderScene};
pub use session::{ViewState, ViewerSession};
pub use snapshot::DatasetSnapshot;
pub use track::{ParticleTrack, TrackTable};
