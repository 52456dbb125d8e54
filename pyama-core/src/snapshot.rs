//! Whole-dataset snapshot produced by the bootstrap layer.

use std::collections::BTreeSet;

use crate::descriptor::DatasetDescriptor;
use crate::track::TrackTable;

/// Everything a viewer session needs about an opened dataset.
///
/// Produced by the bootstrap layer when a (dataset file, output directory)
/// pair is selected, and again whenever a completed pipeline stage changes
/// the descriptor or track count. Sessions consume snapshots as a whole;
/// there is no partial refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSnapshot {
    /// Axis extents of the dataset.
    pub descriptor: DatasetDescriptor,
    /// Per-particle measurement series.
    pub tracks: TrackTable,
    /// Particle indices flagged as disabled in the stored track data.
    pub disabled: BTreeSet<usize>,
}
