//! Per-particle track series.
//!
//! A track table holds, for every tracked particle, its frame-indexed
//! measurement series (centroid position, area, brightness). Tables are
//! produced by the tracking stage and loaded from the per-position track
//! file; particle indices into the table are the identifiers used by the
//! registry and the viewer coordinate.

/// Measurement series of a single tracked particle.
///
/// All vectors are parallel and indexed by observation; `frames` is
/// ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleTrack {
    /// Raw particle identifier from the tracking output.
    pub id: u64,
    /// Frame index of each observation.
    pub frames: Vec<usize>,
    /// Centroid x coordinate per observation, in image pixels.
    pub x: Vec<f64>,
    /// Centroid y coordinate per observation, in image pixels.
    pub y: Vec<f64>,
    /// Segmented area per observation.
    pub area: Vec<f64>,
    /// Integrated brightness of the first fluorescence channel.
    pub brightness: Vec<f64>,
}

impl ParticleTrack {
    /// Creates an empty track for the given raw identifier.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the track has no observations.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Centroid of the particle at `frame`, if it was observed there.
    pub fn point_at_frame(&self, frame: usize) -> Option<(f64, f64)> {
        let i = self.frames.iter().position(|&f| f == frame)?;
        Some((self.x[i], self.y[i]))
    }

    /// Highest frame index with an observation.
    pub fn last_frame(&self) -> Option<usize> {
        self.frames.iter().copied().max()
    }
}

/// All particle tracks of the active dataset, indexed by particle index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTable {
    tracks: Vec<ParticleTrack>,
}

impl TrackTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from tracks in particle-index order.
    pub fn from_tracks(tracks: Vec<ParticleTrack>) -> Self {
        Self { tracks }
    }

    /// Number of tracked particles.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns true if no particles are tracked.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The track at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&ParticleTrack> {
        self.tracks.get(index)
    }

    /// Mutable access to the track at `index`, if present.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ParticleTrack> {
        self.tracks.get_mut(index)
    }

    /// Iterator over `(particle_index, track)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ParticleTrack)> {
        self.tracks.iter().enumerate()
    }

    /// Appends a track, returning its particle index.
    pub fn push(&mut self, track: ParticleTrack) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    /// Highest frame index observed across all tracks.
    pub fn max_frame(&self) -> usize {
        self.tracks
            .iter()
            .filter_map(ParticleTrack::last_frame)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: u64, frames: &[usize]) -> ParticleTrack {
        ParticleTrack {
            id,
            frames: frames.to_vec(),
            x: frames.iter().map(|&f| f as f64).collect(),
            y: frames.iter().map(|&f| f as f64 * 2.0).collect(),
            area: vec![1.0; frames.len()],
            brightness: vec![0.5; frames.len()],
        }
    }

    #[test]
    fn test_point_at_frame() {
        let t = track(7, &[0, 1, 3]);
        assert_eq!(t.point_at_frame(1), Some((1.0, 2.0)));
        assert_eq!(t.point_at_frame(2), None);
    }

    #[test]
    fn test_table_indexing_and_max_frame() {
        let mut table = TrackTable::new();
        let i0 = table.push(track(10, &[0, 1]));
        let i1 = table.push(track(42, &[2, 5]));

        assert_eq!((i0, i1), (0, 1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).map(|t| t.id), Some(42));
        assert_eq!(table.max_frame(), 5);
    }

    #[test]
    fn test_empty_table_max_frame_is_zero() {
        assert_eq!(TrackTable::new().max_frame(), 0);
    }
}
