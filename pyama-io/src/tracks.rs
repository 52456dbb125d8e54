//! Track file reading and enablement persistence.
//!
//! `tracks.csv` is written by the tracking stage, one row per particle
//! observation, keyed by the `particle` and `frame` columns. The viewer
//! builds per-particle series from it and seeds the disabled set from the
//! `enabled` column; toggling a particle writes the updated column back so
//! enablement survives across sessions.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::io::Write as _;
use std::path::Path;

use csv::{Reader, StringRecord, Writer};
use tempfile::NamedTempFile;

use pyama_core::{ParticleRegistry, ParticleTrack, TrackTable};

use crate::error::{Error, Result};

/// Parsed contents of one `tracks.csv`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackFile {
    /// Tracks in order of first appearance; index = particle index.
    pub table: TrackTable,
    /// Particle indices whose stored `enabled` flag is off.
    pub disabled: BTreeSet<usize>,
    /// Number of `brightness_<k>` columns (one per fluorescence channel).
    pub fluorescence_channels: usize,
}

struct Columns {
    particle: usize,
    frame: usize,
    x: Option<usize>,
    y: Option<usize>,
    area: Option<usize>,
    brightness: Option<usize>,
    enabled: Option<usize>,
    fluorescence_channels: usize,
}

impl Columns {
    fn locate(headers: &StringRecord, path: &Path) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let particle = find("particle")
            .ok_or_else(|| Error::malformed_tracks(path, "missing 'particle' column"))?;
        let frame =
            find("frame").ok_or_else(|| Error::malformed_tracks(path, "missing 'frame' column"))?;
        let fluorescence_channels = headers
            .iter()
            .filter(|h| {
                h.strip_prefix("brightness_")
                    .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            })
            .count();
        Ok(Self {
            particle,
            frame,
            x: find("x"),
            y: find("y"),
            area: find("area"),
            brightness: find("brightness_0"),
            enabled: find("enabled"),
            fluorescence_channels,
        })
    }
}

/// The tracking output stores flags inconsistently across tool versions
/// (`1`, `1.0`, `True`, `true`). Anything else counts as disabled.
fn is_enabled(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "1.0" | "true")
}

fn parse_index(value: &str, column: &str, path: &Path) -> Result<usize> {
    // Re-exported track files sometimes carry integer columns as floats.
    let v: f64 = value
        .trim()
        .parse()
        .map_err(|_| Error::malformed_tracks(path, format!("bad {column} value {value:?}")))?;
    if v < 0.0 || v.fract() != 0.0 {
        return Err(Error::malformed_tracks(
            path,
            format!("bad {column} value {value:?}"),
        ));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(v as usize)
}

fn field_f64(record: &StringRecord, index: Option<usize>) -> f64 {
    index
        .and_then(|i| record.get(i))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0)
}

/// Reads a track file into per-particle series.
///
/// Particle indices follow the order of first appearance in the file; the
/// disabled set is decided by each particle's first observation, matching
/// how the stored flag is interpreted by the rest of the pipeline.
pub fn read_tracks(path: &Path) -> Result<TrackFile> {
    let mut reader = Reader::from_path(path)?;
    let columns = Columns::locate(reader.headers()?, path)?;

    let mut tracks: Vec<ParticleTrack> = Vec::new();
    let mut index_of: HashMap<u64, usize> = HashMap::new();
    let mut disabled = BTreeSet::new();

    for record in reader.records() {
        let record = record?;
        let pid = parse_index(
            record.get(columns.particle).unwrap_or_default(),
            "particle",
            path,
        )? as u64;
        let frame = parse_index(record.get(columns.frame).unwrap_or_default(), "frame", path)?;

        let index = match index_of.get(&pid) {
            Some(&i) => i,
            None => {
                let i = tracks.len();
                tracks.push(ParticleTrack::new(pid));
                index_of.insert(pid, i);
                // First observation decides the stored enablement.
                let flag = columns
                    .enabled
                    .and_then(|c| record.get(c))
                    .is_none_or(is_enabled);
                if !flag {
                    disabled.insert(i);
                }
                i
            }
        };

        let track = &mut tracks[index];
        track.frames.push(frame);
        track.x.push(field_f64(&record, columns.x));
        track.y.push(field_f64(&record, columns.y));
        track.area.push(field_f64(&record, columns.area));
        track.brightness.push(field_f64(&record, columns.brightness));
    }

    Ok(TrackFile {
        table: TrackTable::from_tracks(tracks),
        disabled,
        fluorescence_channels: columns.fluorescence_channels,
    })
}

/// Writes the registry's enablement flags back into a track file.
///
/// Rewrites the file with the `enabled` column patched per row (appending
/// the column if the file predates it); all other columns pass through
/// untouched.
pub fn write_enabled(path: &Path, table: &TrackTable, registry: &ParticleRegistry) -> Result<()> {
    let mut reader = Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers, path)?;

    let index_of: HashMap<u64, usize> = table.iter().map(|(i, t)| (t.id, i)).collect();

    let mut out = Writer::from_writer(Vec::new());
    let enabled_col = match columns.enabled {
        Some(c) => {
            out.write_record(&headers)?;
            c
        }
        None => {
            let mut extended = headers.clone();
            extended.push_field("enabled");
            out.write_record(&extended)?;
            headers.len()
        }
    };

    for record in reader.records() {
        let record = record?;
        let pid = parse_index(
            record.get(columns.particle).unwrap_or_default(),
            "particle",
            path,
        )? as u64;
        let flag = index_of
            .get(&pid)
            .is_none_or(|&i| registry.is_enabled(i));
        let value = if flag { "1" } else { "0" };

        let mut row = StringRecord::new();
        for (i, field) in record.iter().enumerate() {
            if i == enabled_col {
                row.push_field(value);
            } else {
                row.push_field(field);
            }
        }
        if record.len() <= enabled_col {
            row.push_field(value);
        }
        out.write_record(&row)?;
    }

    let bytes = out
        .into_inner()
        .map_err(|e| Error::malformed_tracks(path, e.to_string()))?;

    // Replace atomically so a crash mid-write cannot corrupt the only copy
    // of the tracking output.
    let dir = path
        .parent()
        .ok_or_else(|| Error::invalid_path(path, "track file has no parent directory"))?;
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(&bytes)?;
    staged.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const SAMPLE: &str = "\
particle,frame,x,y,label,area,brightness_0,brightness_1,enabled
0,0,10.0,20.0,3,25.0,100.0,50.0,1
0,1,11.0,21.0,3,26.0,110.0,51.0,1
2,0,40.0,40.0,5,30.0,200.0,90.0,0.0
1,0,70.5,80.5,7,12.0,300.0,10.0,True
";

    fn write_sample(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("tracks.csv");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_read_builds_series_in_appearance_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_sample(tmp.path());

        let file = read_tracks(&path).unwrap();
        assert_eq!(file.table.len(), 3);
        assert_eq!(file.fluorescence_channels, 2);

        // Appearance order: particle ids 0, 2, 1 → indices 0, 1, 2.
        let ids: Vec<u64> = file.table.iter().map(|(_, t)| t.id).collect();
        assert_eq!(ids, vec![0, 2, 1]);

        let first = file.table.get(0).unwrap();
        assert_eq!(first.frames, vec![0, 1]);
        assert_eq!(first.brightness, vec![100.0, 110.0]);
        assert_eq!(first.point_at_frame(1), Some((11.0, 21.0)));
    }

    #[test]
    fn test_read_lenient_enabled_parsing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_sample(tmp.path());

        let file = read_tracks(&path).unwrap();
        // Particle id 2 (index 1) stored "0.0" → disabled; "True" → enabled.
        assert_eq!(file.disabled.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_read_missing_required_column() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tracks.csv");
        fs::write(&path, "frame,x\n0,1.0\n").unwrap();

        assert!(matches!(
            read_tracks(&path),
            Err(Error::MalformedTracks { .. })
        ));
    }

    #[test]
    fn test_write_enabled_persists_toggle() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_sample(tmp.path());

        let file = read_tracks(&path).unwrap();
        let mut registry =
            ParticleRegistry::with_disabled(file.table.len(), file.disabled.clone()).unwrap();
        // Disable particle index 0 (id 0), re-enable index 1 (id 2).
        registry.disable(0).unwrap();
        registry.enable(1).unwrap();

        write_enabled(&path, &file.table, &registry).unwrap();

        let reread = read_tracks(&path).unwrap();
        assert_eq!(reread.disabled.iter().copied().collect::<Vec<_>>(), vec![0]);
        // Other columns pass through untouched.
        assert_eq!(reread.table.get(2).unwrap().brightness, vec![300.0]);
    }

    #[test]
    fn test_write_enabled_replaces_file_without_leftovers() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_sample(tmp.path());

        let file = read_tracks(&path).unwrap();
        let registry = ParticleRegistry::with_disabled(file.table.len(), file.disabled).unwrap();
        write_enabled(&path, &file.table, &registry).unwrap();

        // The staging file used for the replacement must be gone.
        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["tracks.csv"]);
        assert!(read_tracks(&path).is_ok());
    }

    #[test]
    fn test_write_enabled_appends_missing_column() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tracks.csv");
        fs::write(&path, "particle,frame,x,y\n0,0,1.0,2.0\n0,1,1.5,2.5\n").unwrap();

        let file = read_tracks(&path).unwrap();
        let mut registry = ParticleRegistry::new(file.table.len());
        registry.disable(0).unwrap();

        write_enabled(&path, &file.table, &registry).unwrap();

        let reread = read_tracks(&path).unwrap();
        assert_eq!(reread.disabled.iter().copied().collect::<Vec<_>>(), vec![0]);
    }
}
