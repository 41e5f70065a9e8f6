//! Top-level run routine shared by the binary and the integration tests.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Configuration, ParseError};
use crate::map::{BoundsError, CoastlineMap, Position, Terrain, PLAYER_SYMBOL};
use crate::snapshot::{MapSnapshot, SnapshotError};

pub const MAP_WIDTH: u32 = 40;
pub const MAP_HEIGHT: u32 = 20;

/// Process exit status for every failed run.
pub const EXIT_FAILURE: u8 = 1;

const HEADER: &str = "==== Coastline Prototype ====";
const SEPARATOR: &str = "---------------------------------";

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub snapshot: Option<PathBuf>,
}

impl RunOptions {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            snapshot: None,
        }
    }

    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <config-file>\n\
         \n\
         Config file format (key=value pairs):\n  \
           image_path=/absolute/or/relative/path/to/shoreline.jpg\n  \
           x=player column on the map (0-based, 0..{max_x})\n  \
           y=player row on the map (0-based, 0..{max_y})\n\
         \n\
         Example:\n  \
           image_path=assets/shoreline_reference.jpg\n  \
           x=12\n  \
           y=6\n",
        max_x = MAP_WIDTH - 1,
        max_y = MAP_HEIGHT - 1,
    )
}

pub fn legend() -> String {
    format!(
        "{} = player, '{}' = land, '{}' = water, '{}' = landmark",
        PLAYER_SYMBOL,
        Terrain::Land.symbol(),
        Terrain::Water.symbol(),
        Terrain::Landmark.symbol(),
    )
}

/// Loads the configuration, renders the map to `out` and writes warnings to `err`.
///
/// Nothing is written to `out` unless every check passed.
pub fn run<W: Write, E: Write>(
    options: &RunOptions,
    out: &mut W,
    err: &mut E,
) -> Result<(), AppError> {
    let config = Configuration::load(&options.config_path)?;

    let image_path = resolve_path(&config.image_path)?;
    if !config.image_path.exists() {
        debug!(image = %image_path.display(), "map image not found");
        writeln!(
            err,
            "Warning: configured map image not found: {}",
            image_path.display()
        )?;
    }

    let map = CoastlineMap::new(MAP_WIDTH, MAP_HEIGHT);
    let player = config.player();
    map.validate_bounds(player)?;

    write_report(out, &map, &image_path, player)?;

    if let Some(path) = &options.snapshot {
        MapSnapshot::capture(&map, &image_path, player).write_to(path)?;
    }

    info!(%player, "rendered coastline map");
    Ok(())
}

pub fn write_report<W: Write>(
    out: &mut W,
    map: &CoastlineMap,
    image_path: &Path,
    player: Position,
) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    writeln!(out, "Map image: {}", image_path.display())?;
    writeln!(out, "Player position: {player}")?;
    writeln!(out, "{SEPARATOR}")?;
    out.write_all(map.render(player).as_bytes())?;
    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "{}", legend())?;
    out.flush()
}

fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_layout() {
        let map = CoastlineMap::new(MAP_WIDTH, MAP_HEIGHT);
        let mut out = Vec::new();
        write_report(
            &mut out,
            &map,
            Path::new("/maps/shore.jpg"),
            Position::new(12, 6),
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "Map image: /maps/shore.jpg");
        assert_eq!(lines[2], "Player position: (12, 6)");
        assert_eq!(lines[3], SEPARATOR);
        assert_eq!(lines.len(), 4 + MAP_HEIGHT as usize + 2);
        assert_eq!(lines[4 + 6].chars().nth(12), Some('P'));
        assert_eq!(lines[lines.len() - 1], legend());
    }

    #[test]
    fn test_legend_symbols() {
        assert_eq!(legend(), "P = player, '#' = land, '~' = water, '*' = landmark");
    }

    #[test]
    fn test_usage_mentions_keys() {
        let text = usage("coastline");
        assert!(text.starts_with("Usage: coastline <config-file>"));
        for key in ["image_path=", "x=", "y="] {
            assert!(text.contains(key));
        }
    }

    #[test]
    fn test_resolve_relative_path() {
        let resolved = resolve_path(Path::new("assets/shore.jpg")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("assets/shore.jpg"));
    }
}
