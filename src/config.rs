use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use crate::map::Position;

pub const IMAGE_PATH_KEY: &str = "image_path";
pub const X_KEY: &str = "x";
pub const Y_KEY: &str = "y";

/// Player setup read from a `key=value` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub image_path: PathBuf,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unable to open configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line} is missing the '=' separator")]
    MissingSeparator { line: usize },
    #[error("configuration is missing required key '{key}'")]
    MissingKey { key: &'static str },
    #[error("unable to parse integer for '{key}' from '{value}'")]
    InvalidInteger { key: &'static str, value: String },
}

impl Configuration {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Configuration = text.parse()?;
        info!(
            path = %path.display(),
            image = %config.image_path.display(),
            x = config.x,
            y = config.y,
            "loaded configuration"
        );
        Ok(config)
    }

    pub fn player(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl FromStr for Configuration {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let entries = parse_entries(text)?;

        let image_path = require(&entries, IMAGE_PATH_KEY)?;
        let x = require(&entries, X_KEY)?;
        let y = require(&entries, Y_KEY)?;

        Ok(Self {
            image_path: PathBuf::from(image_path),
            x: parse_i64(X_KEY, x)?,
            y: parse_i64(Y_KEY, y)?,
        })
    }
}

/// Collects `key=value` pairs; a repeated key keeps its last value.
fn parse_entries(text: &str) -> Result<HashMap<&str, &str>, ParseError> {
    let mut entries = HashMap::new();

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (key, value) = trimmed
            .split_once('=')
            .ok_or(ParseError::MissingSeparator { line: index + 1 })?;
        let (key, value) = (key.trim(), value.trim());
        if let Some(previous) = entries.insert(key, value) {
            debug!(key, previous, value, "configuration key overridden");
        }
    }

    Ok(entries)
}

fn require<'a>(
    entries: &HashMap<&str, &'a str>,
    key: &'static str,
) -> Result<&'a str, ParseError> {
    entries
        .get(key)
        .copied()
        .ok_or(ParseError::MissingKey { key })
}

fn parse_i64(key: &'static str, value: &str) -> Result<i64, ParseError> {
    value.parse::<i64>().map_err(|_| ParseError::InvalidInteger {
        key,
        value: value.to_string(),
    })
}
