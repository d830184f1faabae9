//! Reading and writing of the frozen model artifacts.
//!
//! Models are plain serde documents. A `.bin` extension selects bincode,
//! anything else is treated as JSON. Every document carries a `format` tag
//! and a `version` so a loader can refuse files it does not understand.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{ArtifactError, ArtifactResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Bincode,
}

impl Encoding {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => Encoding::Bincode,
            _ => Encoding::Json,
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ArtifactError {
    ArtifactError::Io {
        path: path.display().to_string(),
        source,
    }
}

pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> ArtifactResult<T> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let reader = BufReader::new(file);
    let value = match Encoding::for_path(path) {
        Encoding::Json => serde_json::from_reader(reader)?,
        Encoding::Bincode => bincode::deserialize_from(reader)?,
    };
    Ok(value)
}

pub fn write_artifact<T: Serialize>(path: &Path, value: &T) -> ArtifactResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
        }
    }
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    match Encoding::for_path(path) {
        Encoding::Json => serde_json::to_writer_pretty(&mut writer, value)?,
        Encoding::Bincode => bincode::serialize_into(&mut writer, value)?,
    }
    writer.flush().map_err(|e| io_error(path, e))?;
    Ok(())
}

pub fn check_header(
    expected: &'static str,
    supported: u32,
    format: &str,
    version: u32,
) -> ArtifactResult<()> {
    if format != expected || version != supported {
        return Err(ArtifactError::UnsupportedFormat {
            expected,
            supported,
            found: format.to_string(),
            version,
        });
    }
    Ok(())
}
