//! Reading & writing the JSON data files kept in the local data directory
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use thiserror::Error;

/// Read a JSON document from `path`.  If the file does not exist, the
/// default value of `T` is returned.
pub(crate) fn load_json<T: DeserializeOwned + Default>(
    path: &Path,
    what: &'static str,
) -> Result<T, LoadError> {
    let src = match fs_err::read(path) {
        Ok(src) => src,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(LoadError::read(what, e)),
    };
    serde_json::from_slice(&src).map_err(|e| LoadError::deserialize(what, e))
}

/// Write `value` to `path` as JSON, creating any missing parent directories
pub(crate) fn save_json<T: Serialize>(
    path: &Path,
    what: &'static str,
    value: &T,
) -> Result<(), SaveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).map_err(|e| SaveError::mkdir(what, e))?;
    }
    let mut src = serde_json::to_string_pretty(value).map_err(|e| SaveError::serialize(what, e))?;
    src.push('\n');
    fs_err::write(path, &src).map_err(|e| SaveError::write(what, e))?;
    Ok(())
}

#[derive(Debug, Error)]
#[error("failed to save {what} to disk")]
pub(crate) struct SaveError {
    what: &'static str,
    #[source]
    source: SaveErrorSource,
}

impl SaveError {
    pub(crate) fn no_path(what: &'static str) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::NoPath,
        }
    }

    fn mkdir(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Mkdir(e),
        }
    }

    fn serialize(what: &'static str, e: serde_json::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Serialize(e),
        }
    }

    fn write(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Write(e),
        }
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize data")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write file")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("failed to read {what} from disk")]
pub(crate) struct LoadError {
    what: &'static str,
    #[source]
    source: LoadErrorSource,
}

impl LoadError {
    pub(crate) fn no_path(what: &'static str) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::NoPath,
        }
    }

    fn read(what: &'static str, e: std::io::Error) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Read(e),
        }
    }

    fn deserialize(what: &'static str, e: serde_json::Error) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Deserialize(e),
        }
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to determine path to local data directory")]
    NoPath,
    #[error("failed to read file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize data")]
    Deserialize(#[source] serde_json::Error),
}
