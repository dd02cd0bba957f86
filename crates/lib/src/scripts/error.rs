//! Errors for descriptor loading, authoring, and index builds.

use std::path::PathBuf;

/// Why a descriptor file could not be turned into a record. Never escapes `load`;
/// it is logged and recorded as [`super::DescriptorStatus::Malformed`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("reading {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Failure while authoring a descriptor file.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("serializing descriptor for {}: {}", .path.display(), .source)]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("writing descriptor to {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Build-level diagnostic. The build still returns an (empty) index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("scripts root is not a valid directory: {}", .0.display())]
    InvalidRoot(PathBuf),
    #[error("listing scripts root {}: {}", .path.display(), .source)]
    ReadRoot {
        path: PathBuf,
        source: std::io::Error,
    },
}
