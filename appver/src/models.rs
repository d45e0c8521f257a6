use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("could not read version history file '{path}'; {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse version history file '{path}'; {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A single historical deployment of an application.
///
/// Records are owned by whoever supplies them; nothing in this crate mutates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    /// Unique per app and monotonically increasing.
    pub version: u64,

    /// ISO-8601 time the version was deployed. Doubles as the row identity in tables.
    pub time_stamp: String,

    /// The image this version was built into. Missing when the deploy failed.
    #[serde(default)]
    pub deployed_image_name: Option<String>,

    /// The source commit the build came from.
    #[serde(default)]
    pub git_hash: Option<String>,
}

impl VersionRecord {
    /// Returns the deployed image name; an empty name counts as no image at all.
    pub fn image_name(&self) -> Option<&str> {
        self.deployed_image_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// The snapshot of an application's deployment history the console works from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersions {
    #[serde(default)]
    pub app_name: String,

    /// The version number currently live.
    pub deployed_version: u64,

    /// Oldest deployment first.
    #[serde(default)]
    pub versions: Vec<VersionRecord>,
}

impl AppVersions {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
