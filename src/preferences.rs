use crate::models::SavedPreference;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a valid preference file: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Single-slot store of the pending notification.
///
/// The file existing means a notification is pending; each save replaces
/// the previous record.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Option<SavedPreference>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        let saved = serde_json::from_slice(&raw).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        debug!("Loaded saved preferences from {}", self.path.display());
        Ok(Some(saved))
    }

    pub async fn save(&self, preference: &SavedPreference) -> Result<(), StoreError> {
        let json = to_json(preference).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))?;

        info!("💾 Saved preferences to {}", self.path.display());
        Ok(())
    }

    /// Removes the pending record, returns whether there was one
    pub async fn clear(&self) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Removed {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Pretty JSON indented with four spaces
fn to_json(value: &impl Serialize) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(out)
}
