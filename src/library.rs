use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::TimerError;

/// Named sound files, indexed from the sounds directory listing.
///
/// The mapping is built once. `add` and `delete` only touch the directory,
/// so their effect shows up the next time a library is loaded.
#[derive(Debug)]
pub struct SoundLibrary {
    dir: PathBuf,
    sounds: HashMap<String, PathBuf>,
}

impl SoundLibrary {
    /// Scan `dir`, creating it first if it does not exist.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, TimerError> {
        let dir = dir.into();
        let dir_error = |source| TimerError::ConfigDirectory {
            path: dir.clone(),
            source,
        };

        if !dir.exists() {
            tracing::info!("Creating sounds directory {:?}", dir);
            std::fs::create_dir_all(&dir).map_err(dir_error)?;
        }

        let mut entries = std::fs::read_dir(&dir)
            .map_err(dir_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(dir_error)?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut sounds = HashMap::new();
        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                tracing::debug!("Skipping non-file entry {:?}", path);
                continue;
            }
            if let Some(name) = sound_name(&path) {
                sounds.insert(name, path);
            }
        }

        tracing::debug!("Loaded {} sounds from {:?}", sounds.len(), dir);
        Ok(Self { dir, sounds })
    }

    pub fn lookup(&self, name: &str) -> Option<&Path> {
        self.sounds.get(name).map(PathBuf::as_path)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self.sounds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.into_iter()
    }

    /// Copy `source` into the sounds directory under its own file name.
    pub async fn add(&self, source: &Path) -> Result<PathBuf, TimerError> {
        let file_name = source.file_name().ok_or_else(|| {
            TimerError::sound_file(
                source,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;

        let data = tokio::fs::read(source)
            .await
            .map_err(|e| TimerError::sound_file(source, e))?;

        let dest = self.dir.join(file_name);
        tokio::fs::write(&dest, data)
            .await
            .map_err(|e| TimerError::sound_file(&dest, e))?;

        tracing::info!("Added {:?} to sound library as {:?}", source, dest);
        Ok(dest)
    }

    /// Remove the file backing `name`.
    pub async fn delete(&self, name: &str) -> Result<(), TimerError> {
        let path = self
            .lookup(name)
            .ok_or_else(|| TimerError::SoundNotFound(name.to_string()))?;

        tokio::fs::remove_file(path)
            .await
            .map_err(|e| TimerError::sound_file(path, e))?;

        tracing::info!("Removed sound {} ({:?})", name, path);
        Ok(())
    }
}

/// File name with its last extension stripped.
fn sound_name(path: &Path) -> Option<String> {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}
