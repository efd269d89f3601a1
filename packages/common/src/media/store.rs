use std::path::PathBuf;

use rand::Rng;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::error::MediaError;
use super::filename::{sanitize_filename, split_extension};
use super::kind::MediaKind;

/// How many stored-name candidates `commit` tries before giving up.
const NAME_ATTEMPTS: u32 = 8;

/// Flat on-disk store for uploaded media files.
///
/// Files land directly under `root` with a generated name
/// `"{8 hex chars}_{sanitized original name}"`. Writes go through a uniquely
/// named temp file under `{root}/.tmp` and are renamed into place on commit,
/// so a stored name never refers to a partially written file.
pub struct MediaStore {
    root: PathBuf,
    max_bytes: u64,
}

impl MediaStore {
    /// Create a media store rooted at `root`, creating the directory layout
    /// if it does not exist yet.
    pub async fn new(root: impl Into<PathBuf>, max_bytes: u64) -> Result<Self, MediaError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self { root, max_bytes })
    }

    /// Maximum accepted upload size in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Begin accepting an upload.
    ///
    /// Sanitizes and classifies the filename first, so unsupported types are
    /// rejected before a single byte is read. On success the caller feeds the
    /// body through [`StagedUpload::write_chunk`] and seals it with
    /// [`StagedUpload::finish`].
    pub async fn stage(&self, raw_filename: &str) -> Result<StagedUpload, MediaError> {
        let base_name = sanitize_filename(raw_filename)?;
        let ext = split_extension(&base_name)
            .map(|(_, ext)| ext)
            .ok_or_else(|| MediaError::UnsupportedType(base_name.clone()))?;
        let kind = MediaKind::from_extension(ext)
            .ok_or_else(|| MediaError::UnsupportedType(ext.to_string()))?;

        let temp_path = self
            .root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string());
        let file = fs::File::create(&temp_path).await?;

        Ok(StagedUpload {
            kind,
            base_name,
            temp_path,
            file: Some(file),
            written: 0,
            max_bytes: self.max_bytes,
        })
    }

    /// Promote a staged upload into the store under a fresh unique name.
    ///
    /// The name is the sanitized base prefixed with a random hex token. The
    /// scheme is best-effort: candidates that already exist on disk are
    /// skipped and a new token is drawn, but there is no cross-process lock.
    pub async fn commit(&self, staged: StagedMedia) -> Result<StoredMedia, MediaError> {
        for _ in 0..NAME_ATTEMPTS {
            let token: u32 = rand::rng().random();
            let stored_name = format!("{token:08x}_{}", staged.base_name);
            let target = self.root.join(&stored_name);

            match fs::try_exists(&target).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => {
                    let _ = fs::remove_file(&staged.temp_path).await;
                    return Err(e.into());
                }
            }

            if let Err(e) = fs::rename(&staged.temp_path, &target).await {
                let _ = fs::remove_file(&staged.temp_path).await;
                return Err(e.into());
            }

            tracing::debug!(filename = %stored_name, kind = %staged.kind, "media file stored");
            return Ok(StoredMedia {
                kind: staged.kind,
                filename: stored_name,
            });
        }

        let _ = fs::remove_file(&staged.temp_path).await;
        Err(MediaError::Io(std::io::Error::other(
            "could not allocate a unique media filename",
        )))
    }

    /// Drop a staged upload without storing it (best effort).
    pub async fn discard(&self, staged: StagedMedia) {
        let _ = fs::remove_file(&staged.temp_path).await;
    }

    /// Remove a committed file (best effort). Used to back out of a create
    /// operation whose database insert failed after the file was stored.
    pub async fn remove(&self, filename: &str) {
        if Self::is_safe_name(filename) {
            let _ = fs::remove_file(self.root.join(filename)).await;
        }
    }

    /// Open a stored file for streaming, returning the handle and its size.
    pub async fn open(&self, filename: &str) -> Result<(fs::File, u64), MediaError> {
        if !Self::is_safe_name(filename) {
            return Err(MediaError::InvalidFilename);
        }

        match fs::File::open(self.root.join(filename)).await {
            Ok(file) => {
                let len = file.metadata().await?.len();
                Ok((file, len))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Stored names are flat and sanitized; anything else never resolves.
    fn is_safe_name(filename: &str) -> bool {
        !filename.is_empty()
            && !filename.contains(['/', '\\'])
            && !filename.starts_with('.')
            && !filename.contains('\0')
    }

    #[cfg(test)]
    fn root(&self) -> &std::path::Path {
        &self.root
    }
}

/// An upload being streamed into the store's temp area.
pub struct StagedUpload {
    kind: MediaKind,
    base_name: String,
    temp_path: PathBuf,
    file: Option<fs::File>,
    written: u64,
    max_bytes: u64,
}

impl StagedUpload {
    /// Append a chunk of the upload body, enforcing the size cap.
    ///
    /// On failure the temp file is removed and the upload cannot be resumed.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), MediaError> {
        self.written += chunk.len() as u64;
        if self.written > self.max_bytes {
            let actual = self.written;
            self.abort().await;
            return Err(MediaError::SizeExceeded {
                actual,
                limit: self.max_bytes,
            });
        }

        let Some(file) = self.file.as_mut() else {
            return Err(MediaError::Io(std::io::Error::other(
                "staged upload already aborted",
            )));
        };

        if let Err(e) = file.write_all(chunk).await {
            self.abort().await;
            return Err(e.into());
        }

        Ok(())
    }

    /// Flush and close the temp file, yielding a handle for `commit`.
    pub async fn finish(mut self) -> Result<StagedMedia, MediaError> {
        let Some(mut file) = self.file.take() else {
            return Err(MediaError::Io(std::io::Error::other(
                "staged upload already aborted",
            )));
        };

        if let Err(e) = file.flush().await {
            drop(file);
            let _ = fs::remove_file(&self.temp_path).await;
            return Err(e.into());
        }
        drop(file);

        Ok(StagedMedia {
            kind: self.kind,
            base_name: self.base_name,
            temp_path: self.temp_path,
        })
    }

    /// Classification of the upload, known before any byte is written.
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Abandon the upload and remove the temp file (best effort).
    pub async fn cancel(mut self) {
        self.abort().await;
    }

    async fn abort(&mut self) {
        if let Some(file) = self.file.take() {
            drop(file);
        }
        let _ = fs::remove_file(&self.temp_path).await;
    }
}

/// A fully written temp file awaiting `commit` or `discard`.
pub struct StagedMedia {
    kind: MediaKind,
    base_name: String,
    temp_path: PathBuf,
}

impl StagedMedia {
    pub fn kind(&self) -> MediaKind {
        self.kind
    }
}

/// A committed media file.
#[derive(Debug, Clone)]
pub struct StoredMedia {
    pub kind: MediaKind,
    pub filename: String,
}
