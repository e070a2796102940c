use std::path::{Component, Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use metalca_common::MetaLcaError;

/// Flat directory of uploaded dataset files.
///
/// Filenames are used as given, so a second upload with the same name
/// replaces the first. Names that would leave the directory are refused.
/// A file only appears under its name once it has been received in full.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create the upload root if it does not exist yet.
    pub async fn init(root: impl Into<PathBuf>) -> Result<Self, MetaLcaError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        info!(root = %root.display(), "Upload directory ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage path for `filename`, or `None` if the name is not acceptable.
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        accept_filename(filename).map(|name| self.root.join(name))
    }

    /// Start writing `filename` into a staging file next to its final path.
    pub async fn begin(&self, filename: &str) -> Result<PendingUpload, MetaLcaError> {
        let target = self
            .path_for(filename)
            .ok_or_else(|| MetaLcaError::Storage(format!("refusing filename {filename:?}")))?;
        let staging = self.root.join(format!(".{}.part", Uuid::new_v4()));
        let file = File::create(&staging).await?;
        Ok(PendingUpload {
            file,
            staging,
            target,
        })
    }
}

/// An upload being received. Nothing under the final name changes until
/// [`PendingUpload::commit`] succeeds.
pub struct PendingUpload {
    file: File,
    staging: PathBuf,
    target: PathBuf,
}

impl PendingUpload {
    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), MetaLcaError> {
        Ok(self.file.write_all(chunk).await?)
    }

    /// Move the staged bytes over the final path, replacing any earlier upload.
    pub async fn commit(mut self) -> Result<(), MetaLcaError> {
        let finished = async {
            self.file.flush().await?;
            self.file.sync_all().await?;
            tokio::fs::rename(&self.staging, &self.target).await
        }
        .await;
        if let Err(e) = finished {
            self.discard().await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Drop the staged bytes. The final path is left as it was.
    pub async fn discard(self) {
        let PendingUpload { file, staging, .. } = self;
        drop(file);
        if let Err(e) = tokio::fs::remove_file(&staging).await {
            warn!(path = %staging.display(), error = %e, "Could not remove staged upload");
        }
    }
}

/// A filename is accepted only when it is exactly one plain path component.
pub fn accept_filename(filename: &str) -> Option<&str> {
    if filename.is_empty() || filename.contains(['/', '\\', '\0']) {
        return None;
    }
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(filename),
        _ => None,
    }
}
