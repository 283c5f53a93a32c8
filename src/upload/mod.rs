use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::{create_dir_all, File};
use tokio::io::AsyncWriteExt;

use crate::error::Error;

pub mod endpoints;
pub use endpoints::*;

/// Stores uploaded files and hands back the URL they are served from.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn store(&self, filename: &str, content: &[u8]) -> Result<String, Error>;
}

/// Reduces a client supplied name to its last path component.
///
/// Both `/` and `\` count as separators. Names that would not refer to a
/// regular file inside the upload directory are rejected.
pub fn sanitize_filename(filename: &str) -> Result<&str, Error> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    match name {
        "" | "." | ".." => Err(Error::InvalidUploadFilename {
            filename: filename.to_string(),
        }),
        name => Ok(name),
    }
}

/// A filesystem backed store
///
/// Files are written to `<static_dir>/uploads/<filename>` and are expected to
/// be served under `<public_url>/static/uploads/`. An existing file with the
/// same name is replaced.
#[derive(Clone, Debug)]
pub struct FileSystemStore {
    uploads: PathBuf,
    public_url: String,
}

impl FileSystemStore {
    pub async fn new(
        static_dir: impl Into<PathBuf>,
        public_url: impl Into<String>,
    ) -> Result<FileSystemStore, Error> {
        let uploads = static_dir.into().join("uploads");
        create_dir_all(&uploads).await?;

        let public_url = public_url.into().trim_end_matches('/').to_string();

        Ok(FileSystemStore {
            uploads,
            public_url,
        })
    }
}

#[async_trait]
impl FileStore for FileSystemStore {
    #[tracing::instrument(skip(self, content), fields(size = content.len()))]
    async fn store(&self, filename: &str, content: &[u8]) -> Result<String, Error> {
        let path = self.uploads.join(filename);

        let mut file = File::create(&path).await.map_err(Error::FailedUpload)?;
        file.write_all(content).await.map_err(Error::FailedUpload)?;
        file.flush().await.map_err(Error::FailedUpload)?;

        Ok(format!("{}/static/uploads/{}", self.public_url, filename))
    }
}
