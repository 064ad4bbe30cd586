//! Capabilities the download flow needs from the remote storage service.
//!
//! [`crate::DriveClient`] implements these over HTTP; tests substitute fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FileMetadata, MediaChunk};

/// Metadata search and media access on a Drive-like service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Run a metadata query, returning entries in the service's order.
    async fn list(&self, query: &str) -> Result<Vec<FileMetadata>>;

    /// Start a chunked download of a file's content.
    async fn get_media(&self, file_id: &str) -> Result<Box<dyn ChunkSource>>;
}

/// Successive pieces of one media download.
#[async_trait]
pub trait ChunkSource: Send {
    /// Fetch the next chunk. The final chunk has `done` set.
    async fn next_chunk(&mut self) -> Result<MediaChunk>;
}
