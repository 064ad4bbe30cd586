//! Google Drive API client for metadata queries and chunked media downloads.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_RANGE, RANGE};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::auth::{AccessToken, Authenticator};
use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, DownloadProgress, FileListResponse, FileMetadata, MediaChunk};
use crate::service::{ChunkSource, DriveApi};

/// Base URL for Google Drive API v3.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Default media chunk size (100 MB).
pub const DEFAULT_CHUNK_SIZE: u64 = 100 * 1024 * 1024;

const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, size)";

/// Authorized handle for the Google Drive API.
pub struct DriveClient<A = Authenticator> {
    auth: Arc<A>,
    http: Client,
    base_url: String,
    chunk_size: u64,
}

impl<A: AccessToken + 'static> DriveClient<A> {
    /// Create a new DriveClient.
    ///
    /// # Arguments
    /// * `auth` - Source of access tokens for every request
    pub fn new(auth: A) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("drive_csv/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            auth: Arc::new(auth),
            http,
            base_url: DRIVE_API_BASE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the number of bytes requested per media chunk.
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Query files using Google Drive query syntax, following every result page.
    pub async fn query_files(&self, query: &str) -> Result<Vec<FileMetadata>> {
        let token = self.auth.access_token().await?;
        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}/files", self.base_url))
                .bearer_auth(&token)
                .query(&[("q", query), ("spaces", "drive"), ("fields", LIST_FIELDS)]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(api_error(response).await);
            }

            let list_response: FileListResponse = response.json().await?;
            debug!(query, count = list_response.files.len(), "files.list page");
            all_files.extend(list_response.files);

            match list_response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_files)
    }
}

#[async_trait]
impl<A: AccessToken + 'static> DriveApi for DriveClient<A> {
    async fn list(&self, query: &str) -> Result<Vec<FileMetadata>> {
        self.query_files(query).await
    }

    async fn get_media(&self, file_id: &str) -> Result<Box<dyn ChunkSource>> {
        Ok(Box::new(HttpMediaDownload {
            auth: Arc::clone(&self.auth),
            http: self.http.clone(),
            url: format!("{}/files/{}", self.base_url, file_id),
            chunk_size: self.chunk_size,
            offset: 0,
            total_size: None,
        }))
    }
}

/// Ranged `alt=media` download, one HTTP request per chunk.
pub struct HttpMediaDownload<A> {
    auth: Arc<A>,
    http: Client,
    url: String,
    chunk_size: u64,
    offset: u64,
    total_size: Option<u64>,
}

#[async_trait]
impl<A: AccessToken + 'static> ChunkSource for HttpMediaDownload<A> {
    async fn next_chunk(&mut self) -> Result<MediaChunk> {
        let token = self.auth.access_token().await?;

        let response = self
            .http
            .get(&self.url)
            .bearer_auth(&token)
            .query(&[("alt", "media")])
            .header(RANGE, range_header(self.offset, self.chunk_size))
            .send()
            .await?;

        let status = response.status();
        let content_range = content_range_total(response.headers());

        if status == StatusCode::RANGE_NOT_SATISFIABLE && content_range == Some(Some(0)) {
            // Empty file: the service rejects any range over zero bytes.
            self.total_size = Some(0);
            return Ok(MediaChunk {
                data: Vec::new(),
                progress: self.progress(),
                done: true,
            });
        }

        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let data = response.bytes().await?.to_vec();
        self.offset += data.len() as u64;

        let done = match content_range {
            Some(Some(total)) => {
                self.total_size = Some(total);
                self.offset >= total
            }
            Some(None) => (data.len() as u64) < self.chunk_size,
            // No Content-Range: the body is the whole file.
            None => {
                self.total_size = Some(self.offset);
                true
            }
        };

        if data.is_empty() && !done {
            return Err(DriveError::InvalidResponse(format!(
                "empty chunk at offset {} of {}",
                self.offset, self.url
            )));
        }

        debug!(offset = self.offset, total = ?self.total_size, "media chunk received");

        Ok(MediaChunk {
            data,
            progress: self.progress(),
            done,
        })
    }
}

impl<A> HttpMediaDownload<A> {
    fn progress(&self) -> DownloadProgress {
        DownloadProgress {
            resumable_progress: self.offset,
            total_size: self.total_size,
        }
    }
}

/// `Range` value for the chunk starting at `offset`, clamped at `u64::MAX`.
fn range_header(offset: u64, chunk_size: u64) -> String {
    let range_end = offset.saturating_add(chunk_size.saturating_sub(1));
    format!("bytes={}-{}", offset, range_end)
}

/// Total length from a `Content-Range` header.
///
/// `None` when the header is absent, `Some(None)` when the total is `*`.
fn content_range_total(headers: &HeaderMap) -> Option<Option<u64>> {
    let value = headers.get(CONTENT_RANGE)?.to_str().ok()?;
    Some(parse_content_range_total(value))
}

fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse::<u64>().ok()
}

/// Convert a failed response into an [`DriveError::ApiError`].
async fn api_error(response: Response) -> DriveError {
    let status = response.status();
    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        };
    }
    DriveError::ApiError {
        status: status.as_u16(),
        message: error_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("bytes 0-3/8"), Some(8));
        assert_eq!(parse_content_range_total("bytes */0"), Some(0));
        assert_eq!(parse_content_range_total("bytes 0-3/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_range_header() {
        assert_eq!(range_header(0, 4), "bytes=0-3");
        assert_eq!(range_header(4, 4), "bytes=4-7");
    }

    #[test]
    fn test_range_header_huge_chunk_does_not_overflow() {
        assert_eq!(
            range_header(8, u64::MAX),
            format!("bytes=8-{}", u64::MAX)
        );
        assert_eq!(
            range_header(u64::MAX - 1, 16),
            format!("bytes={}-{}", u64::MAX - 1, u64::MAX)
        );
    }

    #[test]
    fn test_content_range_header_absent() {
        let headers = HeaderMap::new();
        assert_eq!(content_range_total(&headers), None);
    }

    #[test]
    fn test_content_range_header_present() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_RANGE, "bytes 4-7/8".parse().unwrap());
        assert_eq!(content_range_total(&headers), Some(Some(8)));
    }
}
