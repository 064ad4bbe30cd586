//! Data models for Google Drive API responses and media transfers.

use serde::{Deserialize, Serialize};

/// A file or folder entry returned by a metadata query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: Option<u64>,
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) => s.parse::<u64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl FileMetadata {
    /// Convenience constructor for an entry with only an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: None,
            size: None,
        }
    }
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Progress of a chunked media download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes received so far.
    pub resumable_progress: u64,
    /// Total size of the media, when the service reported it.
    pub total_size: Option<u64>,
}

impl DownloadProgress {
    /// Fraction of the media received, in `0.0..=1.0`.
    ///
    /// An unknown or zero total counts as complete.
    pub fn progress(&self) -> f64 {
        match self.total_size {
            Some(total) if total > 0 => {
                (self.resumable_progress as f64 / total as f64).min(1.0)
            }
            _ => 1.0,
        }
    }

    /// Whole percentage, truncated the way progress lines are printed.
    pub fn percent(&self) -> u32 {
        (self.progress() * 100.0) as u32
    }
}

/// One piece of a chunked media transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaChunk {
    pub data: Vec<u8>,
    pub progress: DownloadProgress,
    pub done: bool,
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileMetadata>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Service account credentials from JSON file.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

/// OAuth2 token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_progress_fraction() {
        let half = DownloadProgress {
            resumable_progress: 4,
            total_size: Some(8),
        };
        assert_eq!(half.progress(), 0.5);
        assert_eq!(half.percent(), 50);

        let third = DownloadProgress {
            resumable_progress: 1,
            total_size: Some(3),
        };
        assert_eq!(third.percent(), 33);
    }

    #[test]
    fn test_progress_unknown_total_is_complete() {
        let unknown = DownloadProgress {
            resumable_progress: 10,
            total_size: None,
        };
        assert_eq!(unknown.percent(), 100);

        let empty = DownloadProgress {
            resumable_progress: 0,
            total_size: Some(0),
        };
        assert_eq!(empty.progress(), 1.0);
    }

    #[test]
    fn test_file_metadata_deserialize() {
        let json = r#"{
            "id": "abc123",
            "name": "data.csv",
            "mimeType": "text/csv",
            "size": "1024"
        }"#;

        let metadata: FileMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.id, "abc123");
        assert_eq!(metadata.name, "data.csv");
        assert_eq!(metadata.mime_type, Some("text/csv".to_string()));
        assert_eq!(metadata.size, Some(1024));
    }
}
