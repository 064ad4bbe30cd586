//! drive_csv - Download a CSV file from Google Drive by name.
//!
//! This library provides functionality to:
//! - Authenticate with a service account key (read-only Drive scope)
//! - Resolve a folder ID from its name
//! - Download a CSV file, optionally scoped to a folder, into memory
//!
//! # Example
//!
//! ```no_run
//! use std::io::Read;
//!
//! use drive_csv::{authenticate, download_csv};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let drive = authenticate("service-account.json")?;
//!     let mut buffer = download_csv(&drive, "Cdata_w_gaps_and_wind.csv", Some("Data")).await?;
//!
//!     let mut csv = String::new();
//!     buffer.read_to_string(&mut csv)?;
//!     println!("{}", csv);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod download;
pub mod error;
pub mod models;
pub mod query;
pub mod service;

// Re-exports for convenience
pub use auth::{authenticate, AccessToken, Authenticator};
pub use client::DriveClient;
pub use download::{download_csv, get_folder_id};
pub use error::{DriveError, Result};
pub use models::{DownloadProgress, FileMetadata, MediaChunk};
pub use service::{ChunkSource, DriveApi};
