//! Folder lookup and CSV download by name.
//!
//! When several entries share a name, the first one in the order the service
//! returned them is used. Drive does not guarantee that order, so name
//! collisions resolve nondeterministically.

use std::io::{Cursor, Seek, SeekFrom, Write};

use tracing::{error, info, warn};

use crate::error::{DriveError, Result};
use crate::query::{csv_file_query, folder_query};
use crate::service::DriveApi;

/// Find the ID of a folder by name.
pub async fn get_folder_id<A>(api: &A, folder_name: &str) -> Result<String>
where
    A: DriveApi + ?Sized,
{
    let items = api.list(&folder_query(folder_name)).await.map_err(|e| {
        error!("An error occurred finding the folder: {}", e);
        e
    })?;

    let Some(folder) = items.into_iter().next() else {
        warn!("Folder not found: {}", folder_name);
        return Err(DriveError::FolderNotFound(folder_name.to_string()));
    };

    info!("Found folder '{}' with ID: {}", folder_name, folder.id);
    Ok(folder.id)
}

/// Download a CSV file by name into memory, optionally scoped to a named folder.
///
/// The returned buffer is positioned at offset 0. An empty `folder_name` counts
/// as no folder. If a folder is given and cannot be resolved, no file query is made.
pub async fn download_csv<A>(
    api: &A,
    file_name: &str,
    folder_name: Option<&str>,
) -> Result<Cursor<Vec<u8>>>
where
    A: DriveApi + ?Sized,
{
    let folder_id = match folder_name.filter(|name| !name.is_empty()) {
        Some(folder_name) => Some(get_folder_id(api, folder_name).await?),
        None => None,
    };

    fetch_csv(api, file_name, folder_id.as_deref())
        .await
        .map_err(|e| {
            match &e {
                DriveError::FileNotFound(_) => {}
                DriveError::ApiError { .. } | DriveError::HttpError(_) => {
                    error!("An error occurred downloading the file: {}", e)
                }
                _ => error!("An unexpected error occurred: {}", e),
            }
            e
        })
}

async fn fetch_csv<A>(api: &A, file_name: &str, folder_id: Option<&str>) -> Result<Cursor<Vec<u8>>>
where
    A: DriveApi + ?Sized,
{
    let query = csv_file_query(file_name, folder_id);
    info!(folder_id = ?folder_id, %query, "searching for file");

    let items = api.list(&query).await?;
    let Some(file) = items.into_iter().next() else {
        warn!("File not found: {}", file_name);
        return Err(DriveError::FileNotFound(file_name.to_string()));
    };

    let mut source = api.get_media(&file.id).await?;
    let mut buffer = Cursor::new(Vec::new());

    info!("Downloading '{}'...", file_name);
    loop {
        let chunk = source.next_chunk().await?;
        buffer.write_all(&chunk.data)?;
        info!("Download {}%.", chunk.progress.percent());
        if chunk.done {
            break;
        }
    }

    buffer.seek(SeekFrom::Start(0))?;
    info!("Download complete.");
    Ok(buffer)
}
