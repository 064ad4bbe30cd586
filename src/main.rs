//! drive_csv CLI - Fetch a CSV file from Google Drive.

use std::io::Cursor;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use drive_csv::client::DEFAULT_CHUNK_SIZE;
use drive_csv::models::format_size;
use drive_csv::{authenticate, download_csv};

/// Default service account key location.
const SERVICE_ACCOUNT_FILE: &str = "service-account.json";

/// File fetched when no name is given.
const DEFAULT_FILE_NAME: &str = "Cdata_w_gaps_and_wind.csv";

/// Download a CSV file from Google Drive into memory.
#[derive(Parser, Debug)]
#[command(name = "drive_csv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to service account JSON credentials file.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS", default_value = SERVICE_ACCOUNT_FILE)]
    credentials: PathBuf,

    /// Name of the CSV file to download.
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    file: String,

    /// Only look for the file inside the folder with this name.
    #[arg(long)]
    folder: Option<String>,

    /// Bytes requested per download chunk.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u64,

    /// Also write the downloaded bytes to this path.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let drive = match authenticate(&cli.credentials) {
        Ok(drive) => Some(drive.with_chunk_size(cli.chunk_size)),
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(_) => None,
    };

    let buffer = match drive {
        Some(drive) => download_csv(&drive, &cli.file, cli.folder.as_deref()).await.ok(),
        None => None,
    };

    if let (Some(buffer), Some(output)) = (&buffer, &cli.output) {
        std::fs::write(output, buffer.get_ref())
            .with_context(|| format!("Failed to write {:?}", output))?;
        tracing::info!("Saved to: {:?}", output);
    }

    println!("{}", describe(buffer.as_ref()));

    Ok(())
}

/// One-line summary of the download result for stdout.
fn describe(buffer: Option<&Cursor<Vec<u8>>>) -> String {
    match buffer {
        Some(buffer) => format!(
            "Buffer({}, position {})",
            format_size(buffer.get_ref().len() as u64),
            buffer.position()
        ),
        None => "None".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let cli = Cli::try_parse_from(["drive_csv"]).unwrap();
        assert_eq!(cli.file, DEFAULT_FILE_NAME);
        assert_eq!(cli.folder, None);
        assert_eq!(cli.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_folder_and_file_flags() {
        let cli = Cli::try_parse_from([
            "drive_csv",
            "--file",
            "wind.csv",
            "--folder",
            "Data",
            "--chunk-size",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.file, "wind.csv");
        assert_eq!(cli.folder.as_deref(), Some("Data"));
        assert_eq!(cli.chunk_size, 4);
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(None), "None");
        let buffer = Cursor::new(b"a,b\n1,2\n".to_vec());
        assert_eq!(describe(Some(&buffer)), "Buffer(8 B, position 0)");
    }
}
