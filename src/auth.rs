//! Service account authentication for the Google Drive API.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::client::DriveClient;
use crate::error::{DriveError, Result};
use crate::models::{ServiceAccountCredentials, TokenResponse};

/// Google OAuth2 token endpoint.
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Read-only Google Drive scope.
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // OAuth scope
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

/// Source of bearer tokens for Drive API requests.
#[async_trait]
pub trait AccessToken: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Authenticator for Google APIs using service account credentials.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<ServiceAccountCredentials>,
    key: EncodingKey,
    scopes: Vec<String>,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    /// Create a new authenticator from a service account JSON file.
    ///
    /// A missing file yields [`DriveError::CredentialsNotFound`]; any other
    /// read or parse failure yields the matching credential error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DriveError::CredentialsNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(DriveError::CredentialsFileError)?;
        let credentials: ServiceAccountCredentials = serde_json::from_str(&content)?;
        Self::new(credentials)
    }

    /// Create a new authenticator from credentials, scoped to read-only Drive access.
    pub fn new(credentials: ServiceAccountCredentials) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?;
        Ok(Self {
            credentials: Arc::new(credentials),
            key,
            scopes: vec![DRIVE_READONLY_SCOPE.to_string()],
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Service account email the tokens are issued for.
    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    /// Scopes requested when exchanging the JWT assertion.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    fn token_uri(&self) -> &str {
        self.credentials.token_uri.as_deref().unwrap_or(TOKEN_URI)
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                // Add 60 second buffer before expiration
                let buffer = Duration::from_secs(60);
                if token.expires_at > SystemTime::now() + buffer {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let new_token = self.refresh_token().await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    /// Refresh the access token using JWT assertion.
    async fn refresh_token(&self) -> Result<CachedToken> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| DriveError::AuthenticationError(e.to_string()))?
            .as_secs();

        let claims = Claims {
            iss: self.credentials.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.token_uri().to_string(),
            iat: now,
            exp: now + 3600, // 1 hour
        };

        let jwt = encode(&Header::new(Algorithm::RS256), &claims, &self.key)?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ];

        debug!(email = %self.credentials.client_email, "requesting access token");

        let response = self
            .client
            .post(self.token_uri())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        let expires_at = SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl AccessToken for Authenticator {
    async fn access_token(&self) -> Result<String> {
        self.get_access_token().await
    }
}

/// Load the service account key at `path` and build an authorized Drive client.
///
/// A missing key file is returned as [`DriveError::CredentialsNotFound`] and
/// should abort the run. Every other failure is logged here before it is returned.
pub fn authenticate<P: AsRef<Path>>(path: P) -> Result<DriveClient> {
    let auth = match Authenticator::from_file(path) {
        Ok(auth) => auth,
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
            error!("Error loading credentials from service account file: {}", e);
            return Err(e);
        }
    };

    match DriveClient::new(auth) {
        Ok(client) => {
            info!("Google Drive API service created successfully.");
            Ok(client)
        }
        Err(e) => {
            error!("Error creating Google Drive service: {}", e);
            Err(e)
        }
    }
}
