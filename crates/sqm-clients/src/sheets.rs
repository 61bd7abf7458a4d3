//! Google Sheets adapter.
//!
//! Authenticates with a service-account key using the OAuth 2.0 JWT-bearer
//! flow and reads a whole worksheet through `spreadsheets.values.get`. The
//! first row is the header; every later row is a record.

use crate::error::{status_error, ClientError};
use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqm_core::{BotError, CellValue, Dataset, TableSource};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: u64 = 3600;

/// The fields of a service-account key file this client uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        serde_json::from_str(json).map_err(|e| ClientError::Credentials(e.to_string()))
    }
}

/// A parsed credential: identity plus a ready-to-use signing key.
#[derive(Clone)]
struct ServiceAccount {
    client_email: String,
    token_uri: String,
    key: EncodingKey,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    exp: u64,
    iat: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Reads worksheets of one spreadsheet.
pub struct SheetsClient {
    http: reqwest::Client,
    api_base: reqwest::Url,
    spreadsheet_id: String,
    account: ServiceAccount,
}

impl SheetsClient {
    /// Parse the key file contents and build the client. Fails with
    /// [`ClientError::Credentials`] if the JSON or the private key is invalid.
    pub fn from_credentials_json(
        credentials_json: &str,
        spreadsheet_id: impl Into<String>,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let key = ServiceAccountKey::from_json(credentials_json)?;
        Self::new(key, spreadsheet_id, api_base, timeout)
    }

    pub fn new(
        key: ServiceAccountKey,
        spreadsheet_id: impl Into<String>,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| ClientError::Credentials(format!("failed to parse RSA private key: {e}")))?;
        let api_base = reqwest::Url::parse(api_base)
            .map_err(|e| ClientError::Credentials(format!("invalid Sheets API base {api_base:?}: {e}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_base,
            spreadsheet_id: spreadsheet_id.into(),
            account: ServiceAccount {
                client_email: key.client_email,
                token_uri: key.token_uri,
                key: encoding_key,
            },
        })
    }

    pub fn service_account_email(&self) -> &str {
        &self.account.client_email
    }

    /// Sign a JWT assertion and exchange it for an access token.
    async fn access_token(&self) -> Result<String, ClientError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ClientError::Credentials(e.to_string()))?
            .as_secs();
        let claims = Claims {
            iss: self.account.client_email.clone(),
            scope: READONLY_SCOPE.to_string(),
            aud: self.account.token_uri.clone(),
            exp: now + TOKEN_LIFETIME_SECS,
            iat: now,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.account.key)?;

        let response = self
            .http
            .post(&self.account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    fn values_url(&self, sheet: &str) -> Result<reqwest::Url, ClientError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Payload(format!("cannot-be-a-base URL: {}", self.api_base)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str(), "values", sheet]);
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");
        Ok(url)
    }

    /// Fetch a worksheet as raw header + records.
    pub async fn fetch_values(&self, sheet: &str) -> Result<Vec<Vec<serde_json::Value>>, ClientError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(self.values_url(sheet)?)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| ClientError::Payload(e.without_url().to_string()))?;
        Ok(range.values)
    }
}

/// Turn a `values` grid into a dataset. An empty grid is a blank dataset.
pub fn dataset_from_values(values: Vec<Vec<serde_json::Value>>) -> Dataset {
    let mut rows = values.into_iter();
    let Some(header) = rows.next() else {
        return Dataset::default();
    };
    let header: Vec<String> = header
        .iter()
        .map(|cell| match cell {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    let records = rows
        .map(|row| row.iter().map(CellValue::from_json).collect())
        .collect();
    Dataset::from_records(&header, records)
}

#[async_trait]
impl TableSource for SheetsClient {
    async fn fetch_table(&self, name: &str) -> Result<Dataset, BotError> {
        debug!(sheet = name, spreadsheet = %self.spreadsheet_id, "fetching worksheet");
        let values = self.fetch_values(name).await?;
        let dataset = dataset_from_values(values);
        info!(sheet = name, rows = dataset.len(), columns = dataset.columns().len(), "worksheet fetched");
        Ok(dataset)
    }
}
