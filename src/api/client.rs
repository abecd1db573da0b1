use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::state::data::{GroupedPhotos, PhotoRecord};

/// Fallback when `PHOTO_JOURNAL_URL` is not set
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never completed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with an error payload
    #[error("{0}")]
    Application(String),

    /// A staged file could not be read before upload
    #[error("could not read file: {0}")]
    File(#[from] std::io::Error),
}

/// Metadata accompanying each file of a single-upload run
#[derive(Debug, Clone)]
pub struct UploadFields {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
}

/// Body of `POST /api/update_metadata`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRequest {
    pub id: String,
    pub title: String,
    #[serde(rename = "photoDateTime")]
    pub photo_date_time: NaiveDateTime,
    pub location: String,
    pub description: String,
    /// Clockwise degrees the server should rotate the stored image by
    pub rotation: u32,
}

#[derive(Debug, Deserialize)]
struct PhotoListing {
    #[serde(default)]
    photos: GroupedPhotos,
}

#[derive(Debug, Deserialize)]
struct ServerMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    error: String,
}

/// Client for the photo server's HTTP API.
///
/// Cheap to clone; every async task that needs the server takes its own
/// copy. All read URLs carry a `_=<millis>` cache-buster because the same
/// logical resource can change without its identifier changing.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        let url = std::env::var("PHOTO_JOURNAL_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::new(url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }

    fn busted_api_url(&self, endpoint: &str) -> String {
        format!("{}?_={}", self.api_url(endpoint), cache_buster())
    }

    /// Cache-busted URL of a stored image
    pub fn photo_url(&self, file_name: &str) -> String {
        format!("{}/photos/{}?_={}", self.base_url, file_name, cache_buster())
    }

    /// Fetch the grouped photo listing.
    ///
    /// This is the one operation that never fails outward: on any error the
    /// application degrades to an empty journal instead of crashing, so a
    /// well-formed (possibly empty) index is always available to render.
    pub async fn list_photos(&self) -> GroupedPhotos {
        match self.try_list_photos().await {
            Ok(grouped) => grouped,
            Err(e) => {
                log::warn!("photo listing failed, rendering empty journal: {e}");
                GroupedPhotos::new()
            }
        }
    }

    async fn try_list_photos(&self) -> Result<GroupedPhotos, GatewayError> {
        let response = self.http.get(self.busted_api_url("photos")).send().await?;
        let response = Self::checked(response).await?;
        let listing: PhotoListing = response.json().await?;
        Ok(listing.photos)
    }

    /// Fetch the flat, ungrouped metadata keyed by photo id.
    ///
    /// Unlike `list_photos` this propagates failures; the JSON viewer and
    /// the export flow handle them explicitly.
    pub async fn raw_metadata(&self) -> Result<BTreeMap<String, PhotoRecord>, GatewayError> {
        let response = self.http.get(self.busted_api_url("metadata")).send().await?;
        let response = Self::checked(response).await?;
        Ok(response.json().await?)
    }

    /// Download the bytes of one stored image
    pub async fn fetch_image(&self, file_name: &str) -> Result<Vec<u8>, GatewayError> {
        let response = self.http.get(self.photo_url(file_name)).send().await?;
        let response = Self::checked(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Upload one file with its metadata
    pub async fn upload_single(
        &self,
        file: &Path,
        fields: &UploadFields,
    ) -> Result<(), GatewayError> {
        let form = reqwest::multipart::Form::new()
            .part("image", file_part(file).await?)
            .text("name", fields.title.clone())
            .text("date", fields.date.clone())
            .text("time", fields.time.clone())
            .text("location", fields.location.clone())
            .text("description", fields.description.clone());

        let response = self
            .http
            .post(self.api_url("upload_single"))
            .multipart(form)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// Upload many files in one aggregate request; returns the server's
    /// success message verbatim
    pub async fn bulk_upload(&self, files: &[PathBuf]) -> Result<String, GatewayError> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            form = form.part("images[]", file_part(file).await?);
        }

        let response = self
            .http
            .post(self.api_url("bulk_upload"))
            .multipart(form)
            .send()
            .await?;
        let response = Self::checked(response).await?;
        let body: ServerMessage = response.json().await?;
        Ok(body.message)
    }

    pub async fn update_metadata(&self, request: &UpdateRequest) -> Result<(), GatewayError> {
        let response = self
            .http
            .post(self.api_url("update_metadata"))
            .json(request)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    pub async fn delete_photo(&self, id: &str) -> Result<(), GatewayError> {
        let response = self
            .http
            .post(self.api_url("delete_photo"))
            .json(&serde_json::json!({ "id": id }))
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    pub async fn delete_all_photos(&self) -> Result<(), GatewayError> {
        let response = self
            .http
            .post(self.api_url("delete_all_photos"))
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    /// Pass successful responses through; turn everything else into an
    /// `Application` error carrying the server's `{error}` text when the
    /// body has one
    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ServerError>().await {
            Ok(body) => body.error,
            Err(_) => format!("server returned HTTP {status}"),
        };
        Err(GatewayError::Application(message))
    }
}

/// Read a staged file into a multipart part, sniffing its MIME type from
/// the extension
async fn file_part(path: &Path) -> Result<reqwest::multipart::Part, GatewayError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    let mime = image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");

    Ok(reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime)?)
}

fn cache_buster() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}
