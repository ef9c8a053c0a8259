//! ImageKit upload gateway

use async_trait::async_trait;
use bytes::Bytes;
use postfeed_core::ports::UploadGateway;
use postfeed_core::{PostError, Result, UploadedFile};
use reqwest::multipart::{Form, Part};
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;

pub struct ImageKitGateway {
    http: ReqwestClient,
    upload_url: String,
    private_key: Option<String>,
    folder: String,
    tags: Vec<String>,
    temp_dir: Option<PathBuf>,
}

/// Subset of the upload API response we rely on
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    name: String,
}

impl ImageKitGateway {
    pub fn new(upload_url: impl Into<String>, private_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(PostError::upload)?;

        Ok(Self {
            http,
            upload_url: upload_url.into(),
            private_key,
            folder: "/backend-uploads".to_string(),
            tags: vec!["backend-upload".to_string()],
            temp_dir: None,
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let mut gateway = Self::new(
            config.imagekit_upload_url.clone(),
            config.imagekit_private_key.clone(),
            config.upload_timeout(),
        )?
        .with_folder(config.upload_folder.clone())
        .with_tags(config.upload_tags());

        if let Some(dir) = &config.upload_temp_dir {
            gateway = gateway.with_temp_dir(dir.clone());
        }

        Ok(gateway)
    }

    pub fn with_folder(mut self, folder: String) -> Self {
        self.folder = folder;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = Some(dir);
        self
    }

    /// Write the received bytes to a temporary file that is removed on drop
    async fn stage(&self, data: Bytes, file_name: &str) -> Result<NamedTempFile> {
        let suffix = Path::new(file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let temp_dir = self.temp_dir.clone();

        tokio::task::spawn_blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix("upload-").suffix(&suffix);
            let mut file = match temp_dir {
                Some(dir) => builder.tempfile_in(dir),
                None => builder.tempfile(),
            }
            .map_err(PostError::upload)?;
            file.write_all(&data).map_err(PostError::upload)?;
            file.flush().map_err(PostError::upload)?;
            Ok::<_, PostError>(file)
        })
        .await
        .map_err(PostError::upload)?
    }

    async fn send(&self, staged: &Path, file_name: &str) -> Result<UploadedFile> {
        let private_key = self
            .private_key
            .as_deref()
            .ok_or_else(|| PostError::upload("IMAGEKIT_PRIVATE_KEY is not configured"))?;

        let contents = tokio::fs::read(staged).await.map_err(PostError::upload)?;
        let form = Form::new()
            .part("file", Part::bytes(contents).file_name(file_name.to_string()))
            .text("fileName", file_name.to_string())
            .text("folder", self.folder.clone())
            .text("tags", self.tags.join(","))
            .text("useUniqueFileName", "true");

        let response = self
            .http
            .post(&self.upload_url)
            .basic_auth(private_key, Some(""))
            .multipart(form)
            .send()
            .await
            .map_err(PostError::upload)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(PostError::upload(format!(
                "upload service returned {}: {}",
                status, message
            )));
        }

        let uploaded: UploadResponse = response.json().await.map_err(PostError::upload)?;
        Ok(UploadedFile {
            url: uploaded.url,
            name: uploaded.name,
        })
    }
}

#[async_trait]
impl UploadGateway for ImageKitGateway {
    async fn upload(&self, data: Bytes, file_name: &str) -> Result<UploadedFile> {
        debug!("Staging {} ({} bytes) for upload", file_name, data.len());
        let staged = self.stage(data, file_name).await?;

        let result = self.send(staged.path(), file_name).await;

        if let Err(e) = staged.close() {
            warn!("Failed to remove staged upload: {}", e);
        }

        match &result {
            Ok(uploaded) => info!("Uploaded {} as {}", file_name, uploaded.url),
            Err(e) => warn!("Upload of {} failed: {}", file_name, e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Multipart;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn dir_is_empty(dir: &TempDir) -> bool {
        std::fs::read_dir(dir.path()).unwrap().next().is_none()
    }

    /// Stand-in for the upload API that echoes what it received
    async fn fake_upload(
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> std::result::Result<Json<Value>, StatusCode> {
        if !headers.contains_key("authorization") {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let mut file_name = None;
        let mut folder = None;
        let mut file_len = 0;
        while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("fileName") => file_name = Some(field.text().await.unwrap()),
                Some("folder") => folder = Some(field.text().await.unwrap()),
                Some("file") => file_len = field.bytes().await.unwrap().len(),
                _ => {}
            }
        }

        let name = file_name.ok_or(StatusCode::BAD_REQUEST)?;
        let folder = folder.ok_or(StatusCode::BAD_REQUEST)?;
        Ok(Json(json!({
            "fileId": "abc123",
            "name": format!("stored_{}", name),
            "url": format!("https://ik.example{}/stored_{}", folder, name),
            "size": file_len,
        })))
    }

    async fn spawn_fake_service() -> String {
        let app = Router::new().route("/api/v1/files/upload", post(fake_upload));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/v1/files/upload", addr)
    }

    #[tokio::test]
    async fn test_upload_success_cleans_temp_file() {
        let url = spawn_fake_service().await;
        let temp = TempDir::new().unwrap();
        let gateway = ImageKitGateway::new(url, Some("private_test".to_string()), Duration::from_secs(5))
            .unwrap()
            .with_temp_dir(temp.path().to_path_buf());

        let uploaded = gateway
            .upload(Bytes::from_static(b"fake png bytes"), "photo.png")
            .await
            .unwrap();

        assert_eq!(uploaded.name, "stored_photo.png");
        assert_eq!(uploaded.url, "https://ik.example/backend-uploads/stored_photo.png");
        assert!(dir_is_empty(&temp));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_upload_failure() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let temp = TempDir::new().unwrap();
        let gateway = ImageKitGateway::new(
            format!("http://{}/api/v1/files/upload", addr),
            Some("private_test".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_temp_dir(temp.path().to_path_buf());

        let result = gateway.upload(Bytes::from_static(b"data"), "clip.mp4").await;

        assert!(matches!(result, Err(PostError::UploadFailed(_))));
        assert!(dir_is_empty(&temp));
    }

    #[tokio::test]
    async fn test_rejected_upload_reports_status() {
        let url = spawn_fake_service().await;
        let temp = TempDir::new().unwrap();
        // Wrong path on the fake service yields 404
        let gateway = ImageKitGateway::new(
            url.replace("/upload", "/missing"),
            Some("private_test".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_temp_dir(temp.path().to_path_buf());

        let err = gateway
            .upload(Bytes::from_static(b"data"), "photo.png")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
        assert!(dir_is_empty(&temp));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_leaking() {
        let temp = TempDir::new().unwrap();
        let gateway = ImageKitGateway::new("http://127.0.0.1:9/upload", None, Duration::from_secs(1))
            .unwrap()
            .with_temp_dir(temp.path().to_path_buf());

        let err = gateway
            .upload(Bytes::from_static(b"data"), "photo.png")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PostError::UploadFailed("IMAGEKIT_PRIVATE_KEY is not configured".to_string())
        );
        assert!(dir_is_empty(&temp));
    }
}
