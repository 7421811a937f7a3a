use std::time::{Duration, Instant};

use futures_util::StreamExt;
use ocr_logging::{ocr_debug, ocr_info, ocr_warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::{
    ErrorPayload, FailureKind, HealthStatus, OcrResponse, ServiceError, SupportedLanguages,
    UploadRequest,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";
pub const BASE_URL_ENV: &str = "OCR_API_URL";

pub const EXTRACT_PATH: &str = "/api/v1/ocr/extract/";
pub const HEALTH_PATH: &str = "/api/v1/ocr/health/";
pub const LANGUAGES_PATH: &str = "/api/v1/ocr/languages/";

/// Multipart field carrying the document bytes.
pub const FILE_FIELD: &str = "file";
pub const LANGUAGE_FIELD: &str = "language";
pub const SAVE_TO_DB_FIELD: &str = "save_to_db";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Extra attempts for requests that failed before reaching the service.
    pub transient_retries: u32,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            transient_retries: 1,
            max_response_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ClientSettings {
    /// Defaults, with the base URL taken from `OCR_API_URL` when set.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
    }
}

#[async_trait::async_trait]
pub trait OcrService: Send + Sync {
    async fn extract(&self, upload: &UploadRequest) -> Result<OcrResponse, ServiceError>;

    async fn health_check(&self) -> Result<HealthStatus, ServiceError>;

    async fn supported_languages(&self) -> Result<SupportedLanguages, ServiceError>;
}

/// Text fields sent next to the file part, in order.
pub fn form_fields(upload: &UploadRequest) -> Vec<(&'static str, String)> {
    let mut fields = vec![(LANGUAGE_FIELD, upload.language.clone())];
    if let Some(save) = upload.save_to_db {
        fields.push((SAVE_TO_DB_FIELD, save.to_string()));
    }
    fields
}

fn build_form(upload: &UploadRequest) -> Result<Form, ServiceError> {
    let file = Part::stream_with_length(
        reqwest::Body::from(upload.content.clone()),
        upload.content.len() as u64,
    )
    .file_name(upload.file_name.clone())
    .mime_str(&upload.mime_type)
    .map_err(|err| ServiceError::new(FailureKind::InvalidRequest, err.to_string()))?;

    let form = form_fields(upload)
        .into_iter()
        .fold(Form::new().part(FILE_FIELD, file), |form, (name, value)| {
            form.text(name, value)
        });
    Ok(form)
}

/// HTTP client for the OCR service. Build once and share.
#[derive(Debug, Clone)]
pub struct ReqwestOcrClient {
    settings: ClientSettings,
    client: reqwest::Client,
    extract_url: reqwest::Url,
    health_url: reqwest::Url,
    languages_url: reqwest::Url,
}

impl ReqwestOcrClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            extract_url: endpoint(&settings.base_url, EXTRACT_PATH)?,
            health_url: endpoint(&settings.base_url, HEALTH_PATH)?,
            languages_url: endpoint(&settings.base_url, LANGUAGES_PATH)?,
            settings,
            client,
        })
    }

    /// Sends the request built by `build`, retrying transient failures.
    ///
    /// Connect failures never reached the service, so they are always retried.
    /// Timeouts are retried only when `retry_on_timeout` is set.
    async fn send_with_retry<F>(
        &self,
        build: F,
        retry_on_timeout: bool,
    ) -> Result<reqwest::Response, ServiceError>
    where
        F: Fn() -> Result<reqwest::RequestBuilder, ServiceError> + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            match build()?.send().await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    let transient = err.is_connect() || (retry_on_timeout && err.is_timeout());
                    if transient && attempt < self.settings.transient_retries {
                        attempt += 1;
                        ocr_warn!("Transient failure, retrying (attempt {}): {}", attempt, err);
                        continue;
                    }
                    return Err(map_reqwest_error(err));
                }
            }
        }
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ServiceError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ServiceError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ServiceError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        let body = self.read_body(response).await?;
        if !status.is_success() {
            let payload = ErrorPayload::parse(&body);
            ocr_warn!("OCR service answered {} ({:?})", status, payload);
            return Err(ServiceError::http_status(status, payload));
        }
        serde_json::from_slice(&body)
            .map_err(|err| ServiceError::new(FailureKind::InvalidResponse, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &reqwest::Url) -> Result<T, ServiceError> {
        ocr_debug!("GET {}", url);
        let response = self
            .send_with_retry(|| Ok(self.client.get(url.clone())), true)
            .await?;
        self.decode(response).await
    }
}

#[async_trait::async_trait]
impl OcrService for ReqwestOcrClient {
    async fn extract(&self, upload: &UploadRequest) -> Result<OcrResponse, ServiceError> {
        ocr_info!(
            "Sending OCR request filename={} type={} size={} language={} save_to_db={:?}",
            upload.file_name,
            upload.mime_type,
            upload.content.len(),
            upload.language,
            upload.save_to_db
        );
        let started = Instant::now();
        let response = self
            .send_with_retry(
                || Ok(self.client.post(self.extract_url.clone()).multipart(build_form(upload)?)),
                false,
            )
            .await?;
        let result: OcrResponse = self.decode(response).await?;
        ocr_info!(
            "OCR response received chars={} confidence={:?} elapsed_ms={}",
            result.text.chars().count(),
            result.confidence,
            started.elapsed().as_millis()
        );
        Ok(result)
    }

    async fn health_check(&self) -> Result<HealthStatus, ServiceError> {
        self.get_json(&self.health_url).await
    }

    async fn supported_languages(&self) -> Result<SupportedLanguages, ServiceError> {
        self.get_json(&self.languages_url).await
    }
}

fn endpoint(base_url: &str, path: &str) -> Result<reqwest::Url, ServiceError> {
    let joined = format!("{}{}", base_url.trim().trim_end_matches('/'), path);
    reqwest::Url::parse(&joined)
        .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, format!("{joined}: {err}")))
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
