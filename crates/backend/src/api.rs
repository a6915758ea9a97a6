use crate::error::{ApiError, ApiResult};
use crate::types::{AskRequest, AskResponse, ErrorBody, GraphsResponse, UploadFile, UploadResponse};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const FALLBACK_FILE_NAME: &str = "download";

/// The three request/response workflows the controllers drive.
#[async_trait]
pub trait AnalystBackend: Send + Sync {
    async fn upload(&self, file: UploadFile) -> ApiResult<UploadResponse>;
    async fn generate_graphs(&self) -> ApiResult<GraphsResponse>;
    async fn ask(&self, question: &str) -> ApiResult<AskResponse>;
}

#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub connect: Option<Duration>,
    /// `None` lets a request wait forever.
    pub request: Option<Duration>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Some(DEFAULT_CONNECT_TIMEOUT),
            request: None,
        }
    }
}

#[derive(Clone)]
pub struct AnalystApi {
    client: Client,
    base_url: String,
}

impl AnalystApi {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Self::with_timeouts(base_url, Timeouts::default())
    }

    pub fn with_timeouts(base_url: &str, timeouts: Timeouts) -> ApiResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let mut builder =
            Client::builder().user_agent(concat!("smart-analyst/", env!("CARGO_PKG_VERSION")));
        if let Some(connect) = timeouts.connect {
            builder = builder.connect_timeout(connect);
        }
        if let Some(request) = timeouts.request {
            builder = builder.timeout(request);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turns a server-relative path (`/download/x.xlsx`) into an absolute URL.
    /// Absolute http(s) URLs pass through unchanged.
    pub fn resolve(&self, path: &str) -> ApiResult<Url> {
        if let Ok(url) = Url::parse(path) {
            if matches!(url.scheme(), "http" | "https") {
                return Ok(url);
            }
        }
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Ok(Url::parse(&joined)?)
    }

    pub async fn fetch_bytes(&self, path: &str) -> ApiResult<Vec<u8>> {
        let url = self.resolve(path)?;
        let response = self.client.get(url).send().await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Local file name for `path`: its last URL segment, percent-decoded.
    /// Falls back to `download` when that segment is empty or not a plain name.
    pub fn file_name_for(&self, path: &str) -> String {
        self.resolve(path)
            .ok()
            .and_then(|url| decoded_file_name(&url))
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
    }

    /// Fetches `path` and writes it into `dest_dir`, named by [`Self::file_name_for`].
    pub async fn download_to(&self, path: &str, dest_dir: &Path) -> ApiResult<PathBuf> {
        let dest = dest_dir.join(self.file_name_for(path));
        self.download_as(path, &dest).await?;
        Ok(dest)
    }

    /// Fetches `path` and writes it to exactly `dest`, creating parent directories.
    pub async fn download_as(&self, path: &str, dest: &Path) -> ApiResult<()> {
        let url = self.resolve(path)?;
        let bytes = self.fetch_bytes(url.as_str()).await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, bytes).await?;

        tracing::info!(url = %url, dest = %dest.display(), "Downloaded artifact");
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AnalystBackend for AnalystApi {
    async fn upload(&self, file: UploadFile) -> ApiResult<UploadResponse> {
        let size = file.len();
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(file.content).file_name(file.file_name),
        );

        tracing::debug!(size, "POST /upload");
        let response = self
            .client
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await?;

        decode_json(response).await
    }

    async fn generate_graphs(&self) -> ApiResult<GraphsResponse> {
        tracing::debug!("GET /generate_graphs");
        let response = self
            .client
            .get(self.endpoint("/generate_graphs"))
            .send()
            .await?;

        decode_json(response).await
    }

    async fn ask(&self, question: &str) -> ApiResult<AskResponse> {
        tracing::debug!(len = question.len(), "POST /ask");
        let response = self
            .client
            .post(self.endpoint("/ask"))
            .json(&AskRequest { question })
            .send()
            .await?;

        decode_json(response).await
    }
}

async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error);
    tracing::warn!(status = status.as_u16(), ?message, "Backend returned an error");

    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let response = check_status(response).await?;
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decoded_file_name(url: &Url) -> Option<String> {
    let raw = url.path_segments()?.next_back()?;
    let name = urlencoding::decode(raw).ok()?;
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return None;
    }
    Some(name.into_owned())
}
