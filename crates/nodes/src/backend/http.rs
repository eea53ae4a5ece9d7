//! `reqwest`-backed implementation of [`Backend`].

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{
    Backend, BackendResult, ConvertRequest, CopyRequest, DispatchRequest, FileUpload,
    ScheduleRequest, SourceRequest,
};
use crate::{BackendConfig, BackendError};

/// Longest error body kept in [`BackendError::Status`].
const BODY_PREVIEW: usize = 512;

/// HTTP client for the activity backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(name = "backend.fetch_source_by_id", skip(self))]
    async fn fetch_source_by_id(&self, request: SourceRequest) -> BackendResult {
        let url = self.endpoint(&format!("getfileSource1/{}", request.database_id));
        read_json(self.client.get(url).send().await?).await
    }

    #[instrument(name = "backend.fetch_source_by_url", skip(self))]
    async fn fetch_source_by_url(&self, url: String) -> BackendResult {
        let form = Form::new().text("s", url);
        let response = self
            .client
            .post(self.endpoint("fileSourceUrl/"))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(name = "backend.convert_file", skip(self))]
    async fn convert_file(&self, request: ConvertRequest) -> BackendResult {
        let response = self
            .client
            .post(self.endpoint("FileConvert/"))
            .json(&request)
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(name = "backend.copy_data", skip(self, request), fields(filename = %request.filename))]
    async fn copy_data(&self, request: CopyRequest) -> BackendResult {
        let part = file_part(request.bytes, &request.filename, &request.filetype)?;
        let form = Form::new()
            .text("source", request.source.to_string())
            .text("filename", request.filename)
            .text("filetype", request.filetype)
            .part("file", part)
            .text("url", request.url.unwrap_or_default());
        let response = self
            .client
            .post(self.endpoint("copy-data/"))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(name = "backend.dispatch", skip(self, request), fields(title = %request.title))]
    async fn dispatch(&self, request: DispatchRequest) -> BackendResult {
        let response = self
            .client
            .post(self.endpoint("executeApi/"))
            .json(&request)
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(name = "backend.compile_notebook", skip(self, notebook), fields(filename = %notebook.filename))]
    async fn compile_notebook(&self, notebook: FileUpload) -> BackendResult {
        let part = file_part(notebook.bytes, &notebook.filename, &notebook.filetype)?;
        let response = self
            .client
            .post(self.endpoint("compileNotebook/"))
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(name = "backend.upload_file", skip(self, file), fields(filename = %file.filename))]
    async fn upload_file(&self, destination: i64, file: FileUpload) -> BackendResult {
        let part = file_part(file.bytes, &file.filename, &file.filetype)?;
        let response = self
            .client
            .post(self.endpoint(&format!("upload-file/{destination}")))
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        read_json(response).await
    }

    #[instrument(name = "backend.register_schedule", skip(self))]
    async fn register_schedule(&self, request: ScheduleRequest) -> BackendResult {
        let response = self
            .client
            .post(self.endpoint("scheduling/"))
            .json(&request)
            .send()
            .await?;
        read_json(response).await
    }
}

fn file_part(bytes: Vec<u8>, filename: &str, filetype: &str) -> Result<Part, BackendError> {
    let part = Part::bytes(bytes).file_name(filename.to_string());
    // Short tags such as "txt" are not mime types; send those untyped.
    if filetype.contains('/') {
        Ok(part.mime_str(filetype)?)
    } else {
        Ok(part)
    }
}

/// Turn a response into "data", "no data" or an error.
async fn read_json(response: Response) -> BackendResult {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            body: body.chars().take(BODY_PREVIEW).collect(),
        });
    }
    if body.trim().is_empty() {
        debug!("backend returned an empty body");
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(&body).map_err(|e| BackendError::Malformed(e.to_string()))?;
    Ok((!value.is_null()).then_some(value))
}
