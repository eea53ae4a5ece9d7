//! The external operations activity executors depend on.
//!
//! Every operation answers with `Ok(Some(_))` (data), `Ok(None)` (the call
//! went through but produced nothing usable) or `Err(_)` (the call itself
//! failed). Executors decide what each outcome means for their verdict.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::BackendError;

pub mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use http::HttpBackend;

pub type BackendResult = Result<Option<Value>, BackendError>;

/// `fetch-source-by-id` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRequest {
    pub database: String,
    #[serde(rename = "databaseId")]
    pub database_id: i64,
    pub location: String,
}

/// `convert-file` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertRequest {
    pub id: i64,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub format: String,
    pub source: i64,
}

/// `copy-data` request. `bytes` have already passed payload validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyRequest {
    pub source: i64,
    pub filename: String,
    pub filetype: String,
    pub bytes: Vec<u8>,
    pub url: Option<String>,
}

/// `generic-http-dispatch` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchRequest {
    pub title: String,
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub data: BTreeMap<String, Value>,
}

/// A file to send as a multipart `file` part.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub filename: String,
    pub filetype: String,
    pub bytes: Vec<u8>,
}

/// `register-schedule` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRequest {
    pub source: i64,
    pub destination: i64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedular: Option<i64>,
}

/// The activity backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_source_by_id(&self, request: SourceRequest) -> BackendResult;

    async fn fetch_source_by_url(&self, url: String) -> BackendResult;

    async fn convert_file(&self, request: ConvertRequest) -> BackendResult;

    async fn copy_data(&self, request: CopyRequest) -> BackendResult;

    async fn dispatch(&self, request: DispatchRequest) -> BackendResult;

    async fn compile_notebook(&self, notebook: FileUpload) -> BackendResult;

    async fn upload_file(&self, destination: i64, file: FileUpload) -> BackendResult;

    async fn register_schedule(&self, request: ScheduleRequest) -> BackendResult;
}
