//! Scripted in-memory backend for executor tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    Backend, BackendResult, ConvertRequest, CopyRequest, DispatchRequest, FileUpload,
    ScheduleRequest, SourceRequest,
};
use crate::BackendError;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SourceById(SourceRequest),
    SourceByUrl(String),
    Convert(ConvertRequest),
    Copy(CopyRequest),
    Dispatch(DispatchRequest),
    Notebook(FileUpload),
    Upload(i64, FileUpload),
    Schedule(ScheduleRequest),
}

#[derive(Debug, Clone)]
enum Reply {
    Data(Value),
    Nothing,
    Fail(String),
}

/// Answers every operation with `Nothing` unless told otherwise.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    replies: HashMap<&'static str, Reply>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn replying(mut self, op: &'static str, value: Value) -> Self {
        self.replies.insert(op, Reply::Data(value));
        self
    }

    pub(crate) fn failing(mut self, op: &'static str, message: &str) -> Self {
        self.replies.insert(op, Reply::Fail(message.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, op: &'static str, call: Call) -> BackendResult {
        self.calls.lock().unwrap().push(call);
        match self.replies.get(op).cloned().unwrap_or(Reply::Nothing) {
            Reply::Data(v) => Ok(Some(v)),
            Reply::Nothing => Ok(None),
            Reply::Fail(msg) => Err(BackendError::Malformed(msg)),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_source_by_id(&self, request: SourceRequest) -> BackendResult {
        self.answer("source_by_id", Call::SourceById(request))
    }

    async fn fetch_source_by_url(&self, url: String) -> BackendResult {
        self.answer("source_by_url", Call::SourceByUrl(url))
    }

    async fn convert_file(&self, request: ConvertRequest) -> BackendResult {
        self.answer("convert", Call::Convert(request))
    }

    async fn copy_data(&self, request: CopyRequest) -> BackendResult {
        self.answer("copy", Call::Copy(request))
    }

    async fn dispatch(&self, request: DispatchRequest) -> BackendResult {
        self.answer("dispatch", Call::Dispatch(request))
    }

    async fn compile_notebook(&self, notebook: FileUpload) -> BackendResult {
        self.answer("notebook", Call::Notebook(notebook))
    }

    async fn upload_file(&self, destination: i64, file: FileUpload) -> BackendResult {
        self.answer("upload", Call::Upload(destination, file))
    }

    async fn register_schedule(&self, request: ScheduleRequest) -> BackendResult {
        self.answer("schedule", Call::Schedule(request))
    }
}
