//! Shared test substrate: an in-memory [`RequestContext`] implementation
//! that records every JSON response the binder writes.
#![allow(dead_code)]

use reqbind::ctx::{Ctx, RequestContext, UploadedFile};
use serde_json::Value;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

/// Initialize test tracing once per binary; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// In-memory request fixture.
#[derive(Default)]
pub struct MockRequest {
    pub query: HashMap<String, String>,
    pub params: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
    pub body: Vec<u8>,
    responses: Mutex<Vec<(u16, Value)>>,
}

impl MockRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (`q=hello+world&count=69`) into the fixture.
    pub fn with_query_string(mut self, raw: &str) -> Self {
        for (k, v) in url::form_urlencoded::parse(raw.as_bytes()) {
            self.query.insert(k.to_string(), v.to_string());
        }
        self
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_form(mut self, name: &str, value: &str) -> Self {
        self.form.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_file(mut self, name: &str, filename: &str, content: &[u8]) -> Self {
        self.files.insert(
            name.to_string(),
            UploadedFile {
                filename: filename.to_string(),
                content_type: Some("application/octet-stream".to_string()),
                content: content.to_vec(),
            },
        );
        self
    }

    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    /// Wrap the fixture in a [`Ctx`], keeping a handle for response assertions.
    pub fn build(self) -> (Ctx, Arc<MockRequest>) {
        let request = Arc::new(self);
        let ctx = Ctx::new(request.clone());
        (ctx, request)
    }

    /// All `(status, body)` pairs written through `write_json`.
    pub fn responses(&self) -> Vec<(u16, Value)> {
        self.responses.lock().expect("responses lock").clone()
    }

    /// The single response written, panicking unless exactly one exists.
    pub fn sole_response(&self) -> (u16, Value) {
        let responses = self.responses();
        assert_eq!(responses.len(), 1, "expected exactly one response");
        responses[0].clone()
    }
}

impl RequestContext for MockRequest {
    fn query_param(&self, name: &str) -> Option<String> {
        self.query.get(name).cloned()
    }

    fn path_param(&self, name: &str) -> Option<String> {
        self.params.get(name).cloned()
    }

    fn header_value(&self, name: &str) -> Option<String> {
        self.headers.get(name).cloned()
    }

    fn form_value(&self, name: &str) -> Option<String> {
        self.form.get(name).cloned()
    }

    fn form_file(&self, name: &str) -> anyhow::Result<UploadedFile> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such file"))
    }

    fn body_stream(&self) -> Box<dyn Read + Send> {
        Box::new(Cursor::new(self.body.clone()))
    }

    fn write_json(&self, status: u16, body: &Value) -> anyhow::Result<()> {
        self.responses
            .lock()
            .expect("responses lock")
            .push((status, body.clone()));
        Ok(())
    }
}
