use serde_json::Value;
use std::fmt;
use std::io::{BufReader, Read};
use std::sync::Arc;

/// Buffered view of the request body stream, bound into stream fields.
pub type BodyReader = BufReader<Box<dyn Read + Send>>;

/// Abstraction over the HTTP substrate consumed by the binder.
///
/// Each lookup returns the raw string value for a name, or `None` when the
/// substrate has no value under that name. Decoding (URL decoding, multipart
/// parsing) is the substrate's job; the binder only decides which value goes
/// into which handler argument.
pub trait RequestContext: Send + Sync {
    /// Query string parameter by name.
    fn query_param(&self, name: &str) -> Option<String>;
    /// Path parameter by name, as matched by the substrate's router.
    fn path_param(&self, name: &str) -> Option<String>;
    /// Header value by name. Case handling is the substrate's concern; the
    /// binder only adds its own lowercase retry for non-sensitive lookups.
    fn header_value(&self, name: &str) -> Option<String>;
    /// Form field value by name (urlencoded or multipart).
    fn form_value(&self, name: &str) -> Option<String>;
    /// Multipart file by field name. Errors surface verbatim as validation
    /// failures for the bound field.
    fn form_file(&self, name: &str) -> anyhow::Result<UploadedFile>;
    /// The raw request body as a byte stream. Single-shot; the binder reads
    /// it at most once per request.
    fn body_stream(&self) -> Box<dyn Read + Send>;
    /// Write a JSON response with the given status code.
    fn write_json(&self, status: u16, body: &Value) -> anyhow::Result<()>;
}

/// Shared handle to the per-request context.
///
/// Cloning is an `Arc` bump, so the same context can be bound into several
/// handler arguments and struct fields without copying request state.
#[derive(Clone)]
pub struct Ctx(Arc<dyn RequestContext>);

impl Ctx {
    pub fn new(inner: Arc<dyn RequestContext>) -> Self {
        Ctx(inner)
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        self.0.query_param(name)
    }

    pub fn path_param(&self, name: &str) -> Option<String> {
        self.0.path_param(name)
    }

    pub fn header_value(&self, name: &str) -> Option<String> {
        self.0.header_value(name)
    }

    pub fn form_value(&self, name: &str) -> Option<String> {
        self.0.form_value(name)
    }

    pub fn form_file(&self, name: &str) -> anyhow::Result<UploadedFile> {
        self.0.form_file(name)
    }

    /// Buffered reader over the request body stream.
    pub fn body_reader(&self) -> BodyReader {
        BufReader::new(self.0.body_stream())
    }

    pub fn write_json(&self, status: u16, body: &Value) -> anyhow::Result<()> {
        self.0.write_json(status, body)
    }
}

impl fmt::Debug for Ctx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ctx")
    }
}

/// A multipart file retrieved from the substrate.
///
/// Owned by whoever the binder hands it to; the binder itself never retains
/// or closes it.
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    /// Client-supplied file name.
    pub filename: String,
    /// Content type as reported in the part headers, if any.
    pub content_type: Option<String>,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
