//! # Context Module
//!
//! The boundary between the binder and the HTTP substrate.
//!
//! The binder never parses HTTP itself. Everything it needs from a request —
//! query/path/header/form lookup by name, multipart file retrieval, the raw
//! body stream, and a JSON response writer — is consumed through the
//! [`RequestContext`] trait. A server integration implements that trait once;
//! the binder works against [`Ctx`], a cheaply cloneable shared handle, so a
//! context can be injected into handler arguments and struct fields alike.
//!
//! ## Implementing a substrate
//!
//! ```rust,ignore
//! use reqbind::ctx::{RequestContext, UploadedFile};
//!
//! struct MyServerRequest { /* parsed request state */ }
//!
//! impl RequestContext for MyServerRequest {
//!     fn query_param(&self, name: &str) -> Option<String> { /* ... */ None }
//!     // ...
//! }
//! ```
//!
//! Ownership rules: the binder never closes or buffers a resource on the
//! caller's behalf. A [`BodyReader`] or [`UploadedFile`] handed to a handler
//! belongs to that handler.

mod core;

pub use core::{BodyReader, Ctx, RequestContext, UploadedFile};
