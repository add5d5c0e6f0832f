//! # Router Module
//!
//! Route registration records and the dispatch adapter.
//!
//! [`Binder`] owns one record per registered route: method, path, the
//! compiled final resolver, the handler, and an optional per-route error
//! handler override. Registration happens once at startup; records are
//! immutable afterwards and safe for unsynchronized concurrent reads.
//!
//! Path matching is not this crate's job — the substrate routes the request
//! and [`Binder::dispatch`] looks records up by exact method + path key. The
//! adapter then runs the final resolver and maps the handler's single error
//! return: `Ok` is a silent success, an error with a registered error handler
//! is handed to it and treated as handled, and an unhandled error propagates
//! as the request's terminal failure.

mod core;

pub use core::{Binder, Dispatch, DispatchError, ErrorHandlerFn};
