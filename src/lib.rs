//! # reqbind
//!
//! **reqbind** is a declarative request-to-handler argument binder. A handler
//! function's parameter list is inspected once at registration time and
//! compiled into a plan of per-field resolver closures; at request time the
//! plan executes against an inbound request context to assemble the exact
//! argument list the handler expects, reporting aggregated validation
//! failures as a structured 400 response instead of invoking the handler.
//!
//! ## Architecture
//!
//! The library is organized into a small set of modules, leaf-first:
//!
//! - **[`ctx`]** - The [`RequestContext`] boundary to the HTTP substrate and
//!   the shared [`Ctx`] handle
//! - **[`source`]** - Named context resolvers (`query`, `param`, `header`,
//!   `form`, `file`) and the ordered [`SourceChain`] with sensitive/required
//!   policy
//! - **[`binding`]** - Per-field [`BindingSpec`] metadata, the sealed
//!   coercion kinds, and the compiled [`StructPlan`] (field plan compiler +
//!   struct assembler)
//! - **[`handler`]** - Per-parameter plans ([`HandlerArg`]), the [`Json`]
//!   body-decode and [`Reply`] response markers, and the final resolver over
//!   the whole parameter tuple
//! - **[`router`]** - Route registration records and the dispatch adapter
//!   mapping handler errors to error handlers
//!
//! Everything expensive — attribute parsing, type dispatch, closure
//! construction — happens exactly once, at registration. Request-time work is
//! a pure pass over precompiled closures.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use http::Method;
//! use reqbind::{Binder, Bindable, Ctx};
//!
//! #[derive(Debug, Default, Bindable)]
//! struct Search {
//!     #[bind(from = "query", rename = "q", required)]
//!     query: String,
//!     count: i64,
//! }
//!
//! fn search(params: Search) -> anyhow::Result<()> {
//!     println!("searching {:?} (limit {})", params.query, params.count);
//!     Ok(())
//! }
//!
//! let mut binder = Binder::new();
//! binder.register(Method::GET, "/search", search);
//! // per request, once the substrate has matched the path:
//! // binder.dispatch(Method::GET, "/search", &ctx)?;
//! ```
//!
//! The HTTP substrate — server, TLS, path matching, query-string and
//! multipart parsing — is an external collaborator consumed through the
//! [`RequestContext`] trait. This crate only decides *what value goes into
//! which handler argument* and *whether that is even possible*.

pub mod binding;
pub mod ctx;
pub mod handler;
pub mod router;
pub mod source;

pub use binding::{
    Bind, BindingSpec, FieldBinding, FieldError, Resolved, StructPlan, ValidationFailure,
};
pub use ctx::{BodyReader, Ctx, RequestContext, UploadedFile};
pub use handler::{Handler, HandlerArg, Json, Reply};
pub use reqbind_macros::Bindable;
pub use router::{Binder, Dispatch, DispatchError};
pub use source::{Lookup, Resolution, Source, SourceChain};
