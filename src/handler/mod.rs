//! # Handler Module
//!
//! Per-parameter plans and the compiled final resolver.
//!
//! A handler is any function of one to four parameters returning
//! `anyhow::Result<()>`. Each parameter type implements [`HandlerArg`], which
//! compiles a per-parameter resolver once at registration:
//!
//! - [`Json<T>`] — body-decode marker: the request body is decoded as JSON
//!   into `T`, decode errors propagate verbatim as hard errors
//! - [`Reply<T>`] — handler-controlled-response marker: a zero-valued `T`,
//!   never populated from the request
//! - any `#[derive(Bindable)]` struct — assembled through its compiled
//!   [`StructPlan`](crate::binding::StructPlan)
//! - [`Ctx`](crate::ctx::Ctx) — the request context, handed back unchanged
//!
//! [`Handler::compile_args`] combines the per-parameter resolvers into one
//! final resolver that runs them in declared order and fails fast on the
//! first rejection or hard error. Malformed handler shapes (zero parameters,
//! a non-error return) are unrepresentable: they fail at compile time rather
//! than at registration.

mod core;

pub use core::{bind_arg, ArgResolver, Handler, HandlerArg, Json, Reply};
