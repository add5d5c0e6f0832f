//! # Binding Module
//!
//! Per-field binding metadata and the compiled field plan.
//!
//! A bindable struct describes each of its fields with a [`FieldBinding`]:
//! the declared field name, a [`BindingSpec`] (source chain, lookup-name
//! override, sensitive/required policy) and a sealed coercion kind with a
//! typed assignment closure. [`StructPlan::compile`] turns that description
//! into an ordered list of per-field resolver closures exactly once, at
//! registration; [`StructPlan::assemble`] executes them per request.
//!
//! The assembler never stops early: every field is attempted, failures are
//! collected as [`ValidationFailure`]s keyed by the declared field name, and
//! a non-empty failure list becomes a structured 400 response instead of a
//! populated struct.
//!
//! Most users never build a [`FieldBinding`] by hand — `#[derive(Bindable)]`
//! generates the [`Bind`] implementation from `#[bind(...)]` attributes.

mod core;
mod plan;

pub use core::{Bind, BindingSpec, FieldBinding, FieldError, Resolved, ValidationFailure};
pub use plan::{FieldResolver, StructPlan};
