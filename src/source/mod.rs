//! # Source Module
//!
//! Context resolvers and the resolver chain.
//!
//! A [`Source`] is a named strategy for pulling one raw string value out of a
//! request context: `query`, `param` (path), `header`, `form`, or `file`. A
//! [`SourceChain`] is an ordered list of sources tried in declared order; the
//! first non-empty value wins. When a lookup is not marked sensitive, each
//! source is retried with the lowercased name before moving on.
//!
//! Resolution produces a tagged [`Resolution`] rather than a reserved string:
//! `Found` carries a value, `NotFound` moves to the next source, and
//! `Deferred` (the `file` source) means the value is produced by the file
//! coercion path instead of the chain.
//!
//! An optional field that resolves nowhere is not an error; a required one is
//! [`RequiredValueMissing`].

mod core;

pub use core::{Lookup, RequiredValueMissing, Resolution, Source, SourceChain};
