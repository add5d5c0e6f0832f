use crate::ctx::{BodyReader, Ctx, UploadedFile};
use crate::source::{Lookup, RequiredValueMissing, SourceChain};
use serde::Serialize;
use thiserror::Error;

/// Per-field failure collected during assembly.
///
/// Never raised individually: the assembler completes the full field pass and
/// reports all failures together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// Declared field name (not the lookup-name override).
    pub field: String,
    /// Human-readable failure description.
    pub error: String,
}

/// Error produced by one compiled field resolver.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Required field with no value anywhere in its source chain.
    #[error(transparent)]
    Required(#[from] RequiredValueMissing),
    /// Numeric field bound to a raw value that does not parse.
    #[error("not a number: {0}")]
    NotANumber(String),
    /// Substrate error retrieving a multipart file, passed through verbatim.
    #[error("{0}")]
    File(anyhow::Error),
}

/// Outcome of assembling one handler argument.
#[derive(Debug)]
pub enum Resolved<T> {
    /// The assembled value.
    Value(T),
    /// Validation already handled: a failure response has been written and
    /// the handler must not run.
    Rejected,
}

/// Compiled per-field lookup metadata.
///
/// Built once, through this builder or `#[derive(Bindable)]`, and immutable
/// once a plan has been compiled from it.
#[derive(Debug, Clone, Default)]
pub struct BindingSpec {
    pub(crate) sources: Option<SourceChain>,
    pub(crate) rename: Option<String>,
    pub(crate) sensitive: bool,
    pub(crate) required: bool,
}

impl BindingSpec {
    /// Spec with the default source chain (`param`, then `query`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an explicit source chain from a comma-separated list, e.g.
    /// `"query,header"`. Unknown names are dropped.
    #[must_use]
    pub fn sources(mut self, list: &str) -> Self {
        self.sources = Some(SourceChain::parse(list));
        self
    }

    /// Declare an explicit source chain programmatically.
    #[must_use]
    pub fn source_chain(mut self, chain: SourceChain) -> Self {
        self.sources = Some(chain);
        self
    }

    /// Override the lookup name. Validation failures still report the
    /// declared field name.
    #[must_use]
    pub fn rename(mut self, name: &str) -> Self {
        self.rename = Some(name.to_string());
        self
    }

    /// Disable the lowercase fallback lookup.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Make an absent value a validation failure.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub(crate) fn lookup(&self) -> Lookup {
        Lookup {
            sensitive: self.sensitive,
            required: self.required,
        }
    }

    /// Effective lookup name for a field declared as `declared`.
    pub(crate) fn lookup_name(&self, declared: &str) -> String {
        match &self.rename {
            Some(name) if !name.is_empty() => name.clone(),
            _ => declared.to_string(),
        }
    }

    pub(crate) fn chain(self) -> SourceChain {
        self.sources.unwrap_or_default()
    }
}

pub(crate) type Assign<T, V> = Box<dyn Fn(&mut T, V) + Send + Sync>;
pub(crate) type ParseAssign<T> = Box<dyn Fn(&mut T, &str) -> Result<(), FieldError> + Send + Sync>;

/// Sealed set of coercion kinds, decided once per field at plan compilation
/// and never re-inspected per request.
pub(crate) enum FieldKind<T> {
    Str(Assign<T, String>),
    /// Numeric coercion: parses the raw chain value into the declared field
    /// type, so out-of-range input fails instead of wrapping. The label
    /// (`int`, `uint`, `float`) survives for logs and the type map.
    Number(&'static str, ParseAssign<T>),
    Stream(Assign<T, BodyReader>),
    File(Assign<T, UploadedFile>),
    Context(Assign<T, Ctx>),
    Skip,
}

impl<T> FieldKind<T> {
    pub(crate) const fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Str(_) => "string",
            FieldKind::Number(label, _) => *label,
            FieldKind::Stream(_) => "stream",
            FieldKind::File(_) => "file",
            FieldKind::Context(_) => "context",
            FieldKind::Skip => "skip",
        }
    }
}

/// One field of a bindable struct: declared name, lookup spec, and the typed
/// coercion that writes the resolved value into the struct.
pub struct FieldBinding<T> {
    pub(crate) name: &'static str,
    pub(crate) spec: BindingSpec,
    pub(crate) kind: FieldKind<T>,
}

impl<T> FieldBinding<T> {
    /// Raw chain value assigned unchanged; an absent optional value leaves
    /// the field zeroed.
    pub fn string(
        name: &'static str,
        spec: BindingSpec,
        assign: impl Fn(&mut T, String) + Send + Sync + 'static,
    ) -> Self {
        FieldBinding {
            name,
            spec,
            kind: FieldKind::Str(Box::new(assign)),
        }
    }

    /// Chain value parsed as a base-10 signed integer of the declared type;
    /// out-of-range input is a parse failure, not a wrap.
    pub fn int<V>(
        name: &'static str,
        spec: BindingSpec,
        assign: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        V: std::str::FromStr + 'static,
        V::Err: std::fmt::Display,
    {
        Self::parsed("int", name, spec, assign)
    }

    /// Chain value parsed as a base-10 unsigned integer of the declared type.
    pub fn uint<V>(
        name: &'static str,
        spec: BindingSpec,
        assign: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        V: std::str::FromStr + 'static,
        V::Err: std::fmt::Display,
    {
        Self::parsed("uint", name, spec, assign)
    }

    /// Chain value parsed as a float of the declared type.
    pub fn float<V>(
        name: &'static str,
        spec: BindingSpec,
        assign: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        V: std::str::FromStr + 'static,
        V::Err: std::fmt::Display,
    {
        Self::parsed("float", name, spec, assign)
    }

    fn parsed<V>(
        label: &'static str,
        name: &'static str,
        spec: BindingSpec,
        assign: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        V: std::str::FromStr + 'static,
        V::Err: std::fmt::Display,
    {
        FieldBinding {
            name,
            spec,
            kind: FieldKind::Number(
                label,
                Box::new(move |target, raw| {
                    let value = raw
                        .parse::<V>()
                        .map_err(|e| FieldError::NotANumber(e.to_string()))?;
                    assign(target, value);
                    Ok(())
                }),
            ),
        }
    }

    /// Buffered request body stream; ignores the source chain.
    pub fn stream(
        name: &'static str,
        assign: impl Fn(&mut T, BodyReader) + Send + Sync + 'static,
    ) -> Self {
        FieldBinding {
            name,
            spec: BindingSpec::new(),
            kind: FieldKind::Stream(Box::new(assign)),
        }
    }

    /// Multipart file looked up by the field's lookup name; ignores the
    /// source chain.
    pub fn file(
        name: &'static str,
        spec: BindingSpec,
        assign: impl Fn(&mut T, UploadedFile) + Send + Sync + 'static,
    ) -> Self {
        FieldBinding {
            name,
            spec,
            kind: FieldKind::File(Box::new(assign)),
        }
    }

    /// The request context itself; ignores the source chain.
    pub fn context(
        name: &'static str,
        assign: impl Fn(&mut T, Ctx) + Send + Sync + 'static,
    ) -> Self {
        FieldBinding {
            name,
            spec: BindingSpec::new(),
            kind: FieldKind::Context(Box::new(assign)),
        }
    }

    /// Field never populated from the request (response-only or opted out).
    #[must_use]
    pub fn skip(name: &'static str) -> Self {
        FieldBinding {
            name,
            spec: BindingSpec::new(),
            kind: FieldKind::Skip,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A struct whose fields can be populated from a request.
///
/// Usually derived with `#[derive(Bindable)]`; implement by hand to declare
/// bindings through the [`FieldBinding`] constructors instead.
///
/// `'static` because compiled plans are stored in long-lived closures.
pub trait Bind: Default + Sized + 'static {
    /// Binding declarations, one per field, in declared order.
    fn bindings() -> Vec<FieldBinding<Self>>;
}
