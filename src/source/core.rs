use crate::ctx::Ctx;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

/// Error for a required field that resolved to no value anywhere in its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no value found on required field")]
pub struct RequiredValueMissing;

/// A named strategy that pulls a single raw string value out of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Query string parameter.
    Query,
    /// Path parameter.
    Param,
    /// Header value.
    Header,
    /// Form field (urlencoded or multipart).
    Form,
    /// Multipart file. Never yields a string; resolution is deferred to the
    /// file coercion path, keyed on field type.
    File,
}

impl Source {
    /// Parse a source name as written in a chain declaration.
    #[must_use]
    pub fn parse(name: &str) -> Option<Source> {
        match name.trim() {
            "query" => Some(Source::Query),
            "param" => Some(Source::Param),
            "header" => Some(Source::Header),
            "form" => Some(Source::Form),
            "file" => Some(Source::File),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Source::Query => "query",
            Source::Param => "param",
            Source::Header => "header",
            Source::Form => "form",
            Source::File => "file",
        }
    }

    fn resolve(self, name: &str, ctx: &Ctx) -> Resolution {
        let value = match self {
            Source::Query => ctx.query_param(name),
            Source::Param => ctx.path_param(name),
            Source::Header => ctx.header_value(name),
            Source::Form => ctx.form_value(name),
            Source::File => return Resolution::Deferred,
        };
        match value {
            Some(v) if !v.is_empty() => Resolution::Found(v),
            _ => Resolution::NotFound,
        }
    }
}

/// Outcome of asking one source for one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A non-empty raw value.
    Found(String),
    /// Value is produced by a separate coercion path, not the chain.
    Deferred,
    /// Nothing under this name.
    NotFound,
}

/// Per-lookup policy, fixed at plan compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookup {
    /// Disables the lowercase fallback retry.
    pub sensitive: bool,
    /// An exhausted chain becomes an error instead of an absent value.
    pub required: bool,
}

/// Ordered list of sources tried for one field.
///
/// The default chain (two entries) fits inline; declared chains longer than
/// two spill to the heap.
#[derive(Debug, Clone)]
pub struct SourceChain(SmallVec<[Source; 2]>);

impl Default for SourceChain {
    /// Chain used when a field declares no explicit sources.
    fn default() -> Self {
        SourceChain(SmallVec::from_slice(&[Source::Param, Source::Query]))
    }
}

impl SourceChain {
    #[must_use]
    pub fn new(sources: impl IntoIterator<Item = Source>) -> Self {
        SourceChain(sources.into_iter().collect())
    }

    /// Parse a comma-separated chain declaration such as `"query,header"`.
    ///
    /// Unknown source names are dropped, not rejected.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        let mut sources = SmallVec::new();
        for name in list.split(',') {
            match Source::parse(name) {
                Some(source) => sources.push(source),
                None => debug!(source = name.trim(), "unknown source name dropped"),
            }
        }
        SourceChain(sources)
    }

    #[must_use]
    pub fn sources(&self) -> &[Source] {
        &self.0
    }

    /// Resolve `name` against the chain.
    ///
    /// Sources are tried in declared order, exact name first, lowercased name
    /// second unless the lookup is sensitive. The first non-empty value wins.
    /// `Ok(None)` means the value is absent (or deferred to the file path);
    /// only a required absent field is an error.
    pub fn get(
        &self,
        name: &str,
        lookup: Lookup,
        ctx: &Ctx,
    ) -> Result<Option<String>, RequiredValueMissing> {
        for source in &self.0 {
            let mut resolution = source.resolve(name, ctx);
            if resolution == Resolution::NotFound && !lookup.sensitive {
                resolution = source.resolve(&name.to_lowercase(), ctx);
            }
            match resolution {
                Resolution::Found(value) => {
                    debug!(name, source = source.as_str(), "value resolved");
                    return Ok(Some(value));
                }
                Resolution::Deferred => return Ok(None),
                Resolution::NotFound => {}
            }
        }
        if lookup.required {
            Err(RequiredValueMissing)
        } else {
            Ok(None)
        }
    }
}
