use super::core::{Bind, FieldBinding, FieldError, FieldKind, Resolved, ValidationFailure};
use crate::ctx::Ctx;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Compiled closure that resolves one field into a struct under assembly.
pub type FieldResolver<T> = Box<dyn Fn(&mut T, &Ctx) -> Result<(), FieldError> + Send + Sync>;

/// The full ordered field plan for one bindable struct type.
///
/// Compiled once at registration; execution per request is a pure pass over
/// the precompiled resolvers with no type inspection or tag parsing left.
pub struct StructPlan<T> {
    fields: Vec<Option<FieldResolver<T>>>,
    names: Vec<&'static str>,
    layout: Vec<(String, &'static str)>,
}

impl<T: Bind> StructPlan<T> {
    /// Compile the plan from the type's binding declarations.
    #[must_use]
    pub fn of() -> Self {
        Self::compile(T::bindings())
    }
}

impl<T: 'static> StructPlan<T> {
    /// Compile one resolver per field binding, in declared order.
    ///
    /// Skipped fields keep their slot as `None` so failure reporting stays
    /// aligned with field order.
    #[must_use]
    pub fn compile(bindings: Vec<FieldBinding<T>>) -> Self {
        let mut fields = Vec::with_capacity(bindings.len());
        let mut names = Vec::with_capacity(bindings.len());
        let mut layout = Vec::with_capacity(bindings.len());
        for binding in bindings {
            debug!(
                target_type = std::any::type_name::<T>(),
                field = binding.name,
                kind = binding.kind.as_str(),
                "field resolver compiled"
            );
            names.push(binding.name);
            layout.push((
                binding.spec.lookup_name(binding.name),
                binding.kind.as_str(),
            ));
            fields.push(Self::compile_field(binding));
        }
        StructPlan {
            fields,
            names,
            layout,
        }
    }

    fn compile_field(binding: FieldBinding<T>) -> Option<FieldResolver<T>> {
        let FieldBinding { name, spec, kind } = binding;
        let lookup = spec.lookup();
        let lookup_name = spec.lookup_name(name);
        match kind {
            FieldKind::Skip => None,
            FieldKind::Str(assign) => {
                let chain = spec.chain();
                Some(Box::new(move |target, ctx| {
                    if let Some(value) = chain.get(&lookup_name, lookup, ctx)? {
                        assign(target, value);
                    }
                    Ok(())
                }))
            }
            FieldKind::Number(_, parse) => {
                let chain = spec.chain();
                Some(Box::new(move |target, ctx| {
                    // An absent optional value parses as the empty string.
                    let raw = chain.get(&lookup_name, lookup, ctx)?.unwrap_or_default();
                    parse(target, &raw)
                }))
            }
            FieldKind::Stream(assign) => Some(Box::new(move |target, ctx| {
                assign(target, ctx.body_reader());
                Ok(())
            })),
            FieldKind::File(assign) => Some(Box::new(move |target, ctx| {
                let file = ctx.form_file(&lookup_name).map_err(FieldError::File)?;
                assign(target, file);
                Ok(())
            })),
            FieldKind::Context(assign) => Some(Box::new(move |target, ctx| {
                assign(target, ctx.clone());
                Ok(())
            })),
        }
    }

    /// Declared field names, in plan order.
    #[must_use]
    pub fn field_names(&self) -> &[&'static str] {
        &self.names
    }

    /// Serializable layout of the plan: lookup name to coercion kind.
    ///
    /// Skipped fields are left out, the same way they are never populated
    /// from a request.
    #[must_use]
    pub fn type_map(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (resolver, (name, kind)) in self.fields.iter().zip(&self.layout) {
            if resolver.is_some() {
                map.insert(name.clone(), Value::String((*kind).to_string()));
            }
        }
        Value::Object(map)
    }
}

impl<T: Default> StructPlan<T> {
    /// Run the plan against a request.
    ///
    /// Always completes the full field pass so the caller sees every failing
    /// field, not just the first. Any failures are written as a structured
    /// 400 response and the handler must not run; only the response write
    /// itself can produce a hard error.
    pub fn assemble(&self, ctx: &Ctx) -> anyhow::Result<Resolved<T>> {
        let mut target = T::default();
        let mut failures: Vec<ValidationFailure> = Vec::new();
        for (index, resolver) in self.fields.iter().enumerate() {
            let Some(resolver) = resolver else { continue };
            if let Err(err) = resolver(&mut target, ctx) {
                failures.push(ValidationFailure {
                    field: self.names[index].to_string(),
                    error: err.to_string(),
                });
            }
        }

        if failures.is_empty() {
            return Ok(Resolved::Value(target));
        }

        warn!(
            target_type = std::any::type_name::<T>(),
            failed_fields = failures.len(),
            "validation failed"
        );
        ctx.write_json(
            400,
            &json!({
                "message": "validation failed",
                "fields": failures,
            }),
        )?;
        Ok(Resolved::Rejected)
    }
}
