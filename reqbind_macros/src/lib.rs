use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Result as SynResult, Type};

/// Per-field binding options collected from `#[bind(...)]` attributes.
#[derive(Default)]
struct BindOpts {
    skip: bool,
    sources: Option<String>,
    rename: Option<String>,
    sensitive: bool,
    required: bool,
}

fn parse_bind_opts(field: &syn::Field) -> SynResult<BindOpts> {
    let mut opts = BindOpts::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("bind") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                opts.skip = true;
                Ok(())
            } else if meta.path.is_ident("response") {
                // Response-only field: never populated from the request. An
                // optional status code argument is accepted but reserved.
                opts.skip = true;
                if meta.input.peek(syn::Token![=]) {
                    let _status: syn::LitInt = meta.value()?.parse()?;
                }
                Ok(())
            } else if meta.path.is_ident("from") {
                let lit: LitStr = meta.value()?.parse()?;
                opts.sources = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                opts.rename = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("sensitive") {
                opts.sensitive = true;
                Ok(())
            } else if meta.path.is_ident("required") {
                opts.required = true;
                Ok(())
            } else {
                Err(meta.error("unknown bind option"))
            }
        })?;
    }
    Ok(opts)
}

/// Coercion kind a field type maps to. Decided here, at derive time, so the
/// runtime plan never inspects types again.
enum FieldKind {
    Str,
    Int,
    Uint,
    Float,
    Stream { optional: bool },
    File { optional: bool },
    Context { optional: bool },
}

fn last_ident(ty: &Type) -> Option<&syn::Ident> {
    match ty {
        Type::Path(p) => p.path.segments.last().map(|s| &s.ident),
        _ => None,
    }
}

/// Unwrap one level of `Option<T>`, returning the inner type.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(p) = ty else { return None };
    let seg = p.path.segments.last()?;
    if seg.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn classify(ty: &Type) -> Option<FieldKind> {
    if let Some(inner) = option_inner(ty) {
        return match last_ident(inner)?.to_string().as_str() {
            "BodyReader" => Some(FieldKind::Stream { optional: true }),
            "UploadedFile" => Some(FieldKind::File { optional: true }),
            "Ctx" => Some(FieldKind::Context { optional: true }),
            _ => None,
        };
    }
    match last_ident(ty)?.to_string().as_str() {
        "String" => Some(FieldKind::Str),
        "i8" | "i16" | "i32" | "i64" | "isize" => Some(FieldKind::Int),
        "u8" | "u16" | "u32" | "u64" | "usize" => Some(FieldKind::Uint),
        "f32" | "f64" => Some(FieldKind::Float),
        "BodyReader" => Some(FieldKind::Stream { optional: false }),
        "UploadedFile" => Some(FieldKind::File { optional: false }),
        "Ctx" => Some(FieldKind::Context { optional: false }),
        _ => None,
    }
}

fn spec_expr(opts: &BindOpts) -> TokenStream2 {
    let mut expr = quote! { ::reqbind::binding::BindingSpec::new() };
    if let Some(sources) = &opts.sources {
        expr = quote! { #expr.sources(#sources) };
    }
    if let Some(rename) = &opts.rename {
        expr = quote! { #expr.rename(#rename) };
    }
    if opts.sensitive {
        expr = quote! { #expr.sensitive() };
    }
    if opts.required {
        expr = quote! { #expr.required() };
    }
    expr
}

/// Derive a [`Bind`] implementation describing how each field of a struct is
/// populated from an inbound request.
///
/// Field options are declared with `#[bind(...)]`:
///
/// - `from = "query,header"` — ordered source chain (`query`, `param`,
///   `header`, `form`, `file`); defaults to `param,query` when absent
/// - `rename = "name"` — lookup name override (validation failures still use
///   the declared field name)
/// - `required` — an absent value becomes a validation failure
/// - `sensitive` — disables the lowercase fallback lookup
/// - `skip` / `response` — field is never populated from the request
///
/// Field types decide the coercion path: `String`, signed/unsigned integers,
/// floats, `Option<BodyReader>` (raw body stream), `Option<UploadedFile>` or
/// `UploadedFile` (multipart file by display name), `Option<Ctx>` (the request
/// context itself). Any other type is a compile error unless marked
/// `#[bind(skip)]`.
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> SynResult<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Bindable can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "Bindable requires named fields",
        ));
    };

    let mut bindings = Vec::new();
    for field in &fields.named {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let name = ident.to_string();
        let opts = parse_bind_opts(field)?;

        if opts.skip {
            bindings.push(quote! { ::reqbind::binding::FieldBinding::skip(#name) });
            continue;
        }

        let Some(kind) = classify(&field.ty) else {
            return Err(syn::Error::new_spanned(
                &field.ty,
                format!("cannot bind field `{name}`: unsupported type; mark it #[bind(skip)]"),
            ));
        };
        let spec = spec_expr(&opts);
        let ty = &field.ty;

        let binding = match kind {
            FieldKind::Str => quote! {
                ::reqbind::binding::FieldBinding::string(#name, #spec, |t: &mut Self, v| t.#ident = v)
            },
            FieldKind::Int => quote! {
                ::reqbind::binding::FieldBinding::int(#name, #spec, |t: &mut Self, v: #ty| t.#ident = v)
            },
            FieldKind::Uint => quote! {
                ::reqbind::binding::FieldBinding::uint(#name, #spec, |t: &mut Self, v: #ty| t.#ident = v)
            },
            FieldKind::Float => quote! {
                ::reqbind::binding::FieldBinding::float(#name, #spec, |t: &mut Self, v: #ty| t.#ident = v)
            },
            FieldKind::Stream { optional: true } => quote! {
                ::reqbind::binding::FieldBinding::stream(#name, |t: &mut Self, v| t.#ident = Some(v))
            },
            FieldKind::Stream { optional: false } => {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "body stream fields must be Option<BodyReader>",
                ));
            }
            FieldKind::File { optional: true } => quote! {
                ::reqbind::binding::FieldBinding::file(#name, #spec, |t: &mut Self, v| t.#ident = Some(v))
            },
            FieldKind::File { optional: false } => quote! {
                ::reqbind::binding::FieldBinding::file(#name, #spec, |t: &mut Self, v| t.#ident = v)
            },
            FieldKind::Context { optional: true } => quote! {
                ::reqbind::binding::FieldBinding::context(#name, |t: &mut Self, v| t.#ident = Some(v))
            },
            FieldKind::Context { optional: false } => {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "context fields must be Option<Ctx>",
                ));
            }
        };
        bindings.push(binding);
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::reqbind::binding::Bind for #ident #ty_generics #where_clause {
            fn bindings() -> ::std::vec::Vec<::reqbind::binding::FieldBinding<Self>> {
                ::std::vec![ #(#bindings),* ]
            }
        }

        impl #impl_generics ::reqbind::handler::HandlerArg for #ident #ty_generics #where_clause {
            fn compile() -> ::reqbind::handler::ArgResolver<Self> {
                ::reqbind::handler::bind_arg::<Self>()
            }
        }
    })
}
