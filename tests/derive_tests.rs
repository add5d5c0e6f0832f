//! `#[derive(Bindable)]` surface: attribute handling and the type-to-coercion
//! mapping the derive performs at compile time.

mod common;

use common::MockRequest;
use reqbind::binding::{Resolved, StructPlan};
use reqbind::ctx::{BodyReader, Ctx, UploadedFile};
use reqbind::Bindable;
use std::io::Read;

fn assemble<T: reqbind::Bind>(ctx: &Ctx) -> Resolved<T> {
    StructPlan::<T>::of().assemble(ctx).expect("assemble")
}

// No Debug derive: the body reader holds an opaque stream.
#[derive(Default, Bindable)]
struct Everything {
    name: String,
    #[bind(from = "query")]
    count: i32,
    #[bind(from = "query")]
    limit: u16,
    #[bind(from = "query")]
    ratio: f32,
    body: Option<BodyReader>,
    #[bind(rename = "avatar")]
    picture: Option<UploadedFile>,
    ctx: Option<Ctx>,
    #[bind(skip)]
    cache: Vec<String>,
}

#[test]
fn derive_maps_every_supported_field_type() {
    common::init_tracing();
    let (ctx, _req) = MockRequest::new()
        .with_param("name", "pickles")
        .with_query("count", "-7")
        .with_query("limit", "200")
        .with_query("ratio", "0.5")
        .with_file("avatar", "me.png", b"bytes")
        .with_body(b"raw body")
        .build();

    let Resolved::Value(value) = assemble::<Everything>(&ctx) else {
        panic!("expected assembled value");
    };
    assert_eq!(value.name, "pickles");
    assert_eq!(value.count, -7);
    assert_eq!(value.limit, 200);
    assert_eq!(value.ratio, 0.5);
    assert!(value.cache.is_empty(), "skipped field keeps its default");
    assert!(value.ctx.is_some());
    assert_eq!(value.picture.expect("file").content, b"bytes");

    let mut body = String::new();
    value
        .body
        .expect("body reader")
        .read_to_string(&mut body)
        .expect("read body");
    assert_eq!(body, "raw body");
}

#[derive(Debug, Default, Bindable)]
struct CreateUser {
    #[bind(from = "form", required)]
    username: String,
    #[bind(response = 201)]
    location: String,
}

#[test]
fn response_fields_are_never_populated_from_the_request() {
    // Even an exact name match must not leak into a response-only field.
    let (ctx, _req) = MockRequest::new()
        .with_form("username", "ada")
        .with_query("location", "/users/ada")
        .build();

    let Resolved::Value(value) = assemble::<CreateUser>(&ctx) else {
        panic!("expected assembled value");
    };
    assert_eq!(value.username, "ada");
    assert_eq!(value.location, "");
}

#[derive(Debug, Default, Bindable)]
struct ApiAuth {
    #[bind(from = "header", rename = "X-Api-Key", sensitive, required)]
    key: String,
}

#[test]
fn sensitive_derive_attribute_disables_the_fallback() {
    let (ctx, req) = MockRequest::new().with_header("x-api-key", "k123").build();
    let resolved = assemble::<ApiAuth>(&ctx);
    assert!(matches!(resolved, Resolved::Rejected));

    let (status, body) = req.sole_response();
    assert_eq!(status, 400);
    let fields = body["fields"].as_array().expect("fields array");
    assert_eq!(fields[0]["field"], "key");
    assert_eq!(fields[0]["error"], "no value found on required field");

    // Exact case resolves.
    let (ctx, _req) = MockRequest::new().with_header("X-Api-Key", "k123").build();
    let Resolved::Value(value) = assemble::<ApiAuth>(&ctx) else {
        panic!("expected assembled value");
    };
    assert_eq!(value.key, "k123");
}

#[derive(Debug, Default, Bindable)]
struct Narrow {
    #[bind(from = "query")]
    limit: u8,
    #[bind(from = "query")]
    offset: i8,
}

#[test]
fn out_of_range_numeric_input_fails_validation_instead_of_wrapping() {
    let (ctx, req) = MockRequest::new()
        .with_query("limit", "300")
        .with_query("offset", "-300")
        .build();
    let resolved = assemble::<Narrow>(&ctx);
    assert!(matches!(resolved, Resolved::Rejected));

    let (status, body) = req.sole_response();
    assert_eq!(status, 400);
    let fields = body["fields"].as_array().expect("fields array");
    assert_eq!(fields.len(), 2);
    for field in fields {
        assert!(field["error"]
            .as_str()
            .expect("error string")
            .starts_with("not a number"));
    }
}

#[test]
fn in_range_numeric_input_binds_to_narrow_types() {
    let (ctx, _req) = MockRequest::new()
        .with_query("limit", "200")
        .with_query("offset", "-5")
        .build();
    let Resolved::Value(value) = assemble::<Narrow>(&ctx) else {
        panic!("expected assembled value");
    };
    assert_eq!(value.limit, 200);
    assert_eq!(value.offset, -5);
}

#[derive(Debug, Default, Bindable)]
struct MultiSource {
    #[bind(from = "header,query")]
    token: String,
}

#[test]
fn declared_source_order_is_respected_by_the_derive() {
    let (ctx, _req) = MockRequest::new()
        .with_header("token", "from-header")
        .with_query("token", "from-query")
        .build();
    let Resolved::Value(value) = assemble::<MultiSource>(&ctx) else {
        panic!("expected assembled value");
    };
    assert_eq!(value.token, "from-header");
}

#[derive(Debug, Default, Bindable)]
struct UnknownSources {
    #[bind(from = "cookie,query")]
    token: String,
}

#[test]
fn unknown_source_names_are_dropped_not_rejected() {
    let (ctx, _req) = MockRequest::new().with_query("token", "t").build();
    let Resolved::Value(value) = assemble::<UnknownSources>(&ctx) else {
        panic!("expected assembled value");
    };
    assert_eq!(value.token, "t");
}
