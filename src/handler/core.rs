use crate::binding::{Bind, Resolved, StructPlan};
use crate::ctx::Ctx;
use serde::de::DeserializeOwned;

/// Compiled per-parameter resolver: built once at registration, executed per
/// request. A hard error short-circuits the request; `Resolved::Rejected`
/// means a validation response has already been written.
pub type ArgResolver<T> = Box<dyn Fn(&Ctx) -> anyhow::Result<Resolved<T>> + Send + Sync>;

/// A handler parameter type that knows how to compile its own resolver.
pub trait HandlerArg: Sized + Send + 'static {
    fn compile() -> ArgResolver<Self>;
}

/// Compile a resolver for a bindable struct parameter.
///
/// Delegates to the struct's compiled field plan; `#[derive(Bindable)]`
/// emits a [`HandlerArg`] impl that calls this.
#[must_use]
pub fn bind_arg<T>() -> ArgResolver<T>
where
    T: Bind + Send + 'static,
{
    let plan = StructPlan::<T>::of();
    Box::new(move |ctx| plan.assemble(ctx))
}

impl HandlerArg for Ctx {
    fn compile() -> ArgResolver<Self> {
        Box::new(|ctx| Ok(Resolved::Value(ctx.clone())))
    }
}

/// Body-decode marker: the whole request body, decoded as JSON into `T`.
///
/// Decode failure is a hard request error, not a per-field validation
/// failure — the body is one unit, so no partial-field reporting is possible.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T> HandlerArg for Json<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn compile() -> ArgResolver<Self> {
        Box::new(|ctx| {
            // Decode errors pass through verbatim; the body is one unit.
            let value = serde_json::from_reader(ctx.body_reader()).map_err(anyhow::Error::from)?;
            Ok(Resolved::Value(Json(value)))
        })
    }
}

/// Handler-controlled-response marker.
///
/// Resolves to a zero-valued `T`; response metadata is never populated from
/// the request. A status-code parameter is reserved for declaring expected
/// response codes but currently inert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply<T>(pub T);

impl<T> HandlerArg for Reply<T>
where
    T: Default + Send + 'static,
{
    fn compile() -> ArgResolver<Self> {
        Box::new(|_ctx| Ok(Resolved::Value(Reply(T::default()))))
    }
}

/// A registrable handler over an argument tuple.
///
/// Implemented for functions of one to four [`HandlerArg`] parameters
/// returning `anyhow::Result<()>`. The shape constraints of registration —
/// at least one parameter, exactly one error-like return — are enforced here
/// by the trait bounds, so a malformed handler is a compile error instead of
/// a registration panic.
pub trait Handler<Args>: Send + Sync + 'static {
    /// Build the final resolver for this handler's parameter list.
    fn compile_args() -> ArgResolver<Args>;
    /// Invoke the handler with a fully resolved argument tuple.
    fn invoke(&self, args: Args) -> anyhow::Result<()>;
}

macro_rules! impl_handler {
    ($($arg:ident),+) => {
        impl<F, $($arg,)+> Handler<($($arg,)+)> for F
        where
            F: Fn($($arg),+) -> anyhow::Result<()> + Send + Sync + 'static,
            $($arg: HandlerArg,)+
        {
            #[allow(non_snake_case)]
            fn compile_args() -> ArgResolver<($($arg,)+)> {
                $(let $arg = <$arg as HandlerArg>::compile();)+
                Box::new(move |ctx| {
                    // Declared order, fail fast on the first rejection.
                    $(
                        let $arg = match $arg(ctx)? {
                            Resolved::Value(value) => value,
                            Resolved::Rejected => return Ok(Resolved::Rejected),
                        };
                    )+
                    Ok(Resolved::Value(($($arg,)+)))
                })
            }

            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)+): ($($arg,)+)) -> anyhow::Result<()> {
                self($($arg),+)
            }
        }
    };
}

impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
