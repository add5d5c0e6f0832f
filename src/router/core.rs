use crate::binding::Resolved;
use crate::ctx::Ctx;
use crate::handler::Handler;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Callback invoked with a handler's error and the raw context when an error
/// handler is registered for the route (or globally).
pub type ErrorHandlerFn = dyn Fn(&anyhow::Error, &Ctx) + Send + Sync;

/// Outcome of dispatching one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The handler ran (or its error was consumed by an error handler). The
    /// adapter wrote no body of its own.
    Completed,
    /// Validation failed; the 400 response was already written and the
    /// handler never ran.
    Rejected,
}

/// Request-processing failure surfaced by the dispatch adapter.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No record registered under this exact method + path key.
    #[error("no route registered for {method} {path}")]
    NoRoute { method: Method, path: String },
    /// A hard resolver error: body decode failure, substrate I/O failure, or
    /// a failed validation-response write.
    #[error("request validation failed: {0}")]
    Resolve(#[source] anyhow::Error),
    /// The handler returned an error and no error handler was registered.
    #[error(transparent)]
    Handler(anyhow::Error),
}

type RouteRunner = Box<dyn Fn(&Ctx) -> Result<Dispatch, DispatchError> + Send + Sync>;

/// One registered route: compiled final resolver plus handler invocation,
/// erased into a single runner closure. Immutable after registration.
struct Route {
    run: RouteRunner,
    error_handler: Option<Arc<ErrorHandlerFn>>,
}

/// Registry of compiled handler plans and the dispatch adapter over them.
///
/// Registration is single-threaded at startup; afterwards the binder is
/// read-only and can be shared across request workers without locking.
#[derive(Default)]
pub struct Binder {
    routes: HashMap<(Method, String), Route>,
    error_handler: Option<Arc<ErrorHandlerFn>>,
}

impl Binder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global fallback error handler for handler-returned errors.
    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&anyhow::Error, &Ctx) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
    }

    /// Register a handler for a method and path.
    ///
    /// The handler's parameter plans are compiled here, once; requests only
    /// execute the precompiled plan. Registering over an existing method +
    /// path replaces the old record.
    pub fn register<Args, H>(&mut self, method: Method, path: &str, handler: H)
    where
        Args: 'static,
        H: Handler<Args>,
    {
        self.register_route(method, path, handler, None);
    }

    /// Register a handler with a per-route error handler override, consulted
    /// before the global one.
    pub fn register_with_error_handler<Args, H, E>(
        &mut self,
        method: Method,
        path: &str,
        handler: H,
        error_handler: E,
    ) where
        Args: 'static,
        H: Handler<Args>,
        E: Fn(&anyhow::Error, &Ctx) + Send + Sync + 'static,
    {
        self.register_route(method, path, handler, Some(Arc::new(error_handler)));
    }

    fn register_route<Args, H>(
        &mut self,
        method: Method,
        path: &str,
        handler: H,
        error_handler: Option<Arc<ErrorHandlerFn>>,
    ) where
        Args: 'static,
        H: Handler<Args>,
    {
        let resolver = H::compile_args();
        let run: RouteRunner = Box::new(move |ctx| {
            match resolver(ctx).map_err(DispatchError::Resolve)? {
                Resolved::Rejected => {
                    debug!("validation handled, handler skipped");
                    Ok(Dispatch::Rejected)
                }
                Resolved::Value(args) => handler
                    .invoke(args)
                    .map(|()| Dispatch::Completed)
                    .map_err(DispatchError::Handler),
            }
        });

        let key = (method.clone(), path.to_string());
        let replaced = self
            .routes
            .insert(
                key,
                Route {
                    run,
                    error_handler,
                },
            )
            .is_some();
        if replaced {
            warn!(%method, path, "route replaced an existing registration");
        } else {
            info!(%method, path, total_routes = self.routes.len(), "route registered");
        }
    }

    /// Dispatch a request whose method and path the substrate has already
    /// resolved to one of the registered routes.
    pub fn dispatch(
        &self,
        method: Method,
        path: &str,
        ctx: &Ctx,
    ) -> Result<Dispatch, DispatchError> {
        let key = (method, path.to_string());
        let Some(route) = self.routes.get(&key) else {
            return Err(DispatchError::NoRoute {
                method: key.0,
                path: key.1,
            });
        };

        match (route.run)(ctx) {
            Ok(outcome) => {
                debug!(method = %key.0, path, ?outcome, "request dispatched");
                Ok(outcome)
            }
            Err(DispatchError::Handler(err)) => {
                let handler = route
                    .error_handler
                    .as_ref()
                    .or(self.error_handler.as_ref());
                match handler {
                    Some(error_handler) => {
                        debug!(
                            method = %key.0,
                            path,
                            error = %err,
                            "handler error consumed by error handler"
                        );
                        error_handler(&err, ctx);
                        Ok(Dispatch::Completed)
                    }
                    None => Err(DispatchError::Handler(err)),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
