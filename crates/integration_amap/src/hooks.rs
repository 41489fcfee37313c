//! Per-route call hooks
//!
//! A prepared hook sees the encoded request right before it is sent, a
//! response hook sees the raw body right after the transport returns.
//! Hooks registered on the client apply to every call of their route;
//! [`CallHooks`] replaces them for a single call.

use std::{collections::HashMap, fmt, sync::Arc};

use domain::RouteKey;

use crate::{batch::WireBatch, request::PreparedRequest};

/// Encoded call handed to a prepared hook
#[derive(Debug, Clone, Copy)]
pub enum PreparedCall<'a> {
    /// Single-endpoint request
    Single(&'a PreparedRequest),
    /// Batch of sub-requests
    Batch(&'a WireBatch),
}

impl PreparedCall<'_> {
    /// Route of the call
    #[must_use]
    pub const fn route(&self) -> RouteKey {
        match self {
            Self::Single(prepared) => prepared.route,
            Self::Batch(_) => RouteKey::Batch,
        }
    }
}

/// Callback run after a request is encoded
pub type PreparedHook = Arc<dyn Fn(PreparedCall<'_>) + Send + Sync>;

/// Callback run on the raw response body
pub type ResponseHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Hooks for one call, taking precedence over the client's
#[derive(Clone, Default)]
pub struct CallHooks {
    /// Replaces the route's prepared hook
    pub prepared: Option<PreparedHook>,
    /// Replaces the route's response hook
    pub response: Option<ResponseHook>,
}

impl CallHooks {
    /// No overrides
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prepared: None,
            response: None,
        }
    }

    /// Override the prepared hook
    #[must_use]
    pub fn prepared(mut self, hook: impl Fn(PreparedCall<'_>) + Send + Sync + 'static) -> Self {
        self.prepared = Some(Arc::new(hook));
        self
    }

    /// Override the response hook
    #[must_use]
    pub fn response(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.response = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for CallHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallHooks")
            .field("prepared", &self.prepared.is_some())
            .field("response", &self.response.is_some())
            .finish()
    }
}

/// Route key to hook table
#[derive(Clone, Default)]
pub struct HookTable {
    prepared: HashMap<RouteKey, PreparedHook>,
    response: HashMap<RouteKey, ResponseHook>,
}

impl HookTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prepared hook of a route, replacing any previous one
    pub fn add_prepared(
        &mut self,
        route: RouteKey,
        hook: impl Fn(PreparedCall<'_>) + Send + Sync + 'static,
    ) -> &mut Self {
        self.prepared.insert(route, Arc::new(hook));
        self
    }

    /// Set the response hook of a route, replacing any previous one
    pub fn add_response(&mut self, route: RouteKey, hook: impl Fn(&str) + Send + Sync + 'static) -> &mut Self {
        self.response.insert(route, Arc::new(hook));
        self
    }

    /// Remove both hooks of a route
    pub fn remove(&mut self, route: RouteKey) {
        self.prepared.remove(&route);
        self.response.remove(&route);
    }

    pub(crate) fn run_prepared(&self, call: PreparedCall<'_>, overrides: &CallHooks) {
        let hook = overrides
            .prepared
            .as_ref()
            .or_else(|| self.prepared.get(&call.route()));
        if let Some(hook) = hook {
            hook(call);
        }
    }

    pub(crate) fn run_response(&self, route: RouteKey, body: &str, overrides: &CallHooks) {
        let hook = overrides.response.as_ref().or_else(|| self.response.get(&route));
        if let Some(hook) = hook {
            hook(body);
        }
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTable")
            .field("prepared", &self.prepared.keys().collect::<Vec<_>>())
            .field("response", &self.response.keys().collect::<Vec<_>>())
            .finish()
    }
}
