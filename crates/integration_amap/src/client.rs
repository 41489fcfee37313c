//! AMap web service client
//!
//! Thin facade over request preparation, the transport and response
//! decoding. Envelopes are returned as decoded; call `raise_for_status` to
//! turn vendor errors into [`AmapError`]s.

use std::{fmt, sync::Arc};

use domain::RouteKey;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    batch::{BatchEnvelope, decode_batch_text, prepare_batch},
    config::AmapConfig,
    envelope::{AnyEnvelope, Envelope, ResponseKind},
    error::AmapError,
    hooks::{CallHooks, HookTable, PreparedCall},
    models::{
        DistanceResponse, DistrictResponse, DrivingResponse, GeoCodeResponse, ReGeoCodeResponse,
        RidingResponse, SearchResponse, SuggestResponse, WalkingResponse,
    },
    normalize::normalize,
    registry::RouteRegistry,
    request::{
        Credentials, DistanceRequest, DistrictRequest, DrivingRequest, GeoCodeRequest,
        PreparedRequest, ReGeoCodeRequest, Request, RidingRequest, SearchAroundRequest,
        SearchTextRequest, SuggestRequest, WalkingRequest,
    },
    transport::{ReqwestTransport, Transport},
};

/// Client for the AMap web service
pub struct AmapClient<T: Transport = ReqwestTransport> {
    config: Arc<AmapConfig>,
    registry: Arc<RouteRegistry>,
    credentials: Credentials,
    hooks: HookTable,
    transport: T,
}

impl AmapClient<ReqwestTransport> {
    /// Create a client backed by `reqwest`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: AmapConfig) -> Result<Self, AmapError> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> AmapClient<T> {
    /// Create a client with a custom transport and the default routes
    pub fn with_transport(config: AmapConfig, transport: T) -> Self {
        let credentials = Credentials::from_config(&config);
        Self {
            config: Arc::new(config),
            registry: Arc::new(RouteRegistry::amap_default()),
            credentials,
            hooks: HookTable::new(),
            transport,
        }
    }

    /// Replace the route registry
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<RouteRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the per-route hooks
    #[must_use]
    pub fn with_hooks(mut self, hooks: HookTable) -> Self {
        self.hooks = hooks;
        self
    }

    /// Per-route hooks, for adding or removing hooks after construction
    pub fn hooks_mut(&mut self) -> &mut HookTable {
        &mut self.hooks
    }

    /// Client configuration
    #[must_use]
    pub fn config(&self) -> &AmapConfig {
        &self.config
    }

    /// Routes this client can call
    #[must_use]
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base(), path)
    }

    /// Run hooks around a single GET and return the raw body
    async fn send(&self, prepared: &PreparedRequest, overrides: &CallHooks) -> Result<String, AmapError> {
        let url = self.url(self.registry.path(prepared.route)?);
        self.hooks.run_prepared(PreparedCall::Single(prepared), overrides);
        debug!(route = %prepared.route, %url, "Calling AMap");

        let body = self.transport.get(&url, prepared.params.pairs()).await?;
        self.hooks.run_response(prepared.route, &body, overrides);
        Ok(body)
    }

    /// Send a prepared request and decode it as `K`
    async fn call<K: ResponseKind>(&self, prepared: PreparedRequest) -> Result<Envelope<K>, AmapError> {
        let entry = self.registry.get(prepared.route)?;
        let body = self.send(&prepared, &CallHooks::new()).await?;
        Envelope::from_text(&body, entry.options(self.config.mode()))
    }

    /// Address to coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid, the call fails or the
    /// payload is malformed.
    #[instrument(skip(self))]
    pub async fn geocode(&self, request: &GeoCodeRequest) -> Result<Envelope<GeoCodeResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// Coordinates to address
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn regeocode(
        &self,
        request: &ReGeoCodeRequest,
    ) -> Result<Envelope<ReGeoCodeResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// Keyword POI search
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn search_text(
        &self,
        request: &SearchTextRequest,
    ) -> Result<Envelope<SearchResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// POI search around a point
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn search_around(
        &self,
        request: &SearchAroundRequest,
    ) -> Result<Envelope<SearchResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// Input tips
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn suggest(&self, request: &SuggestRequest) -> Result<Envelope<SuggestResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// Administrative districts
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn district(&self, request: &DistrictRequest) -> Result<Envelope<DistrictResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// Distances from origins to a destination
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn distance(&self, request: &DistanceRequest) -> Result<Envelope<DistanceResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// Bicycle directions, decoded with version detection
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn riding(&self, request: &RidingRequest) -> Result<Envelope<RidingResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// Walking directions
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn walking(&self, request: &WalkingRequest) -> Result<Envelope<WalkingResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// Driving directions
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn driving(&self, request: &DrivingRequest) -> Result<Envelope<DrivingResponse>, AmapError> {
        self.call(request.prepare(&self.credentials)?).await
    }

    /// Send any request, decoding with the kind registered for its route
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self))]
    pub async fn execute(&self, request: &Request) -> Result<AnyEnvelope, AmapError> {
        self.execute_with(request, &CallHooks::new()).await
    }

    /// [`Self::execute`] with hooks overriding the client's for this call
    ///
    /// # Errors
    ///
    /// See [`Self::geocode`].
    #[instrument(skip(self, hooks))]
    pub async fn execute_with(&self, request: &Request, hooks: &CallHooks) -> Result<AnyEnvelope, AmapError> {
        let prepared = request.prepare(&self.credentials)?;
        let entry = self.registry.get(prepared.route)?;

        let body = self.send(&prepared, hooks).await?;
        entry.decode(&normalize(&body)?, self.config.mode())
    }

    /// Send many requests in one batch call
    ///
    /// Sub-responses come back in request order and are always decoded in
    /// static mode.
    ///
    /// # Errors
    ///
    /// Returns a batch error listing every request that failed to prepare
    /// or decode, `InvalidParams` for an empty batch, and the transport's
    /// error when the call fails.
    #[instrument(skip(self, requests), fields(requests = requests.len()))]
    pub async fn batch(&self, requests: &[Request]) -> Result<BatchEnvelope, AmapError> {
        self.batch_with(requests, &CallHooks::new()).await
    }

    /// [`Self::batch`] with hooks overriding the client's for this call
    ///
    /// Hooks of the batch route see the whole batch; hooks of the
    /// sub-request routes do not run.
    ///
    /// # Errors
    ///
    /// See [`Self::batch`].
    #[instrument(skip(self, requests, hooks), fields(requests = requests.len()))]
    pub async fn batch_with(&self, requests: &[Request], hooks: &CallHooks) -> Result<BatchEnvelope, AmapError> {
        if requests.is_empty() {
            return Err(AmapError::InvalidParams("batch requires at least one request".to_string()));
        }

        let wire = prepare_batch(requests, &self.credentials, &self.registry)?;
        let key = self
            .credentials
            .key_str()
            .ok_or_else(|| AmapError::ConfigurationError("AMap key is not configured".to_string()))?;

        let mut url = Url::parse(&self.url(self.registry.path(RouteKey::Batch)?))
            .map_err(|e| AmapError::ConfigurationError(format!("invalid batch URL: {e}")))?;
        url.query_pairs_mut().append_pair("key", key);
        self.hooks.run_prepared(PreparedCall::Batch(&wire), hooks);
        debug!(ops = wire.len(), "Sending batch");

        let body = self.transport.post(url.as_str(), wire.body().to_string()).await?;
        self.hooks.run_response(RouteKey::Batch, &body, hooks);
        decode_batch_text(&body, &wire.routes(), &self.registry)
    }
}

impl<T: Transport> fmt::Debug for AmapClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmapClient")
            .field("config", &self.config)
            .field("routes", &self.registry.len())
            .field("credentials", &self.credentials)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
