//! AMap (高德) web service client
//!
//! Typed requests for geocoding, reverse geocoding, POI search, input tips,
//! districts, distance measurement and riding/walking/driving directions,
//! plus the batch endpoint that packs many of them into one call.
//!
//! # Architecture
//!
//! - [`normalize()`] canonicalizes raw JSON: empty containers become `null`
//!   and camelCase keys become snake_case.
//! - [`Entity`] gives schema-checked property access over a normalized
//!   mapping, resolved on every read ([`DecodeMode::Dynamic`]) or once up
//!   front ([`DecodeMode::Static`]).
//! - [`Envelope`] reads the v3 or v4 status fields and exposes each
//!   endpoint's data through its [`ResponseKind`].
//! - The batch engine ([`prepare_batch`], [`decode_batch`],
//!   [`aggregate_status`]) attempts every item and reports failures as one
//!   [`BatchError`] with an outcome per position.
//! - [`AmapClient`] ties these to a [`Transport`] and a [`RouteRegistry`],
//!   running any per-route [`HookTable`] hooks around each call.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_amap::{AmapClient, AmapConfig, GeoCodeRequest};
//!
//! let client = AmapClient::new(AmapConfig::load()?)?;
//! let envelope = client.geocode(&GeoCodeRequest::new(["北京市朝阳区阜通东大街6号"])).await?;
//! envelope.raise_for_status()?;
//!
//! for geocode in envelope.data().iter() {
//!     println!("{:?}", geocode.location()?);
//! }
//! ```

mod batch;
mod client;
mod config;
mod entity;
mod envelope;
mod error;
mod hooks;
pub mod models;
mod normalize;
mod registry;
pub mod request;
mod signature;
mod transport;

pub use batch::{
    BatchEnvelope, BatchOp, WireBatch, aggregate_status, decode_batch, decode_batch_text,
    prepare_batch, run_with_partial_failure,
};
pub use client::AmapClient;
pub use config::AmapConfig;
pub use entity::{Decode, DecodeMode, Entity, Field, Schema};
pub use envelope::{AnyEnvelope, DecodeOptions, Envelope, ResponseKind, StatusMessage, decode_as};
pub use error::{
    AmapError, BATCH_ERROR_CODE, BATCH_ERROR_MESSAGE, BatchError, BatchPhase, StatusError,
};
pub use hooks::{CallHooks, HookTable, PreparedCall, PreparedHook, ResponseHook};
pub use models::{
    DistanceResponse, DistrictResponse, DrivingResponse, GeoCodeResponse, ReGeoCodeResponse,
    RidingResponse, SearchResponse, SearchResults, SuggestResponse, WalkingResponse,
};
pub use normalize::{normalize, normalize_tree, to_snake_case};
pub use registry::{DecodeFn, RouteEntry, RouteRegistry};
pub use request::{
    Credentials, DistanceRequest, DistrictRequest, DrivingRequest, GeoCodeRequest,
    PreparedRequest, ReGeoCodeRequest, Request, RidingRequest, RoutePoints, SearchAroundRequest,
    SearchFilter, SearchTextRequest, SuggestRequest, WalkingRequest, WireParams,
};
pub use signature::sign;
pub use transport::{ReqwestTransport, Transport};
