//! Client-side core for the site: API requests and page metadata.
//!
//! # Overview
//! Two independent pieces share one read-only `RuntimeConfig`:
//! - `ApiGateway` sends requests to `api_base + endpoint` through an
//!   injected `Transport`, attaching `Authorization: Bearer <token>` when the
//!   injected `CredentialStore` holds a token.
//! - `MetadataResolver` computes title, description, preview image,
//!   canonical URL and the fixed social tags for a page, and hands the
//!   result to a `HeadSink`.
//!
//! # Design
//! - Configuration, transport and credentials are constructor parameters,
//!   never ambient lookups, so both pieces are testable in isolation.
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`);
//!   the transport is the only place that touches the network.
//! - The gateway never retries, caches, or raises on status codes.

pub mod config;
pub mod credential;
pub mod error;
pub mod gateway;
pub mod head;
pub mod http;
pub mod metadata;

pub use config::{ConfigError, Mode, RuntimeConfig};
pub use credential::{
    CookieStore, CredentialStore, MemoryStore, NoCredentials, StaticCredential, TOKEN_KEY,
};
pub use error::ApiError;
pub use gateway::ApiGateway;
pub use head::{HeadPayload, HeadSink, HtmlHeadSink, LinkTag, MetaKey, MetaTag};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use metadata::{
    MetadataError, MetadataMode, MetadataResolver, PageMetadataInput, ResolvedMetadata,
    RouteContext, SiteBrand,
};
