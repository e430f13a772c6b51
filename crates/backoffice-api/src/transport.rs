// HTTP transport shared by every resource client.
//
// Owns URL construction relative to a base path, bearer-token injection,
// response decoding (JSON or raw bytes, chosen by the caller), and the
// normalization of every failure into `Error::RequestFailed`.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::CredentialProvider;
use crate::envelope::ErrorEnvelope;
use crate::error::Error;

// ── Client configuration ────────────────────────────────────────────

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (local development backends).
    DangerAcceptInvalid,
}

/// Settings for building the underlying `reqwest::Client`.
///
/// `timeout: None` leaves reqwest's default in place.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Option<Duration>,
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "backoffice/",
            env!("CARGO_PKG_VERSION")
        ));

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Client(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Client(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Client(format!("failed to build HTTP client: {e}")))
    }
}

// ── Request / response shapes ───────────────────────────────────────

/// How the caller wants a successful response decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    #[default]
    Json,
    /// Raw payload (exports). A JSON body on such a request is treated as
    /// an error envelope, whatever the status code.
    Binary,
}

/// Request body encodings.
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(reqwest::multipart::Form),
}

impl RequestBody {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| Error::request_failed(format!("failed to encode request body: {e}")))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Multipart(form) => f
                .debug_struct("Multipart")
                .field("boundary", &form.boundary())
                .finish(),
        }
    }
}

/// Decoded response payload.
#[derive(Debug, Clone)]
pub enum RawResult {
    Json(serde_json::Value),
    Binary { bytes: Bytes, content_type: String },
}

/// A single call against a resource: method, relative path segments,
/// optional body and query, decoding mode, and the message to report when
/// the server supplies none.
#[derive(Debug)]
pub struct Request {
    method: Method,
    segments: Vec<String>,
    body: Option<RequestBody>,
    query: Vec<(String, String)>,
    kind: ResponseKind,
    fallback: String,
}

impl Request {
    /// `path` is split on `/`; empty pieces are dropped.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            body: None,
            query: Vec::new(),
            kind: ResponseKind::Json,
            fallback: "Request failed.".into(),
        }
    }

    /// Append one path segment verbatim, e.g. a record id. A `/` inside it
    /// is percent-encoded rather than starting a new segment.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, params: &[(String, String)]) -> Self {
        self.query.extend_from_slice(params);
        self
    }

    pub fn kind(mut self, kind: ResponseKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback = message.into();
        self
    }
}

// ── Transport ───────────────────────────────────────────────────────

/// Stateless HTTP transport bound to a base path.
///
/// Cheap to clone: the `reqwest::Client` and credential provider are
/// reference-counted. [`scoped`](Self::scoped) derives a transport for a
/// resource sub-path sharing the same connection pool.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl Transport {
    /// Build a transport from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        config: &TransportConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// A transport for `{base}/{segment}` sharing this one's client and
    /// credentials.
    pub fn scoped(&self, segment: &str) -> Result<Self, Error> {
        Ok(Self {
            http: self.http.clone(),
            base_url: self.url(segment)?,
            credentials: Arc::clone(&self.credentials),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` segments to the base URL. Segments are
    /// percent-encoded; empty segments are dropped.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    /// Append each of `segments` as exactly one path segment. Empty, `.`,
    /// and `..` segments are rejected since they would address a different
    /// resource.
    pub fn segments_url(&self, segments: &[String]) -> Result<Url, Error> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || *s == "." || *s == "..")
        {
            return Err(Error::Client(format!("invalid path segment '{bad}'")));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode the response according to its
    /// [`ResponseKind`].
    pub async fn request(&self, request: Request) -> Result<RawResult, Error> {
        let Request {
            method,
            segments,
            body,
            query,
            kind,
            fallback,
        } = request;

        let url = self.segments_url(&segments).map_err(|e| {
            warn!(error = %e, "request path rejected");
            Error::request_failed(fallback.as_str())
        })?;
        if query.is_empty() {
            debug!("{method} {url}");
        } else {
            debug!("{method} {url} params={query:?}");
        }

        let mut builder = self.http.request(method, url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(token) = self.credentials.bearer_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::request_failed(format!("invalid bearer token: {e}")))?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }
        builder = match body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            None => builder,
        };

        let resp = builder.send().await.map_err(|e| {
            warn!(error = %e, "request did not complete");
            Error::request_failed(fallback.as_str())
        })?;

        Self::handle_response(resp, kind, &fallback).await
    }

    /// Send a JSON request and deserialize the body into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T, Error> {
        let fallback = request.fallback.clone();
        match self.request(request.kind(ResponseKind::Json)).await? {
            RawResult::Json(value) => serde_json::from_value(value).map_err(|e| {
                warn!(error = %e, "malformed response body");
                Error::request_failed(fallback)
            }),
            RawResult::Binary { .. } => Err(Error::request_failed(fallback)),
        }
    }

    async fn handle_response(
        resp: reqwest::Response,
        kind: ResponseKind,
        fallback: &str,
    ) -> Result<RawResult, Error> {
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        trace!(%status, content_type = %content_type, "response");

        let body = resp.bytes().await.map_err(|e| {
            warn!(error = %e, "failed to read response body");
            Error::request_failed(fallback)
        })?;

        if !status.is_success() {
            let err = Self::parse_error(&body, fallback);
            warn!(%status, message = %err, "request rejected");
            return Err(err);
        }

        match kind {
            ResponseKind::Json if body.is_empty() => Ok(RawResult::Json(serde_json::Value::Null)),
            ResponseKind::Json => serde_json::from_slice(&body)
                .map(RawResult::Json)
                .map_err(|e| {
                    warn!(error = %e, "response is not JSON");
                    Error::request_failed(fallback)
                }),
            ResponseKind::Binary if is_json(&content_type) => {
                let err = Self::parse_error(&body, fallback);
                warn!(message = %err, "binary request answered with an error envelope");
                Err(err)
            }
            ResponseKind::Binary => Ok(RawResult::Binary {
                bytes: body,
                content_type,
            }),
        }
    }

    /// Pull the human-readable message out of an error body, falling back
    /// to the operation's fixed message.
    fn parse_error(body: &[u8], fallback: &str) -> Error {
        let message = serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .and_then(ErrorEnvelope::into_message)
            .unwrap_or_else(|| fallback.to_owned());
        Error::request_failed(message)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}
