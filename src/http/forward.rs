//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rebuild the inbound request against the fixed upstream authority
//! - Preserve method, path + query, and all headers verbatim
//! - Stream both bodies without buffering
//! - Settle the in-flight metrics guard exactly once per request
//!
//! # Design Decisions
//! - Headers are not filtered or rewritten. The `Host` header reaches the
//!   upstream exactly as the client sent it, which can confuse virtual
//!   hosting on the upstream side; this is deliberate passthrough behavior.
//! - A non-success upstream status is not a proxy error. Only transport
//!   failures (connect refused, broken stream) count as errors.
//! - No deadline is applied to the upstream call.

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper::body::{Body as HttpBody, Bytes, Frame, Incoming, SizeHint};

use crate::http::server::AppState;
use crate::metrics::InFlight;

/// Forward one inbound request to the upstream.
///
/// Counters move before the outbound attempt; the returned guard is settled
/// on whichever edge the request ends on (see [`MeteredBody`]).
pub async fn forward(State(state): State<AppState>, request: Request<Body>) -> Response {
    let in_flight = state.metrics.begin_request();

    let (parts, body) = request.into_parts();

    tracing::debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        upstream = %state.upstream,
        "Forwarding request"
    );

    let uri = upstream_uri(&state.upstream, &parts.uri);
    let mut outbound = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .body(body)
        .expect("outbound request from an already-parsed method and uri");
    *outbound.headers_mut() = parts.headers;

    match state.client.request(outbound).await {
        Ok(upstream_response) => {
            let (response_parts, upstream_body) = upstream_response.into_parts();
            Response::from_parts(
                response_parts,
                Body::new(MeteredBody::new(upstream_body, in_flight)),
            )
        }
        Err(error) => {
            tracing::error!(
                method = %parts.method,
                path = %parts.uri.path(),
                error = %error,
                "Upstream unreachable"
            );
            in_flight.fail();
            (StatusCode::BAD_GATEWAY, "Bad Gateway").into_response()
        }
    }
}

/// Re-address an inbound URI at the upstream, keeping path and query intact.
fn upstream_uri(upstream: &Authority, inbound: &Uri) -> Uri {
    let path_and_query = inbound
        .path_and_query()
        .map(PathAndQuery::as_str)
        .unwrap_or("/");

    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(upstream.clone())
        .path_and_query(path_and_query)
        .build()
        .expect("valid uri from validated authority and parsed path")
}

/// Upstream response body that settles the in-flight guard on its finishing
/// edge.
///
/// Frames pass straight through to the client. The guard settles exactly once:
/// - clean end of stream → `complete()` (records the round-trip time),
/// - transport error mid-stream → `fail()`,
/// - dropped before the end (client disconnected) → guard drop releases the
///   active count only.
///
/// Settlement is checked again in `Drop` because hyper skips the final poll
/// when `is_end_stream` already reports completion.
struct MeteredBody {
    inner: Incoming,
    in_flight: Option<InFlight>,
}

impl MeteredBody {
    fn new(inner: Incoming, in_flight: InFlight) -> Self {
        Self {
            inner,
            in_flight: Some(in_flight),
        }
    }
}

impl HttpBody for MeteredBody {
    type Data = Bytes;
    type Error = hyper::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        match ready!(Pin::new(&mut this.inner).poll_frame(cx)) {
            Some(Ok(frame)) => Poll::Ready(Some(Ok(frame))),
            Some(Err(error)) => {
                if let Some(in_flight) = this.in_flight.take() {
                    in_flight.fail();
                }
                Poll::Ready(Some(Err(error)))
            }
            None => {
                if let Some(in_flight) = this.in_flight.take() {
                    in_flight.complete();
                }
                Poll::Ready(None)
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for MeteredBody {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            if self.inner.is_end_stream() {
                in_flight.complete();
            }
            // Otherwise the client went away mid-stream: the guard's own drop
            // releases the active count without recording an outcome.
        }
    }
}
