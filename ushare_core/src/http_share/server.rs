//! HTTP server for file sharing
//!
//! One router variant per mode; each registers only the routes its mode
//! serves.

use super::control::ServerControl;
use super::pages::{index_handler, not_found_handler, upload_form_handler};
use super::receive::{ReceiveState, upload_handler};
use super::send::{SendState, download_handler};
use crate::config::ServeConfig;
use crate::error::ShareError;
use crate::state::{BoundFile, TransferState};
use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, header},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use std::future::IntoFuture;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// How long a stopped server waits for in-flight requests
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Middleware to turn off caching, so repeat fetches always see current bytes
async fn add_no_cache_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.append(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=0"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));

    response
}

/// Routes shared by both variants: landing page, 404 fallback, headers
fn with_common_routes(router: Router) -> Router {
    router
        .route("/", get(index_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn(add_no_cache_headers))
}

/// Send variant: `GET /send` downloads the bound file. The upload form is
/// still rendered, but nothing accepts its POST.
pub fn send_router(bound: BoundFile, control: ServerControl) -> Router {
    let state = Arc::new(SendState { bound, control });

    let router = Router::new()
        .route("/send", get(download_handler))
        .route("/receive", get(upload_form_handler))
        .with_state(state);

    with_common_routes(router)
}

/// Receive variant: `GET /receive` renders the form, `POST /receive`
/// accepts files. Request bodies are unbounded.
pub fn receive_router(upload_dir: PathBuf) -> Router {
    let state = Arc::new(ReceiveState { upload_dir });

    let router = Router::new()
        .route("/receive", get(upload_form_handler).post(upload_handler))
        .layer(DefaultBodyLimit::disable())
        .with_state(state);

    with_common_routes(router)
}

/// Build the router variant for `state`
pub fn create_router(state: &TransferState, control: &ServerControl) -> Router {
    match state {
        TransferState::Send(bound) => send_router(bound.clone(), control.clone()),
        TransferState::Receive { upload_dir } => receive_router(upload_dir.clone()),
    }
}

pub async fn bind_listener(config: &ServeConfig) -> Result<TcpListener, ShareError> {
    let addr = config.socket_addr();
    TcpListener::bind(addr)
        .await
        .map_err(|source| ShareError::Bind { addr, source })
}

/// Serve until `control` is stopped.
///
/// In-flight requests get [`SHUTDOWN_GRACE`] to finish after a stop. After
/// that `serve` returns anyway and connections still open are left to end
/// with the runtime. Returns the error a handler aborted with, or `Ok` for
/// a clean shutdown.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    control: ServerControl,
) -> Result<(), ShareError> {
    tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);

    let stop = control.clone();
    let graceful = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            stop.stopped().await;
            tracing::info!("HTTP server shutting down gracefully");
        })
        .into_future();

    let deadline = control.clone();
    tokio::select! {
        result = graceful => result?,
        _ = async move {
            deadline.stopped().await;
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        } => {
            tracing::warn!(
                "Connections still open after {:?}, dropping them",
                SHUTDOWN_GRACE
            );
        }
    }

    match control.take_fatal() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Serve `state` on an already bound listener, with request tracing when
/// `config.debug` is set
pub async fn run(
    listener: TcpListener,
    state: &TransferState,
    config: &ServeConfig,
    control: ServerControl,
) -> Result<(), ShareError> {
    let mut router = create_router(state, &control);
    if config.debug {
        router = router.layer(TraceLayer::new_for_http());
    }
    serve(listener, router, control).await
}
