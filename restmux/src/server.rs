//! axum transport adapter with graceful shutdown
//!
//! Every request lands in a single fallback handler that buffers the body,
//! hands an [`InboundRequest`] to the [`Dispatcher`] on the blocking pool and
//! converts the reply back into an axum response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    response::Response,
    Router,
};
use bytes::Bytes;
use http::StatusCode;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    context::InboundRequest,
    dispatch::Dispatcher,
    error::Result,
    middleware::{request_id_layer, request_id_propagation_layer, sensitive_headers_layer},
    responses::{self, RestResponse},
};

#[derive(Clone)]
struct AdapterState {
    dispatcher: Arc<Dispatcher>,
    body_limit: usize,
}

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Router answering every path through `dispatcher`
    pub fn router(&self, dispatcher: Arc<Dispatcher>) -> Router {
        let request_id_header = dispatcher.request_id_header().clone();
        let api_key_header = dispatcher.api_key_header().clone();
        let state = AdapterState {
            dispatcher,
            body_limit: self.config.dispatch.body_limit_bytes,
        };

        let router = Router::new()
            .fallback(dispatch_request)
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.service.timeout(),
            ))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(sensitive_headers_layer(&api_key_header));

        let router = if self.config.dispatch.generate_request_id {
            router
                .layer(request_id_propagation_layer(request_id_header.clone()))
                .layer(request_id_layer(request_id_header))
        } else {
            router
        };

        router.layer(CatchPanicLayer::new())
    }

    /// Bind `0.0.0.0:{port}` and serve until SIGINT or SIGTERM
    pub async fn serve(self, dispatcher: Arc<Dispatcher>) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));
        let app = self.router(dispatcher);

        tracing::info!(
            service = %self.config.service.name,
            cors = self.config.dispatch.cors_enabled,
            api_keys = self.config.api_keys.enabled,
            generate_request_id = self.config.dispatch.generate_request_id,
            body_limit_bytes = self.config.dispatch.body_limit_bytes,
            timeout_secs = self.config.service.timeout_secs,
            "Starting server on {}",
            addr
        );

        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn dispatch_request(State(state): State<AdapterState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.body_limit).await {
        Ok(body) => body,
        Err(e) => {
            tracing::info!(
                method = %parts.method,
                path = %parts.uri,
                error = %e,
                "Rejecting unreadable request body"
            );
            let request = InboundRequest::from_parts(parts, Bytes::new());
            return into_axum(state.dispatcher.reject(&request, responses::bad_request()));
        }
    };

    let request = InboundRequest::from_parts(parts, body);
    let dispatcher = Arc::clone(&state.dispatcher);
    match tokio::task::spawn_blocking(move || dispatcher.dispatch(&request)).await {
        Ok(reply) => {
            if reply.continue_response.is_some() {
                // hyper sends the interim response when the body is first polled
                tracing::trace!("100-continue acknowledged by transport");
            }
            into_axum(reply.response)
        }
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            state.dispatcher.state().record_hidden_error();
            into_axum(responses::internal_error())
        }
    }
}

fn into_axum(response: RestResponse) -> Response {
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::from(body))
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}
