//! Module wiring: one use case, one validator, three adapters.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use translation_sdk::TranslationClient;

use crate::api::amqp_rpc::{self, RouteError, RpcRoutes, RpcServer};
use crate::api::{Invoker, grpc, rest};
use crate::config::TranslationConfig;
use crate::validation::Validator;

pub struct TranslationModule {
    config: TranslationConfig,
    invoker: Arc<Invoker>,
}

impl TranslationModule {
    /// Bind `client` to every adapter. Contexts of in-flight calls are
    /// children of `shutdown`.
    #[must_use]
    pub fn new(
        config: TranslationConfig,
        client: Arc<dyn TranslationClient>,
        shutdown: CancellationToken,
    ) -> Self {
        let invoker = Invoker::new(client, Validator::new(), config.request_timeout())
            .with_shutdown(shutdown);
        Self {
            config,
            invoker: Arc::new(invoker),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    #[must_use]
    pub fn invoker(&self) -> Arc<Invoker> {
        Arc::clone(&self.invoker)
    }

    #[must_use]
    pub fn http_router(&self) -> Router {
        rest::build_router(&self.config.http, self.invoker())
    }

    /// # Errors
    /// Returns an error if the reflection service cannot be built.
    pub fn grpc_routes(&self) -> anyhow::Result<tonic::service::Routes> {
        grpc::build_routes(self.invoker())
    }

    /// # Errors
    /// Returns [`RouteError::Duplicate`] if two handlers claim the same method.
    pub fn rpc_routes(&self) -> Result<RpcRoutes, RouteError> {
        amqp_rpc::build_routes(&self.invoker)
    }

    /// # Errors
    /// Returns [`RouteError::Duplicate`] if two handlers claim the same method.
    pub fn rpc_server(&self) -> Result<RpcServer, RouteError> {
        Ok(RpcServer::new(self.rpc_routes()?, &self.config.rpc))
    }

    /// Bind `http.bind_addr` and serve until cancelled.
    ///
    /// # Errors
    /// Returns an error if the address is invalid, cannot be bound, or the server fails.
    pub async fn serve_http(&self, cancel: CancellationToken) -> anyhow::Result<()> {
        let addr = parse_addr(&self.config.http.bind_addr)?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind HTTP server on {addr}"))?;
        self.serve_http_on(listener, cancel).await
    }

    /// Serve HTTP on an already bound listener until cancelled.
    ///
    /// # Errors
    /// Returns an error if the server fails.
    pub async fn serve_http_on(
        &self,
        listener: TcpListener,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let router = self.http_router();
        tracing::info!(addr = %listener.local_addr()?, "HTTP server bound");

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }

    /// Bind `grpc.listen_addr` and serve until cancelled.
    ///
    /// # Errors
    /// Returns an error if the address is invalid, cannot be bound, or the server fails.
    pub async fn serve_grpc(&self, cancel: CancellationToken) -> anyhow::Result<()> {
        let addr = parse_addr(&self.config.grpc.listen_addr)?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind gRPC server on {addr}"))?;
        self.serve_grpc_on(listener, cancel).await
    }

    /// Serve gRPC on an already bound listener until cancelled.
    ///
    /// # Errors
    /// Returns an error if the routes cannot be built or the server fails.
    pub async fn serve_grpc_on(
        &self,
        listener: TcpListener,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let routes = self.grpc_routes()?;
        tracing::info!(addr = %listener.local_addr()?, "gRPC server bound");

        let incoming = TcpListenerStream::new(listener);
        Server::builder()
            .trace_fn(|req| tracing::info_span!("grpc_request", path = %req.uri().path()))
            .add_routes(routes)
            .serve_with_incoming_shutdown(incoming, async move {
                cancel.cancelled().await;
                tracing::info!("gRPC server shutting down gracefully (cancellation)");
            })
            .await?;
        Ok(())
    }
}

fn parse_addr(addr: &str) -> anyhow::Result<SocketAddr> {
    addr.parse()
        .with_context(|| format!("invalid listen address '{addr}'"))
}
