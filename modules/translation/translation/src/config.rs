//! Configuration of the translation module.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_HTTP_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
const DEFAULT_GRPC_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 50051));

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_metrics_prefix() -> String {
    "translation".to_owned()
}

fn default_max_in_flight() -> usize {
    64
}

/// Module configuration, read from `modules.translation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationConfig {
    /// Upper bound for one use-case call, in milliseconds.
    pub request_timeout_ms: u64,
    pub http: HttpConfig,
    pub grpc: GrpcConfig,
    pub rpc: RpcConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            http: HttpConfig::default(),
            grpc: GrpcConfig::default(),
            rpc: RpcConfig::default(),
        }
    }
}

impl TranslationConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// HTTP adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub bind_addr: String,
    /// Expose `GET /metrics` and collect request metrics.
    pub metrics_enabled: bool,
    pub metrics_prefix: String,
    /// Expose the `OpenAPI` document and Swagger UI under `/swagger`.
    pub swagger_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_HTTP_ADDR.to_string(),
            metrics_enabled: false,
            metrics_prefix: default_metrics_prefix(),
            swagger_enabled: false,
        }
    }
}

/// gRPC adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrpcConfig {
    pub listen_addr: String,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_GRPC_ADDR.to_string(),
        }
    }
}

/// AMQP-RPC dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RpcConfig {
    /// Maximum number of calls handled concurrently.
    pub max_in_flight: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
        }
    }
}
