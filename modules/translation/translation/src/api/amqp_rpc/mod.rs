//! AMQP-RPC adapter: method-name routing over a message queue.

pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod server;

pub use error::{RpcError, RpcErrorCode};
pub use router::build_routes;
pub use routes::{CallFuture, CallHandler, RouteError, RpcCall, RpcRoutes, RpcRoutesBuilder};
pub use server::{Delivery, ReplyStatus, RpcReply, RpcServer};
