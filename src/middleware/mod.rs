//! HTTP 요청/응답 미들웨어
//!
//! 미들웨어 체인과 응답 시작 훅, 그리고 XHTML Content-Type 협상
//! 미들웨어를 제공합니다.

use bytes::Bytes;
use http_body_util::Full;

pub mod chain;
pub mod config;
pub mod error;
pub mod hooks;
pub mod manager;
pub mod response;
pub mod traits;
pub mod xhtml;

/// 미들웨어가 다루는 본문 타입. 본문은 체인에 들어오기 전에 모두 수집됩니다.
pub type Body = Full<Bytes>;
pub type Request = hyper::Request<Body>;
pub type Response = hyper::Response<Body>;

pub use chain::MiddlewareChain;
pub use config::{MiddlewareConfig, MiddlewareType};
pub use error::MiddlewareError;
pub use hooks::ResponseHooks;
pub use manager::MiddlewareManager;
pub use response::handle_middleware_error;
pub use traits::Middleware;
pub use xhtml::{register_content_type_rewrite, XhtmlContentTypeMiddleware};
