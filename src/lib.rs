//! XHTML Content-Type 협상 미들웨어와 이를 실행하는 경량 리버스 프록시입니다.
//!
//! # 주요 기능
//!
//! - `text/html` 응답을 클라이언트의 `Accept` 헤더에 따라
//!   `application/xhtml+xml` 또는 `application/xml` 로 변경
//! - 응답 헤더 전송 직전에 실행되는 응답 시작 훅
//! - 설정 기반 미들웨어 체인
//!
//! # 예제
//!
//! ```
//! use xhtml_content_type::middleware::{register_content_type_rewrite, ResponseHooks};
//! use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
//!
//! let req = hyper::Request::builder()
//!     .header("accept", "application/xhtml+xml, text/html")
//!     .body(())
//!     .unwrap();
//!
//! let hooks = ResponseHooks::new();
//! register_content_type_rewrite(&req, &hooks);
//!
//! // 호스트가 헤더 전송 직전에 훅을 실행합니다.
//! let mut headers = HeaderMap::new();
//! headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
//! hooks.fire(&mut headers);
//!
//! assert_eq!(headers[CONTENT_TYPE], "application/xhtml+xml; charset=utf-8");
//! ```
//!
//! # 미들웨어 체인
//!
//! ```
//! use std::collections::HashMap;
//! use xhtml_content_type::middleware::{MiddlewareConfig, MiddlewareManager, MiddlewareType};
//!
//! let mut configs = HashMap::new();
//! configs.insert(
//!     "xhtml".to_string(),
//!     MiddlewareConfig::new(MiddlewareType::XhtmlContentType),
//! );
//!
//! let manager = MiddlewareManager::new(&configs);
//! assert_eq!(manager.len(), 1);
//! ```

pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod server;
pub mod settings;
