//! XHTML Content-Type 협상 미들웨어
//!
//! `text/html` 응답을 클라이언트의 `Accept` 헤더에 따라
//! `application/xhtml+xml` 또는 `application/xml` 로 바꿉니다.
//! 본문은 건드리지 않으며, HTML 본문이 올바른 XML 이라고 가정합니다.

mod middleware;
mod negotiate;

pub use middleware::{register_content_type_rewrite, XhtmlContentTypeMiddleware};
pub use negotiate::{
    negotiate_media_type, parse_accept, parse_accept_values, rewrite_content_type,
    APPLICATION_XHTML_XML, APPLICATION_XML, TEXT_HTML,
};
