use std::collections::HashMap;
use async_trait::async_trait;
use hyper::header::{HeaderValue, ACCEPT};
use tracing::{debug, instrument};
use crate::middleware::{Middleware, MiddlewareError, Request, Response, ResponseHooks};
use super::negotiate::{parse_accept_values, rewrite_content_type};

/// 응답 헤더 전송 직전에 Content-Type 협상을 수행하도록 콜백을 등록합니다.
///
/// 호출 시점에는 응답 헤더를 읽거나 쓰지 않습니다. 요청의 `Accept` 값은
/// 교환이 끝날 때까지 바뀌지 않으므로 콜백에 복사해 둡니다.
pub fn register_content_type_rewrite<B>(req: &hyper::Request<B>, hooks: &ResponseHooks) {
    let accept: Vec<HeaderValue> = req.headers().get_all(ACCEPT).iter().cloned().collect();

    hooks.on_starting(move |headers| {
        let accept = parse_accept_values(&accept);
        rewrite_content_type(headers, &accept);
    });
}

/// XHTML Content-Type 협상 미들웨어
///
/// 요청 단계에서 콜백만 등록하고 요청은 그대로 다음 단계로 넘깁니다.
#[derive(Debug, Default, Clone)]
pub struct XhtmlContentTypeMiddleware;

impl XhtmlContentTypeMiddleware {
    pub const NAME: &'static str = "xhtml-content-type";

    pub fn new() -> Self {
        Self
    }

    /// 미들웨어 설정으로부터 생성합니다. 이 미들웨어는 설정 항목이 없습니다.
    pub fn from_settings(settings: &HashMap<String, serde_json::Value>) -> Result<Self, MiddlewareError> {
        if let Some(key) = settings.keys().next() {
            return Err(MiddlewareError::Config(format!(
                "{} 미들웨어는 설정을 지원하지 않습니다: {}",
                Self::NAME, key
            )));
        }
        Ok(Self::new())
    }
}

#[async_trait]
impl Middleware for XhtmlContentTypeMiddleware {
    fn name(&self) -> &str {
        Self::NAME
    }

    #[instrument(skip(self, req), fields(path = %req.uri().path()))]
    async fn handle_request(&self, mut req: Request) -> Result<Request, MiddlewareError> {
        let hooks = ResponseHooks::attach(&mut req);
        register_content_type_rewrite(&req, &hooks);
        debug!("Content-Type 협상 콜백 등록");
        Ok(req)
    }

    async fn handle_response(&self, res: Response) -> Result<Response, MiddlewareError> {
        Ok(res)
    }
}
