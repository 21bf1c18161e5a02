use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use hyper::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use crate::{
    logging::{log_request, RequestLog},
    middleware::{self, handle_middleware_error, Body, MiddlewareManager, ResponseHooks},
    proxy::{self, Upstream},
};
use tracing::{debug, error};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use uuid::Uuid;

pub struct RequestHandler {
    middleware_manager: MiddlewareManager,
    upstream: Arc<dyn Upstream>,
}

impl RequestHandler {
    pub fn new(
        middleware_manager: MiddlewareManager,
        upstream: Arc<dyn Upstream>,
    ) -> Self {
        Self {
            middleware_manager,
            upstream,
        }
    }

    pub async fn handle_request(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Body>, Infallible> {
        let start_time = Instant::now();
        let mut log = RequestLog::new(Uuid::new_v4().to_string());
        log.with_request(&req);
        if let Some(addr) = self.upstream.address() {
            log.with_upstream(addr);
        }

        let (parts, body) = req.into_parts();
        let response = match body.collect().await {
            Ok(collected) => {
                let req = Request::from_parts(parts, Full::new(collected.to_bytes()));
                self.dispatch(req).await
            }
            Err(e) => {
                log.with_error(&e);
                Response::builder()
                    .status(StatusCode::BAD_REQUEST)
                    .body(Full::new(Bytes::from(format!("Failed to read request body: {}", e))))
                    .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Bad Request"))))
            }
        };

        log.with_response(&response);
        log.duration_ms = duration_ms(start_time.elapsed());
        log_request(&log);

        Ok(response)
    }

    /// 미들웨어 체인과 업스트림을 거쳐 최종 응답을 만듭니다.
    ///
    /// 응답 시작 훅은 응답이 어떤 경로로 만들어졌든 반환 직전에 한 번 실행됩니다.
    pub async fn dispatch(&self, mut req: middleware::Request) -> middleware::Response {
        let hooks = ResponseHooks::attach(&mut req);
        let mut response = self.process(req).await;

        let fired = hooks.fire(response.headers_mut());
        debug!(callbacks = fired, "응답 헤더 확정");
        response
    }

    async fn process(&self, req: middleware::Request) -> middleware::Response {
        // 1. 요청 미들웨어 처리
        let req = match self.middleware_manager.handle_request(req).await {
            Ok(req) => req,
            Err(e) => {
                error!(error = %e, "요청 미들웨어 처리 실패");
                return handle_middleware_error(e);
            }
        };

        // 2. 업스트림 요청
        let response = match self.upstream.forward(req).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "업스트림 요청 실패");
                return proxy::error_response(&e);
            }
        };

        // 3. 응답 미들웨어 처리
        match self.middleware_manager.handle_response(response).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "응답 미들웨어 처리 실패");
                handle_middleware_error(e)
            }
        }
    }

    pub async fn handle_connection<I>(self: Arc<Self>, io: I) -> std::result::Result<(), hyper::Error>
    where
        I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
    {
        http1::Builder::new()
            .serve_connection(
                io,
                service_fn(move |req| {
                    let handler = self.clone();
                    async move { handler.handle_request(req).await }
                }),
            )
            .await
    }
}

/// 경과 시간을 밀리초로 바꿉니다. `u64` 를 넘으면 최댓값으로 고정합니다.
fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_ms_saturates() {
        assert_eq!(duration_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }
}
