use std::sync::Arc;
use tracing::{debug, error};
use super::{Middleware, MiddlewareError, Request, Response};

/// 등록 순서대로 요청을, 역순으로 응답을 처리하는 미들웨어 체인
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new()
        }
    }

    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Arc::new(middleware));
    }

    pub fn add_boxed(&mut self, middleware: Box<dyn Middleware>) {
        self.middlewares.push(Arc::from(middleware));
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    pub async fn handle_request(&self, mut request: Request) -> Result<Request, MiddlewareError> {
        for middleware in &self.middlewares {
            debug!(middleware = middleware.name(), "요청 미들웨어 실행");
            request = middleware.handle_request(request).await.map_err(|e| {
                error!(middleware = middleware.name(), error = %e, "요청 미들웨어 실패");
                e
            })?;
        }
        Ok(request)
    }

    pub async fn handle_response(&self, mut response: Response) -> Result<Response, MiddlewareError> {
        // 응답은 역순으로 처리
        for middleware in self.middlewares.iter().rev() {
            debug!(middleware = middleware.name(), "응답 미들웨어 실행");
            response = middleware.handle_response(response).await.map_err(|e| {
                error!(middleware = middleware.name(), error = %e, "응답 미들웨어 실패");
                e
            })?;
        }
        Ok(response)
    }
}
