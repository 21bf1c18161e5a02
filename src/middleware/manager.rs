use tracing::{debug, error, info};
use super::xhtml::XhtmlContentTypeMiddleware;
use super::{Middleware, MiddlewareChain, MiddlewareConfig, MiddlewareError, MiddlewareType, Request, Response};
use std::collections::HashMap;

/// 미들웨어 설정으로부터 미들웨어 인스턴스를 생성합니다.
fn create_middleware(config: &MiddlewareConfig) -> Result<Box<dyn Middleware>, MiddlewareError> {
    debug!("미들웨어 생성 시작: type={:?}, settings={:?}", config.middleware_type, config.settings);

    match config.middleware_type {
        MiddlewareType::XhtmlContentType => {
            Ok(Box::new(XhtmlContentTypeMiddleware::from_settings(&config.settings)?))
        }
    }
}

/// 활성화된 설정만 `order` 순(같으면 이름순)으로 체인에 넣습니다.
fn build_chain(configs: &HashMap<String, MiddlewareConfig>) -> MiddlewareChain {
    let mut chain = MiddlewareChain::new();

    // 정렬을 위해 Vec으로 변환 (같은 순서면 이름순)
    let mut ordered_configs: Vec<_> = configs.iter()
        .filter(|(_, config)| config.enabled)
        .collect();
    ordered_configs.sort_by(|(a_name, a), (b_name, b)| {
        a.order.cmp(&b.order).then_with(|| a_name.cmp(b_name))
    });

    // 미들웨어 생성 및 체인에 추가
    for (name, config) in ordered_configs {
        match create_middleware(config) {
            Ok(middleware) => {
                info!(name = %name, middleware = middleware.name(), order = config.order, "미들웨어 등록");
                chain.add_boxed(middleware);
            }
            Err(e) => {
                error!(name = %name, error = %e, "미들웨어 생성 실패");
                continue;
            }
        }
    }

    chain
}

#[derive(Default, Clone)]
pub struct MiddlewareManager {
    chain: MiddlewareChain,
}

impl MiddlewareManager {
    pub fn new(middleware_configs: &HashMap<String, MiddlewareConfig>) -> Self {
        Self { chain: build_chain(middleware_configs) }
    }

    pub fn with_chain(chain: MiddlewareChain) -> Self {
        Self { chain }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn chain(&self) -> &MiddlewareChain {
        &self.chain
    }

    pub async fn handle_request(&self, req: Request) -> Result<Request, MiddlewareError> {
        self.chain.handle_request(req).await
    }

    pub async fn handle_response(&self, res: Response) -> Result<Response, MiddlewareError> {
        self.chain.handle_response(res).await
    }
}
