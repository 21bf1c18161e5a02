use std::net::SocketAddr;
use async_trait::async_trait;
use hyper::{header, Request, Response, StatusCode, Uri};
use hyper::body::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, error, instrument};
use crate::middleware::Body;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("업스트림 요청 생성 실패: {0}")]
    Build(#[from] hyper::http::Error),

    #[error("업스트림 요청 실패: {0}")]
    Request(#[from] legacy::Error),

    #[error("업스트림 응답 본문 수집 실패: {0}")]
    Body(#[from] hyper::Error),
}

/// 미들웨어 체인 다음에 요청을 처리하는 하위 핸들러
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn forward(&self, req: Request<Body>) -> Result<Response<Body>, ProxyError>;

    /// 접근 로그에 남길 업스트림 주소
    fn address(&self) -> Option<SocketAddr> {
        None
    }
}

/// 단일 업스트림으로 요청을 전달하는 HTTP 클라이언트
#[derive(Clone)]
pub struct HttpUpstream {
    address: SocketAddr,
    client: legacy::Client<HttpConnector, Body>,
}

impl HttpUpstream {
    pub fn new(address: SocketAddr) -> Self {
        let connector = HttpConnector::new();
        let client = legacy::Client::builder(TokioExecutor::new())
            .build::<_, Body>(connector);

        Self { address, client }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    #[instrument(skip(self, req), fields(upstream = %self.address))]
    async fn forward(&self, req: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let proxied_req = build_proxied_request(self.address, req)?;
        let res = self.client.request(proxied_req).await?;

        let (parts, body) = res.into_parts();
        let bytes = body.collect().await?.to_bytes();
        debug!(status = %parts.status, bytes_size = bytes.len(), "업스트림 응답 수신");
        Ok(Response::from_parts(parts, Full::new(bytes)))
    }

    fn address(&self) -> Option<SocketAddr> {
        Some(self.address)
    }
}

/// 요청 URI 를 업스트림 주소로 바꿉니다. 경로와 쿼리는 유지됩니다.
pub fn build_proxied_request(
    address: SocketAddr,
    req: Request<Body>,
) -> Result<Request<Body>, hyper::http::Error> {
    let path_and_query = req.uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let uri: Uri = format!("http://{}{}", address, path_and_query).parse()?;

    let (parts, body) = req.into_parts();
    let mut builder = Request::builder()
        .method(parts.method)
        .uri(uri)
        .version(parts.version);

    if let Some(headers) = builder.headers_mut() {
        *headers = parts.headers;
        match address.to_string().parse() {
            Ok(host) => {
                headers.insert(header::HOST, host);
            }
            Err(e) => error!(error = %e, "Host 헤더 생성 실패"),
        }
    }

    builder.body(body)
}

pub fn error_response(err: &ProxyError) -> Response<Body> {
    build_error_response(StatusCode::BAD_GATEWAY, err.to_string())
}

fn build_error_response(status: StatusCode, message: String) -> Response<Body> {
    let mut response = Response::new(Full::new(Bytes::from(message)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
