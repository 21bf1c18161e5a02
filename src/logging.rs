use std::path::Path;
use tracing::{info, warn, error, Level, span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};
use crate::settings::{LogFormat, LogOutput, LogSettings, SettingsError};

/// 로깅 설정에 따라 전역 subscriber 를 초기화합니다.
///
/// 파일 출력일 때 반환되는 guard 는 프로세스가 끝날 때까지 유지해야
/// 버퍼에 남은 로그가 기록됩니다.
pub fn init_logging(settings: &LogSettings) -> Result<Option<WorkerGuard>, SettingsError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(settings.level).into())
        .from_env_lossy();

    let (writer, guard) = match &settings.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let directory = path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().ok_or_else(|| SettingsError::InvalidConfig(
                format!("로그 파일 경로가 올바르지 않습니다: {}", path.display())
            ))?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name))
        }
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let result = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if let Err(e) = result {
        // 테스트 등에서 이미 초기화된 경우
        warn!(error = %e, "로깅이 이미 초기화되어 있습니다");
        return Ok(None);
    }

    Ok(Some(guard))
}

#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub host: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub upstream_address: Option<String>,
    pub content_type: Option<String>,
    pub error: Option<String>,
}

impl RequestLog {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            method: String::new(),
            path: String::new(),
            host: String::new(),
            status_code: 0,
            duration_ms: 0,
            upstream_address: None,
            content_type: None,
            error: None,
        }
    }

    pub fn with_request<B>(&mut self, req: &hyper::Request<B>) {
        self.method = req.method().to_string();
        self.path = req.uri().path().to_string();
        if let Some(host) = req.headers().get(hyper::header::HOST) {
            self.host = host.to_str().unwrap_or_default().to_string();
        }

        info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            host = %self.host,
            "Received request"
        );
    }

    /// 최종 응답의 상태와 Content-Type 을 기록합니다.
    pub fn with_response<B>(&mut self, res: &hyper::Response<B>) {
        self.status_code = res.status().as_u16();
        self.content_type = res.headers()
            .get(hyper::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
    }

    pub fn with_upstream(&mut self, addr: std::net::SocketAddr) {
        self.upstream_address = Some(addr.to_string());
    }

    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        let error_msg = error.to_string();
        error!(
            request_id = %self.request_id,
            error = %error_msg,
            "Request error occurred"
        );
        self.error = Some(error_msg);
    }
}

pub fn log_request(log: &RequestLog) {
    let level = if log.error.is_some() {
        Level::ERROR
    } else if log.status_code >= 400 {
        Level::WARN
    } else {
        Level::INFO
    };

    let span = span!(
        Level::INFO,
        "request",
        request_id = %log.request_id,
        method = %log.method,
        path = %log.path,
        host = %log.host,
        status = %log.status_code,
        duration_ms = %log.duration_ms
    );
    let _enter = span.enter();

    match level {
        Level::ERROR => error!(
            upstream = ?log.upstream_address,
            error = ?log.error,
            "Request failed"
        ),
        Level::WARN => warn!(
            upstream = ?log.upstream_address,
            content_type = ?log.content_type,
            "Request completed with warning"
        ),
        _ => info!(
            upstream = ?log.upstream_address,
            content_type = ?log.content_type,
            "Request completed successfully"
        ),
    }
}
