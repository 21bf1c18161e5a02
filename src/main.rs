use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use xhtml_content_type::{
    logging::init_logging,
    middleware::MiddlewareManager,
    proxy::HttpUpstream,
    server::{self, RequestHandler, ServerListener},
    settings::Settings,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // 로깅 초기화 전에 실패할 수 있으므로 stderr 에도 남깁니다.
            eprintln!("서버 실행 실패: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> server::Result<()> {
    let settings = Settings::load()?;
    let _guard = init_logging(&settings.logging)?;

    let middleware_manager = MiddlewareManager::new(&settings.middlewares);
    info!(
        middlewares = ?middleware_manager.chain().names(),
        upstream = %settings.upstream.address,
        "미들웨어 체인 구성 완료"
    );

    let upstream = Arc::new(HttpUpstream::new(settings.upstream.address));
    let handler = Arc::new(RequestHandler::new(middleware_manager, upstream));
    let listener = ServerListener::bind(settings.server.socket_addr()).await?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "종료 신호 대기 실패");
            std::future::pending::<()>().await;
        }
    };

    listener.run_until(handler, shutdown).await?;
    info!("서버 종료");
    Ok(())
}
