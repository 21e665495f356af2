//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::{ServerConfig, StaticFilesConfig};

/// multipart 表单除文件外的额外开销
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
    body_limit: usize,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    ///
    /// `max_upload_bytes` 为样本音频上限，请求体上限在此基础上留出表单开销
    pub fn new(config: ServerConfig, state: AppState, max_upload_bytes: usize) -> Self {
        Self {
            config,
            state: Arc::new(state),
            body_limit: max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
        }
    }

    /// 构建 Router
    pub fn router(&self) -> Router {
        // CORS 配置 - 允许所有来源的跨域请求
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .expose_headers(Any)
            .max_age(std::time::Duration::from_secs(3600));

        with_static_files(create_routes(), &self.config.static_files)
            .layer(DefaultBodyLimit::max(self.body_limit))
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器
    pub async fn run(self) -> Result<(), std::io::Error> {
        let router = self.router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

/// 挂载静态页面
///
/// 挂在根路径时作为 fallback，不遮挡 /api
fn with_static_files(
    router: Router<Arc<AppState>>,
    config: &StaticFilesConfig,
) -> Router<Arc<AppState>> {
    if !config.enabled {
        return router;
    }

    info!(dir = %config.dir.display(), path = %config.path, "Serving static files");

    let service = ServeDir::new(&config.dir);
    if config.path.is_empty() || config.path == "/" {
        router.fallback_service(service)
    } else {
        router.nest_service(&config.path, service)
    }
}
