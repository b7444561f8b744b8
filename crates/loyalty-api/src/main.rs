//! 积分兑换 REST API 服务入口
//!
//! 加载配置、初始化基础设施、启动过期 Worker，然后提供 HTTP 服务。

use axum::{Json, Router, http::HeaderValue, routing::get};
use loyalty_api::{routes, state::AppState, worker::ExpiryWorker};
use loyalty_core::service::RedemptionSettings;
use loyalty_shared::{config::AppConfig, database::Database, logging};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：config/default.toml + config/{env}.toml + LOYALTY_ 环境变量
    let config = AppConfig::load("loyalty-api").unwrap_or_default();

    logging::init(&config.logging)?;

    info!("Starting loyalty-api on {}", config.server_addr());

    let db = Database::connect(&config.database).await?;
    db.run_migrations().await?;

    let settings = RedemptionSettings {
        code_max_attempts: config.redemption.code_max_attempts,
        pending_ttl_minutes: config.redemption.pending_ttl_minutes,
    };
    let state = AppState::new(db.pool().clone(), settings);

    // 启动兑换过期后台 Worker
    // 在 state 被 move 到 Router 之前克隆服务句柄
    let expiry_service = state.redemption_service.clone();
    let sweep_interval = config.redemption.sweep_interval_seconds;
    let sweep_batch = config.redemption.sweep_batch_size;
    tokio::spawn(async move {
        let worker = ExpiryWorker::new(expiry_service, sweep_interval, sweep_batch);
        worker.run().await;
    });

    // CORS 配置：通过 LOYALTY_CORS_ORIGINS 环境变量控制允许的来源
    // 默认允许本地开发地址，生产环境应设置为实际域名
    let allowed_origins = std::env::var("LOYALTY_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

    let cors = if allowed_origins == "*" {
        if config.is_production() {
            warn!("LOYALTY_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .nest("/api/v1", routes::api_routes())
        .route("/health", get(health_check))
        .route(
            "/ready",
            get({
                let db_for_ready = db;
                move || readiness_check(db_for_ready.clone())
            }),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 优雅关闭：收到 SIGTERM（K8s 停止 Pod）或 Ctrl+C 时，
    // 停止接收新连接并等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
///
/// K8s 通过 SIGTERM 通知 Pod 停止；本地开发通过 Ctrl+C。
/// 收到任一信号后返回，触发 axum 的优雅关闭流程。
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("注册 Ctrl+C 处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("注册 SIGTERM 处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// 存活探针：服务进程正常即返回 ok
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "loyalty-api"
    }))
}

/// 就绪探针：检查数据库连接是否可用
///
/// K8s 就绪探针失败时会将 Pod 从 Service 端点移除，
/// 避免将流量路由到无法正常处理请求的实例。
async fn readiness_check(db: Database) -> Json<serde_json::Value> {
    let db_ok = db.health_check().await.is_ok();

    Json(serde_json::json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "service": "loyalty-api",
        "checks": {
            "database": if db_ok { "ok" } else { "fail" }
        }
    }))
}
