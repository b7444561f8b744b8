//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// 构建 /api/v1 下的业务路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 奖品与兑换
        .route("/rewards", get(handlers::rewards::list_rewards))
        .route("/rewards/redeem", post(handlers::rewards::redeem))
        .route("/rewards/confirm", post(handlers::rewards::confirm))
        .route("/rewards/status", get(handlers::rewards::get_status))
        .route("/rewards/history", get(handlers::rewards::get_history))
        // 积分
        .route("/points/earn", post(handlers::points::earn))
        // 会员查询
        .route(
            "/customers/{ref}/balance",
            get(handlers::customers::get_balance),
        )
        .route(
            "/customers/{ref}/transactions",
            get(handlers::customers::list_transactions),
        )
        .route(
            "/customers/{ref}/notifications",
            get(handlers::customers::list_notifications),
        )
}
