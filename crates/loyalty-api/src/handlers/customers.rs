//! 会员查询 API 处理器
//!
//! 余额、积分流水与通知的只读接口

use axum::{
    Json,
    extract::{Path, Query, State},
};

use loyalty_core::models::{Notification, PointTransaction};
use loyalty_core::service::dto::BalanceDto;

use crate::{
    dto::{ApiResponse, LimitQuery},
    error::Result,
    state::AppState,
};

/// 查询会员余额
///
/// GET /api/v1/customers/{ref}/balance
pub async fn get_balance(
    State(state): State<AppState>,
    Path(external_ref): Path<String>,
) -> Result<Json<ApiResponse<BalanceDto>>> {
    let balance = state.query_service.get_balance(&external_ref).await?;

    Ok(Json(ApiResponse::success(balance)))
}

/// 查询会员积分流水
///
/// GET /api/v1/customers/{ref}/transactions?limit=...
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(external_ref): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<PointTransaction>>>> {
    let transactions = state
        .query_service
        .list_transactions(&external_ref, query.limit_or_default())
        .await?;

    Ok(Json(ApiResponse::success(transactions)))
}

/// 查询会员通知
///
/// GET /api/v1/customers/{ref}/notifications?limit=...
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(external_ref): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<Notification>>>> {
    let notifications = state
        .query_service
        .list_notifications(&external_ref, query.limit_or_default())
        .await?;

    Ok(Json(ApiResponse::success(notifications)))
}
