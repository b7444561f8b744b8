//! 积分 API 处理器

use axum::{Json, extract::State};
use validator::Validate;

use loyalty_core::service::dto::EarnResponse;

use crate::{
    dto::{ApiResponse, EarnRequest},
    error::Result,
    state::AppState,
};

/// 积分入账
///
/// POST /api/v1/points/earn
///
/// 消费后由商家侧触发，余额增加与 EARN 流水在同一事务写入。
pub async fn earn(
    State(state): State<AppState>,
    Json(req): Json<EarnRequest>,
) -> Result<Json<ApiResponse<EarnResponse>>> {
    req.validate()?;

    let response = state
        .points_service
        .earn(&req.customer_ref, req.amount, req.description.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(response)))
}
