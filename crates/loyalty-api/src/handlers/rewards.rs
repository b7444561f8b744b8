//! 奖品与兑换 API 处理器
//!
//! 实现奖品目录、兑换发起/核销/查询的 HTTP 接口

use axum::{
    Json,
    extract::{Query, State},
};
use validator::Validate;

use loyalty_core::service::dto::{
    ConfirmResponse, RedeemResponse, RedemptionDto, RewardDto,
};

use crate::{
    dto::{ApiResponse, CatalogQuery, ConfirmRequest, HistoryQuery, RedeemRequest, StatusQuery},
    error::Result,
    state::AppState,
};

/// 查询奖品目录
///
/// GET /api/v1/rewards?customerRef=...
///
/// 只返回上架且在时间窗口内的奖品；指定会员时附带 affordable 标记。
pub async fn list_rewards(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<Vec<RewardDto>>>> {
    let rewards = state
        .query_service
        .list_catalog(query.customer_ref.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(rewards)))
}

/// 发起兑换
///
/// POST /api/v1/rewards/redeem
///
/// 校验通过后创建 PENDING 兑换并返回兑换码，此阶段不扣积分。
pub async fn redeem(
    State(state): State<AppState>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<ApiResponse<RedeemResponse>>> {
    req.validate()?;

    let response = state
        .redemption_service
        .request_redemption(&req.customer_ref, req.reward_id)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "兑换发起成功，请到店出示兑换码",
    )))
}

/// 核销兑换码
///
/// POST /api/v1/rewards/confirm
///
/// 店员操作。在单个事务内完成积分扣减、流水追加、库存扣减与通知。
pub async fn confirm(
    State(state): State<AppState>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<ApiResponse<ConfirmResponse>>> {
    req.validate()?;

    let response = state.redemption_service.confirm(&req.code).await?;

    Ok(Json(ApiResponse::success_with_message(response, "核销成功")))
}

/// 查询单条兑换状态
///
/// GET /api/v1/rewards/status?id=...
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ApiResponse<RedemptionDto>>> {
    let redemption = state.redemption_service.get_status(query.id).await?;

    Ok(Json(ApiResponse::success(redemption)))
}

/// 查询会员兑换历史
///
/// GET /api/v1/rewards/history?customerRef=...&limit=...
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<RedemptionDto>>>> {
    let history = state
        .redemption_service
        .get_history(&query.customer_ref, query.limit.unwrap_or(20))
        .await?;

    Ok(Json(ApiResponse::success(history)))
}
