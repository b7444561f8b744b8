//! 服务层数据传输对象

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{RedemptionStatus, image_display};
use crate::repository::RedemptionHistoryRow;

/// 发起兑换响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub redemption_id: i64,
    /// 到店出示的兑换码
    pub code: String,
    pub reward_name: String,
    pub points_required: i64,
    pub status: RedemptionStatus,
}

/// 核销响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub redemption_id: i64,
    pub code: String,
    pub reward_name: String,
    /// 本次实际扣减的积分（发起时的快照值）
    pub points_spent: i64,
    /// 扣减后的会员余额
    pub balance_after: i64,
    pub confirmed_at: DateTime<Utc>,
}

/// 兑换状态/历史条目
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionDto {
    pub redemption_id: i64,
    pub code: String,
    pub reward_id: i64,
    pub reward_name: String,
    pub reward_image: Option<String>,
    pub points_spent: i64,
    pub status: RedemptionStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<RedemptionHistoryRow> for RedemptionDto {
    fn from(row: RedemptionHistoryRow) -> Self {
        let reward_image = image_display(
            row.image_url.as_deref(),
            row.image_data.as_deref(),
            row.image_mime.as_deref(),
        );
        Self {
            redemption_id: row.id,
            code: row.code,
            reward_id: row.reward_id,
            reward_name: row.reward_name,
            reward_image,
            points_spent: row.points_spent,
            status: row.status,
            confirmed_at: row.confirmed_at,
            created_at: row.created_at,
        }
    }
}

/// 会员余额
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDto {
    pub customer_id: i64,
    pub external_ref: String,
    pub name: String,
    pub points: i64,
    pub level: String,
}

/// 奖品目录条目
///
/// 携带相对查询会员余额的 `affordable` 标记，会员未知时为 None。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub quantity: Option<i64>,
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affordable: Option<bool>,
}

/// 积分获得响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnResponse {
    pub transaction_id: i64,
    pub customer_id: i64,
    pub amount: i64,
    pub balance_after: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redemption_dto_from_row() {
        let row = RedemptionHistoryRow {
            id: 9,
            code: "AB12CD34".to_string(),
            points_spent: 120,
            status: RedemptionStatus::Completed,
            confirmed_at: Some(Utc::now()),
            created_at: Utc::now(),
            reward_id: 3,
            reward_name: "Trà sữa".to_string(),
            image_url: None,
            image_data: Some(b"img".to_vec()),
            image_mime: Some("image/jpeg".to_string()),
        };

        let dto = RedemptionDto::from(row);
        assert_eq!(dto.redemption_id, 9);
        assert_eq!(dto.reward_name, "Trà sữa");
        assert!(dto.reward_image.unwrap().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_reward_dto_affordable_omitted_when_unknown() {
        let dto = RewardDto {
            id: 1,
            name: "Cà phê".to_string(),
            description: None,
            points_required: 100,
            quantity: Some(5),
            image: None,
            affordable: None,
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("affordable").is_none());
        assert_eq!(json["pointsRequired"], 100);
    }
}
