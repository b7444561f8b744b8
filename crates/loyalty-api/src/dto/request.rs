//! API 请求 DTO 定义

use serde::Deserialize;
use validator::Validate;

/// 发起兑换请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    #[validate(length(min = 1, max = 64, message = "会员标识长度必须在1-64个字符之间"))]
    pub customer_ref: String,
    #[validate(range(min = 1, message = "奖品 ID 必须大于0"))]
    pub reward_id: i64,
}

/// 核销兑换码请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    #[validate(length(min = 1, max = 16, message = "兑换码长度必须在1-16个字符之间"))]
    pub code: String,
}

/// 积分入账请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EarnRequest {
    #[validate(length(min = 1, max = 64, message = "会员标识长度必须在1-64个字符之间"))]
    pub customer_ref: String,
    #[validate(range(min = 1, message = "入账积分必须大于0"))]
    pub amount: i64,
    #[validate(length(max = 255, message = "说明长度不能超过255个字符"))]
    pub description: Option<String>,
}

/// 兑换状态查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub id: i64,
}

/// 兑换历史查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub customer_ref: String,
    pub limit: Option<i64>,
}

/// 奖品目录查询参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    /// 指定后目录条目附带 affordable 标记
    pub customer_ref: Option<String>,
}

/// 列表分页参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    /// 未指定时的默认条数
    pub fn limit_or_default(&self) -> i64 {
        self.limit.unwrap_or(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeem_request_validation() {
        let valid = RedeemRequest {
            customer_ref: "zalo-0001".to_string(),
            reward_id: 3,
        };
        assert!(valid.validate().is_ok());

        let empty_ref = RedeemRequest {
            customer_ref: String::new(),
            reward_id: 3,
        };
        assert!(empty_ref.validate().is_err());

        let bad_reward = RedeemRequest {
            customer_ref: "zalo-0001".to_string(),
            reward_id: 0,
        };
        assert!(bad_reward.validate().is_err());
    }

    #[test]
    fn test_earn_request_validation() {
        let valid = EarnRequest {
            customer_ref: "zalo-0001".to_string(),
            amount: 50,
            description: Some("到店消费".to_string()),
        };
        assert!(valid.validate().is_ok());

        let zero_amount = EarnRequest {
            customer_ref: "zalo-0001".to_string(),
            amount: 0,
            description: None,
        };
        assert!(zero_amount.validate().is_err());

        let negative = EarnRequest {
            customer_ref: "zalo-0001".to_string(),
            amount: -10,
            description: None,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let req: RedeemRequest =
            serde_json::from_str(r#"{"customerRef":"zalo-0001","rewardId":3}"#).unwrap();
        assert_eq!(req.customer_ref, "zalo-0001");
        assert_eq!(req.reward_id, 3);

        let req: EarnRequest =
            serde_json::from_str(r#"{"customerRef":"zalo-0001","amount":50}"#).unwrap();
        assert_eq!(req.amount, 50);
        assert!(req.description.is_none());
    }

    #[test]
    fn test_limit_query_default() {
        let q = LimitQuery { limit: None };
        assert_eq!(q.limit_or_default(), 20);

        let q = LimitQuery { limit: Some(50) };
        assert_eq!(q.limit_or_default(), 50);
    }
}
