//! API 错误类型定义
//!
//! 将核心业务错误映射为统一的 HTTP 响应

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use loyalty_core::LoyaltyError;

/// API 错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Loyalty(#[from] LoyaltyError),

    #[error("参数验证失败: {0}")]
    Validation(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Loyalty(e) => match e {
                // 资源不存在
                LoyaltyError::CustomerNotFound(_)
                | LoyaltyError::RewardNotFound(_)
                | LoyaltyError::RedemptionNotFound(_)
                | LoyaltyError::CodeNotFound(_) => StatusCode::NOT_FOUND,

                // 业务冲突：请求合法但与当前状态冲突
                LoyaltyError::RewardUnavailable(_)
                | LoyaltyError::RedemptionAlreadyUsed(_)
                | LoyaltyError::RedemptionExpired(_)
                | LoyaltyError::InsufficientPoints { .. } => StatusCode::CONFLICT,

                LoyaltyError::Validation(_) => StatusCode::BAD_REQUEST,

                LoyaltyError::CodeGenerationExhausted
                | LoyaltyError::Database(_)
                | LoyaltyError::Serialization(_)
                | LoyaltyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Loyalty(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }

    fn is_business_error(&self) -> bool {
        match self {
            Self::Loyalty(e) => e.is_business_error(),
            Self::Validation(_) => true,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = if self.is_business_error() {
            self.to_string()
        } else {
            tracing::error!(error = %self, code = self.error_code(), "请求处理失败");
            "服务内部错误，请稍后重试".to_string()
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// API 层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// 构造代表性错误变体及其期望的 (StatusCode, error_code) 映射。
    /// 使用表驱动方式避免逐个变体写重复断言。
    fn error_cases() -> Vec<(ApiError, StatusCode, &'static str)> {
        vec![
            // 资源不存在类：404，错误码区分具体缺失资源
            (
                LoyaltyError::CustomerNotFound("zalo-001".into()).into(),
                StatusCode::NOT_FOUND,
                "CUSTOMER_NOT_FOUND",
            ),
            (
                LoyaltyError::RewardNotFound(3).into(),
                StatusCode::NOT_FOUND,
                "REWARD_NOT_FOUND",
            ),
            (
                LoyaltyError::RedemptionNotFound(9).into(),
                StatusCode::NOT_FOUND,
                "REDEMPTION_NOT_FOUND",
            ),
            (
                LoyaltyError::CodeNotFound("AB12CD34".into()).into(),
                StatusCode::NOT_FOUND,
                "CODE_NOT_FOUND",
            ),
            // 业务冲突类：409 表示请求合法但与当前状态冲突
            (
                LoyaltyError::RewardUnavailable(3).into(),
                StatusCode::CONFLICT,
                "REWARD_UNAVAILABLE",
            ),
            (
                LoyaltyError::RedemptionAlreadyUsed("AB12CD34".into()).into(),
                StatusCode::CONFLICT,
                "REDEMPTION_ALREADY_USED",
            ),
            (
                LoyaltyError::RedemptionExpired("AB12CD34".into()).into(),
                StatusCode::CONFLICT,
                "REDEMPTION_EXPIRED",
            ),
            (
                LoyaltyError::InsufficientPoints {
                    required: 100,
                    available: 20,
                }
                .into(),
                StatusCode::CONFLICT,
                "INSUFFICIENT_POINTS",
            ),
            // 参数校验
            (
                LoyaltyError::Validation("兑换码不能为空".into()).into(),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                ApiError::Validation("customerRef is required".into()),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            // 系统级错误：统一 500
            (
                LoyaltyError::CodeGenerationExhausted.into(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "CODE_GENERATION_EXHAUSTED",
            ),
            (
                LoyaltyError::Internal("unexpected state".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ]
    }

    #[test]
    fn test_status_codes() {
        for (error, expected_status, label) in error_cases() {
            assert_eq!(
                error.status_code(),
                expected_status,
                "状态码不匹配: variant={label}"
            );
        }
    }

    #[test]
    fn test_error_codes() {
        for (error, _status, expected_code) in error_cases() {
            assert_eq!(
                error.error_code(),
                expected_code,
                "错误码不匹配: expected={expected_code}"
            );
        }
    }

    /// IntoResponse 是错误到 HTTP 响应的最终出口。
    /// 必须验证状态码正确、响应体结构完整（success/code/message/data 四字段）。
    #[tokio::test]
    async fn test_into_response_body_structure() {
        for (error, expected_status, expected_code) in error_cases() {
            let label = format!("{:?}", error);
            let response = error.into_response();

            assert_eq!(
                response.status(),
                expected_status,
                "响应状态码不匹配: {label}"
            );

            let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("读取响应体失败");
            let body: serde_json::Value =
                serde_json::from_slice(&body_bytes).expect("响应体不是合法 JSON");

            assert_eq!(body["success"], json!(false), "success 字段应为 false: {label}");
            assert_eq!(body["code"], json!(expected_code), "code 字段不匹配: {label}");
            assert!(
                !body["message"].as_str().unwrap_or("").is_empty(),
                "message 不应为空: {label}"
            );
            assert!(body["data"].is_null(), "data 字段应为 null: {label}");
        }
    }

    /// 系统级错误的响应消息不应泄露内部细节，只返回通用提示
    #[tokio::test]
    async fn test_system_errors_hide_internal_details() {
        let error: ApiError =
            LoyaltyError::Internal("stack overflow at module X".into()).into();
        let response = error.into_response();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("读取响应体失败");
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        let message = body["message"].as_str().unwrap();

        assert!(
            !message.contains("stack overflow"),
            "系统错误消息泄露了内部细节: {message}"
        );
        assert!(
            message.contains("服务内部错误"),
            "系统错误应返回通用提示，实际: {message}"
        );
    }

    /// 业务错误的响应消息应保留原始上下文，帮助用户理解问题
    #[tokio::test]
    async fn test_business_errors_preserve_context() {
        let error: ApiError = LoyaltyError::InsufficientPoints {
            required: 100,
            available: 20,
        }
        .into();
        let response = error.into_response();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("读取响应体失败");
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        let message = body["message"].as_str().unwrap();

        assert!(message.contains("100"), "消息应包含所需积分: {message}");
        assert!(message.contains("20"), "消息应包含可用积分: {message}");
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::{ValidationError, ValidationErrors};

        let mut errors = ValidationErrors::new();
        let mut field_error = ValidationError::new("range");
        field_error.message = Some("入账积分必须大于 0".into());
        errors.add("amount", field_error);

        let api_error: ApiError = errors.into();
        match &api_error {
            ApiError::Validation(msg) => {
                assert!(msg.contains("amount"), "转换后应保留字段名: {msg}");
            }
            other => panic!("期望 Validation 变体，实际: {:?}", other),
        }
        assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);
    }
}
