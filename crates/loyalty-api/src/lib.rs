//! 积分兑换 REST API 服务
//!
//! 面向小程序端与店员端的 HTTP 接口：
//!
//! - **兑换**：发起兑换、核销兑换码、查询状态与历史
//! - **积分**：消费后入账
//! - **查询**：余额、奖品目录、积分流水、通知
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型与 HTTP 映射
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//! - `worker`: 兑换过期后台任务
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod worker;

pub use dto::{ApiResponse, ConfirmRequest, EarnRequest, RedeemRequest};
pub use error::{ApiError, Result};
pub use state::AppState;
