//! 积分与兑换核心
//!
//! 实现会员积分账本与奖品兑换的完整业务逻辑：
//! - **积分账户**：会员当前余额与等级，唯一的共享可变资源
//! - **兑换流程**：发起（PENDING + 兑换码）→ 核销（原子结算）→ 过期
//! - **积分流水**：只追加的账本，余额的每一次变动都有对应流水
//! - **通知**：结算完成后写入的提示记录
//!
//! ## 结算事务
//!
//! 核销在单个数据库事务内完成四件事：条件状态翻转、带下限的余额扣减、
//! 流水追加、通知写入。要么全部生效，要么全部回滚。
//!
//! ## 模块结构
//!
//! - `models`: 实体定义
//! - `repository`: 数据访问层（裸 SQL + 事务内变体）
//! - `service`: 业务服务（兑换、积分、查询）
//! - `code`: 兑换码生成与归一化
//! - `error`: 错误类型定义

pub mod code;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{LoyaltyError, Result};
pub use models::{
    Customer, Notification, PointTransaction, Redemption, RedemptionStatus, Reward,
    TransactionType,
};
pub use repository::{
    CustomerRepository, LedgerRepository, NotificationRepository, RedemptionRepository,
    RewardRepository,
};
pub use service::{PointsService, QueryService, RedemptionService};
