//! 数据访问层
//!
//! 裸 SQL 仓储。需要参与结算事务的写操作以 `_in_tx` 关联函数的形式
//! 提供，接收 `&mut PgConnection`，由服务层统一管理事务边界。

mod customer_repo;
mod ledger_repo;
mod notification_repo;
mod redemption_repo;
mod reward_repo;

pub use customer_repo::CustomerRepository;
pub use ledger_repo::LedgerRepository;
pub use notification_repo::NotificationRepository;
pub use redemption_repo::{RedemptionHistoryRow, RedemptionRepository};
pub use reward_repo::RewardRepository;
