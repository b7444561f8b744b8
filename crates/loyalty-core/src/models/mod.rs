//! 实体模型定义

mod customer;
mod enums;
mod ledger;
mod notification;
mod redemption;
mod reward;

pub use customer::Customer;
pub use enums::{RedemptionStatus, TransactionType};
pub use ledger::PointTransaction;
pub use notification::Notification;
pub use redemption::Redemption;
pub use reward::{Reward, image_display};
