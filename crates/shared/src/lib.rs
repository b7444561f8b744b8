//! 积分服务共享基础设施
//!
//! 提供各 crate 通用的配置加载、数据库连接池和日志初始化。

pub mod config;
pub mod database;
pub mod logging;

pub use config::AppConfig;
pub use database::Database;
