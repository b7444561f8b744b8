//! HTTP 请求处理器

pub mod customers;
pub mod points;
pub mod rewards;
