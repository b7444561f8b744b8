//! 奖品实体定义

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 奖品目录条目
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: i64,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    /// 兑换所需积分
    pub points_required: i64,
    /// 剩余库存（None 表示不限量）
    #[sqlx(default)]
    pub quantity: Option<i64>,
    /// 是否上架
    pub is_active: bool,
    /// 可兑换时间窗口开始
    #[sqlx(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// 可兑换时间窗口结束
    #[sqlx(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// 图片外链
    #[sqlx(default)]
    pub image_url: Option<String>,
    /// 图片二进制内容，读取时转码为 data URI
    #[serde(skip)]
    #[sqlx(default)]
    pub image_data: Option<Vec<u8>>,
    #[sqlx(default)]
    pub image_mime: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    /// 检查是否有库存
    pub fn has_stock(&self) -> bool {
        match self.quantity {
            Some(remaining) => remaining > 0,
            None => true, // 不限量
        }
    }

    /// 检查是否在可兑换时间窗口内
    pub fn in_window(&self, now: DateTime<Utc>) -> bool {
        let after_start = self.start_time.is_none_or(|t| now >= t);
        let before_end = self.end_time.is_none_or(|t| now <= t);
        after_start && before_end
    }

    /// 检查是否可兑换（上架、在窗口内且有库存）
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.in_window(now) && self.has_stock()
    }

    /// 可直接展示的图片
    ///
    /// 优先返回外链；仅有二进制内容时转码为 base64 data URI。
    pub fn display_image(&self) -> Option<String> {
        image_display(
            self.image_url.as_deref(),
            self.image_data.as_deref(),
            self.image_mime.as_deref(),
        )
    }
}

/// 图片展示值：优先外链，其次 base64 data URI
pub fn image_display(
    url: Option<&str>,
    data: Option<&[u8]>,
    mime: Option<&str>,
) -> Option<String> {
    if let Some(url) = url {
        return Some(url.to_string());
    }
    data.map(|bytes| {
        let mime = mime.unwrap_or("image/png");
        format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
    })
}
