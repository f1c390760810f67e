use crate::{models::DraftScope, Db};
use chrono::{Duration, NaiveDateTime, Utc};

/// 超过 12 小时的草稿视为过期，下次读取时惰性清除
pub const DRAFT_TTL_HOURS: i64 = 12;

pub fn draft_ttl() -> Duration {
    Duration::hours(DRAFT_TTL_HOURS)
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl Db {
    /// 写入草稿及当前时间戳。trim 后为空则改为删除已有记录，
    /// 绝不存空串。调用方负责节流 (>=800ms)，缓存只存给什么写什么。
    pub async fn save_draft(&self, scope: &DraftScope, text: &str) -> anyhow::Result<()> {
        if text.trim().is_empty() {
            return self.clear_draft(scope).await;
        }

        let now = Utc::now().naive_utc().format(TIME_FORMAT).to_string();

        // 正文和时间戳成对写入，保持一致
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO drafts (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(scope.draft_key())
        .bind(text)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO drafts (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(scope.time_key())
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// 读取草稿。过期的记录当场清除并返回 None，绝不把陈旧草稿喂回 UI。
    /// 没有后台清扫任务，过期完全靠读时惰性处理。
    pub async fn load_draft(
        &self,
        scope: &DraftScope,
        ttl: Duration,
    ) -> anyhow::Result<Option<String>> {
        let text = match self.kv_get(&scope.draft_key()).await? {
            Some(t) => t,
            None => return Ok(None),
        };

        let saved_at = match self.kv_get(&scope.time_key()).await? {
            Some(raw) => match NaiveDateTime::parse_from_str(&raw, TIME_FORMAT) {
                Ok(t) => Some(t),
                Err(e) => {
                    tracing::warn!("Unreadable draft timestamp for {}: {}", scope.time_key(), e);
                    None
                }
            },
            None => None,
        };

        match saved_at {
            Some(t) if Utc::now().naive_utc() - t <= ttl => Ok(Some(text)),
            // 时间戳缺失或解析失败也按过期处理
            _ => {
                self.clear_draft(scope).await?;
                Ok(None)
            }
        }
    }

    /// 无条件删除：提交成功或显式取消后调用
    pub async fn clear_draft(&self, scope: &DraftScope) -> anyhow::Result<()> {
        self.kv_delete(&scope.draft_key()).await?;
        self.kv_delete(&scope.time_key()).await?;
        Ok(())
    }
}
