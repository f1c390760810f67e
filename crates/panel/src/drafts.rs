use std::time::Duration;
use storage::{Db, DraftScope};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// 每个作用域一条尾沿去抖的写入漏斗：新输入取消未落盘的旧写入并重新计时，
/// 保证同一作用域的写入按调用序生效 (last write wins)。
/// 存储失败只记日志，草稿丢了可以重打，挡住提交才是事故。
pub struct DraftDebouncer {
    delay: Duration,
    pending: Option<CancellationToken>,
}

impl DraftDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, db: Db, scope: DraftScope, text: String) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }

        let token = CancellationToken::new();
        let guard = token.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // 到点后写入本身仍可被取消：biased 让取消优先于落盘，
                    // 否则刚起跑的旧写入可能压过 flush 刚写进去的新文本
                    tokio::select! {
                        biased;
                        _ = guard.cancelled() => {}
                        res = db.save_draft(&scope, &text) => {
                            if let Err(e) = res {
                                warn!("Draft save failed, persistence degraded for this session: {:?}", e);
                            }
                        }
                    }
                }
            }
        });
        self.pending = Some(token);
    }

    pub fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// 面板关闭等场景：跳过计时立即落盘
    pub async fn flush(&mut self, db: &Db, scope: &DraftScope, text: &str) {
        self.cancel_pending();
        if let Err(e) = db.save_draft(scope, text).await {
            warn!("Draft flush failed: {:?}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::PostId;

    fn scope() -> DraftScope {
        DraftScope::new("u1", PostId::new_unchecked("p1".to_string()))
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let db = Db::new("sqlite::memory:").await.unwrap();
        let mut deb = DraftDebouncer::new(Duration::from_millis(50));

        deb.schedule(db.clone(), scope(), "first".to_string());
        deb.schedule(db.clone(), scope(), "second".to_string());

        tokio::time::sleep(Duration::from_millis(300)).await;
        let got = db.load_draft(&scope(), storage::draft_ttl()).await.unwrap();
        assert_eq!(got.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_cancel_pending_drops_write() {
        let db = Db::new("sqlite::memory:").await.unwrap();
        let mut deb = DraftDebouncer::new(Duration::from_millis(50));

        deb.schedule(db.clone(), scope(), "never lands".to_string());
        deb.cancel_pending();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(db
            .load_draft(&scope(), storage::draft_ttl())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_cancel_after_deadline_still_drops_write() {
        let db = Db::new("sqlite::memory:").await.unwrap();
        let mut deb = DraftDebouncer::new(Duration::from_millis(800));
        // 只在计时窗口内暂停时钟：sqlx 的 sqlite worker 跑在真实线程上，
        // 全程 paused 会让连接池的 acquire 超时被自动快进触发
        tokio::time::pause();
        deb.schedule(db.clone(), scope(), "stale".to_string());

        // 计时器到点、写入已经起跑但尚未落盘时才取消
        tokio::time::advance(Duration::from_millis(801)).await;
        deb.cancel_pending();
        tokio::time::resume();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(db
            .load_draft(&scope(), storage::draft_ttl())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_flush_writes_immediately() {
        let db = Db::new("sqlite::memory:").await.unwrap();
        let mut deb = DraftDebouncer::new(Duration::from_secs(60));

        deb.schedule(db.clone(), scope(), "slow".to_string());
        deb.flush(&db, &scope(), "now").await;

        let got = db.load_draft(&scope(), storage::draft_ttl()).await.unwrap();
        assert_eq!(got.as_deref(), Some("now"));
    }
}
