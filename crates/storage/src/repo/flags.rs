use crate::{models::DraftScope, Db};

// 输入框展开标记：与草稿 TTL 无关，只随显式操作增删
impl Db {
    pub async fn set_expanded(&self, scope: &DraftScope, expanded: bool) -> anyhow::Result<()> {
        if expanded {
            self.kv_put(&scope.expanded_key(), "true").await
        } else {
            self.kv_delete(&scope.expanded_key()).await
        }
    }

    pub async fn load_expanded(&self, scope: &DraftScope) -> anyhow::Result<bool> {
        Ok(self
            .kv_get(&scope.expanded_key())
            .await?
            .map(|v| v == "true")
            .unwrap_or(false))
    }
}
