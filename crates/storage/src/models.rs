use domain::PostId;

/// 草稿作用域：当前登录用户 + 当前文章。
/// 键字符串只在这里拼装，调用方不得自行格式化；
/// user_id 必须来自当前会话，绝不能用缓存的旧身份。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftScope {
    user_id: String,
    post_id: PostId,
}

impl DraftScope {
    pub fn new(user_id: impl Into<String>, post_id: PostId) -> Self {
        Self {
            user_id: user_id.into(),
            post_id,
        }
    }

    pub fn post_id(&self) -> &PostId {
        &self.post_id
    }

    pub(crate) fn draft_key(&self) -> String {
        format!("commentDraft_{}_{}", self.user_id, self.post_id)
    }

    pub(crate) fn time_key(&self) -> String {
        format!("commentDraft_{}_{}_time", self.user_id, self.post_id)
    }

    pub(crate) fn expanded_key(&self) -> String {
        format!("commentExpanded_{}_{}", self.user_id, self.post_id)
    }
}
