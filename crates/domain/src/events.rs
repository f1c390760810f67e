use crate::models::PostId;
use serde::{Deserialize, Serialize};

/// 通知宿主文章视图刷新评论计数的事件 (fire-and-forget)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CommentChange {
    Added { post_id: PostId, comment_id: String },
    Updated { post_id: PostId, comment_id: String },
    Removed { post_id: PostId, comment_id: String },
}

impl CommentChange {
    pub fn post_id(&self) -> &PostId {
        match self {
            Self::Added { post_id, .. }
            | Self::Updated { post_id, .. }
            | Self::Removed { post_id, .. } => post_id,
        }
    }

    pub fn comment_id(&self) -> &str {
        match self {
            Self::Added { comment_id, .. }
            | Self::Updated { comment_id, .. }
            | Self::Removed { comment_id, .. } => comment_id,
        }
    }
}
