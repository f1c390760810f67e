mod http;

pub use http::{HttpBackend, HttpConfig};

use async_trait::async_trait;
use domain::{Comment, PostId, Profile};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("undecodable response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server response is not a usable comment record")]
    MalformedRecord,
}

/// 宿主应用评论接口的边界。实现方不做排序、不做乐观合并，
/// 那是面板侧的事；这里只负责取数、提交和规范化。
#[async_trait]
pub trait CommentBackend: Send + Sync {
    async fn list_comments(&self, post_id: &PostId) -> Result<Vec<Comment>, RemoteError>;

    async fn create_comment(
        &self,
        post_id: &PostId,
        content: &str,
    ) -> Result<Comment, RemoteError>;

    async fn update_comment(
        &self,
        post_id: &PostId,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, RemoteError>;

    async fn delete_comment(&self, post_id: &PostId, comment_id: &str)
        -> Result<(), RemoteError>;

    async fn current_profile(&self) -> Result<Profile, RemoteError>;
}

/// 客户端生成的请求标签：随机 128 位十六进制。
/// 随变更请求发出作幂等键，同时在面板侧充当防串台的作用域标记。
pub fn request_tag() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_tag_shape() {
        let tag = request_tag();
        assert_eq!(tag.len(), 32);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(tag, request_tag());
    }
}
