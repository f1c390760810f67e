use crate::{request_tag, CommentBackend, RemoteError};
use async_trait::async_trait;
use domain::{protocol, Comment, PostId, Profile};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const REQUEST_TAG_HEADER: &str = "X-Request-Tag";

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// 宿主会话令牌；没有会话时由面板侧在本地拦截，不会走到这里
    pub bearer_token: Option<String>,
}

pub struct HttpBackend {
    client: reqwest::Client,
    config: HttpConfig,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    content: &'a str,
}

impl HttpBackend {
    pub fn new(config: HttpConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        let code = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(RemoteError::Status { code, body })
    }
}

#[async_trait]
impl CommentBackend for HttpBackend {
    async fn list_comments(&self, post_id: &PostId) -> Result<Vec<Comment>, RemoteError> {
        let url = self.url(&format!("/api/posts/{}/comments", post_id));
        let resp = self.authorize(self.client.get(&url)).send().await?;
        let raw: Vec<Value> = check(resp).await?.json().await?;

        let comments = protocol::decode_comment_list(&raw);
        let dropped = raw.len() - comments.len();
        if dropped > 0 {
            warn!("Dropped {} malformed comment record(s) for post {}", dropped, post_id);
        }
        debug!("Fetched {} comment(s) for post {}", comments.len(), post_id);
        Ok(comments)
    }

    async fn create_comment(
        &self,
        post_id: &PostId,
        content: &str,
    ) -> Result<Comment, RemoteError> {
        let url = self.url(&format!("/api/posts/{}/comments", post_id));
        let resp = self
            .authorize(self.client.post(&url))
            .header(REQUEST_TAG_HEADER, request_tag())
            .json(&CommentBody { content })
            .send()
            .await?;
        let raw: Value = check(resp).await?.json().await?;
        protocol::decode_comment(&raw).ok_or(RemoteError::MalformedRecord)
    }

    async fn update_comment(
        &self,
        post_id: &PostId,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, RemoteError> {
        let url = self.url(&format!("/api/posts/{}/comments/{}", post_id, comment_id));
        let resp = self
            .authorize(self.client.put(&url))
            .header(REQUEST_TAG_HEADER, request_tag())
            .json(&CommentBody { content })
            .send()
            .await?;
        let raw: Value = check(resp).await?.json().await?;
        protocol::decode_comment(&raw).ok_or(RemoteError::MalformedRecord)
    }

    async fn delete_comment(
        &self,
        post_id: &PostId,
        comment_id: &str,
    ) -> Result<(), RemoteError> {
        let url = self.url(&format!("/api/posts/{}/comments/{}", post_id, comment_id));
        let resp = self
            .authorize(self.client.delete(&url))
            .header(REQUEST_TAG_HEADER, request_tag())
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn current_profile(&self) -> Result<Profile, RemoteError> {
        let url = self.url("/api/profile");
        let resp = self.authorize(self.client.get(&url)).send().await?;
        let profile: Profile = check(resp).await?.json().await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_strips_trailing_slash() {
        assert_eq!(
            join_url("http://127.0.0.1:3000/", "/api/profile"),
            "http://127.0.0.1:3000/api/profile"
        );
        assert_eq!(
            join_url("http://127.0.0.1:3000", "/api/profile"),
            "http://127.0.0.1:3000/api/profile"
        );
    }
}
