use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.is_empty() {
            return Err("Post ID cannot be empty.".to_string());
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err("Post ID contains invalid characters.".to_string());
        }
        if s.len() > 128 {
            return Err("Post ID is too long (max 128 chars).".to_string());
        }
        Ok(Self(s))
    }

    pub fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 当前登录用户 (来自宿主应用的 profile 接口)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl Author {
    /// 服务端缺失作者信息时的占位作者
    pub fn anonymous() -> Self {
        Self {
            id: String::new(),
            display_name: "Anonymous".to_string(),
            avatar_url: None,
        }
    }

    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            display_name: profile.name.clone(),
            avatar_url: profile.avatar_url.clone(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub author: Author,
    pub created_at: NaiveDateTime,
    pub replies_count: i64,
    // 瞬态 UI 字段：正文是否已展开，不参与序列化
    #[serde(skip)]
    pub show_full: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// 最新一条置顶，其余按时间正序 (每次打开面板的默认值)
    #[default]
    Relevant,
    /// 纯时间倒序
    Recent,
}
