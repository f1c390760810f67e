use crate::models::{Author, Comment};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 服务端评论记录的宽松形态：除 id 外一切字段都可能缺失
#[derive(Serialize, Deserialize, Debug)]
pub struct WireComment {
    pub id: Option<Value>,
    pub content: Option<String>,
    pub author: Option<WireAuthor>,
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub replies_count: i64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct WireAuthor {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// 解析单条记录。id 缺失或为空视为畸形记录，返回 None。
pub fn decode_comment(value: &Value) -> Option<Comment> {
    let wire = serde_json::from_value::<WireComment>(value.clone()).ok()?;

    let id = match wire.id? {
        Value::String(s) if !s.is_empty() => s,
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    let author = match wire.author {
        Some(a) => Author {
            id: a.id.unwrap_or_default(),
            display_name: a
                .display_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| Author::anonymous().display_name),
            avatar_url: a.avatar_url,
        },
        None => Author::anonymous(),
    };

    Some(Comment {
        id,
        content: wire.content.unwrap_or_default(),
        author,
        created_at: wire.created_at.unwrap_or(NaiveDateTime::UNIX_EPOCH),
        replies_count: wire.replies_count,
        show_full: false,
    })
}

/// 解析列表：畸形记录过滤掉，不中断其余记录。调用方可对比长度记录丢弃数。
pub fn decode_comment_list(values: &[Value]) -> Vec<Comment> {
    values.iter().filter_map(decode_comment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_id_filtered() {
        let raw = vec![
            json!({"id": "c1", "content": "hello", "created_at": "2024-05-01T10:00:00"}),
            json!({"content": "no id here"}),
            json!({"id": "c2", "content": "world", "created_at": "2024-05-01T11:00:00"}),
        ];
        let comments = decode_comment_list(&raw);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, "c1");
        assert_eq!(comments[1].id, "c2");
    }

    #[test]
    fn test_missing_author_becomes_anonymous() {
        let raw = json!({"id": "c1", "content": "hi", "created_at": "2024-05-01T10:00:00"});
        let c = decode_comment(&raw).unwrap();
        assert!(c.author.is_anonymous());
        assert_eq!(c.author.display_name, "Anonymous");
    }

    #[test]
    fn test_numeric_id_accepted() {
        let raw = json!({"id": 42, "content": "hi"});
        let c = decode_comment(&raw).unwrap();
        assert_eq!(c.id, "42");
    }

    #[test]
    fn test_author_preserved_when_present() {
        let raw = json!({
            "id": "c9",
            "content": "hi",
            "author": {"id": "u1", "display_name": "Ferris", "avatar_url": "https://x/a.png"},
            "created_at": "2024-05-01T10:00:00",
            "replies_count": 3
        });
        let c = decode_comment(&raw).unwrap();
        assert_eq!(c.author.display_name, "Ferris");
        assert_eq!(c.replies_count, 3);
        assert!(!c.show_full);
    }
}
