use crate::models::Comment;

/// 本地评论集合唯一允许的三种变更
#[derive(Debug, Clone)]
pub enum Transition {
    /// 新建成功：插到队首
    Added(Comment),
    /// 编辑成功：按 id 原位替换，位置不变
    Replaced(Comment),
    /// 删除确认后：按 id 移除
    Removed(String),
}

/// 渲染用的本地评论集合。整体替换只发生在首次拉取，
/// 之后一律通过 [`Transition`] 做点状变更。
#[derive(Debug, Clone, Default)]
pub struct CommentSet {
    comments: Vec<Comment>,
}

impl CommentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
    }

    /// 应用一次变更，返回集合是否真的变化
    pub fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::Added(comment) => {
                // id 在集合内唯一；重复 id 视为替换而不是二次插入
                if let Some(i) = self.position(&comment.id) {
                    self.comments[i] = comment;
                } else {
                    self.comments.insert(0, comment);
                }
                true
            }
            Transition::Replaced(comment) => match self.position(&comment.id) {
                Some(i) => {
                    self.comments[i] = comment;
                    true
                }
                None => false,
            },
            Transition::Removed(id) => {
                let before = self.comments.len();
                self.comments.retain(|c| c.id != id);
                self.comments.len() != before
            }
        }
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.comments.iter().position(|c| c.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// 切换某条评论的正文展开标记 (瞬态，不触发重新拉取)
    pub fn toggle_show_full(&mut self, id: &str) -> bool {
        match self.comments.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.show_full = !c.show_full;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;
    use chrono::NaiveDateTime;

    fn comment(id: &str, content: &str) -> Comment {
        Comment {
            id: id.to_string(),
            content: content.to_string(),
            author: Author::anonymous(),
            created_at: NaiveDateTime::UNIX_EPOCH,
            replies_count: 0,
            show_full: false,
        }
    }

    fn seeded() -> CommentSet {
        let mut set = CommentSet::new();
        set.replace_all(vec![comment("a", "1"), comment("b", "2"), comment("c", "3")]);
        set
    }

    #[test]
    fn test_added_goes_to_front() {
        let mut set = seeded();
        assert!(set.apply(Transition::Added(comment("d", "4"))));
        assert_eq!(set.position("d"), Some(0));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_replaced_keeps_position_and_length() {
        let mut set = seeded();
        assert!(set.apply(Transition::Replaced(comment("c", "edited"))));
        assert_eq!(set.position("c"), Some(2));
        assert_eq!(set.get("c").unwrap().content, "edited");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_replaced_unknown_id_is_noop() {
        let mut set = seeded();
        assert!(!set.apply(Transition::Replaced(comment("zz", "x"))));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_removed() {
        let mut set = seeded();
        assert!(set.apply(Transition::Removed("b".to_string())));
        assert_eq!(set.len(), 2);
        assert!(!set.contains("b"));
        assert!(!set.apply(Transition::Removed("b".to_string())));
    }

    #[test]
    fn test_duplicate_add_replaces_instead() {
        let mut set = seeded();
        assert!(set.apply(Transition::Added(comment("b", "again"))));
        assert_eq!(set.len(), 3);
        assert_eq!(set.position("b"), Some(1));
        assert_eq!(set.get("b").unwrap().content, "again");
    }

    #[test]
    fn test_toggle_show_full() {
        let mut set = seeded();
        assert!(set.toggle_show_full("a"));
        assert!(set.get("a").unwrap().show_full);
        assert!(set.toggle_show_full("a"));
        assert!(!set.get("a").unwrap().show_full);
        assert!(!set.toggle_show_full("nope"));
    }
}
