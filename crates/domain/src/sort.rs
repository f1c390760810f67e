use crate::models::{Comment, SortMode};

/// 计算渲染顺序。纯函数，不修改输入；排序模式或集合一旦变化
/// 都必须整体重算 (锚点可能因任何一次插入而改变)。
pub fn sort(comments: &[Comment], mode: SortMode) -> Vec<Comment> {
    match mode {
        SortMode::Recent => {
            let mut out = comments.to_vec();
            // Vec::sort_by 是稳定排序，时间相同保持输入相对顺序
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            out
        }
        SortMode::Relevant => {
            let anchor = match anchor_index(comments) {
                Some(i) => i,
                None => return Vec::new(),
            };
            let mut rest: Vec<Comment> = comments
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != anchor)
                .map(|(_, c)| c.clone())
                .collect();
            rest.sort_by(|a, b| a.created_at.cmp(&b.created_at));

            let mut out = Vec::with_capacity(comments.len());
            out.push(comments[anchor].clone());
            out.extend(rest);
            out
        }
    }
}

/// 锚点 = 全集合 created_at 最大的那条；时间并列取输入序靠前者
fn anchor_index(comments: &[Comment]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, c) in comments.iter().enumerate() {
        match best {
            // 仅在严格更新时才换锚点，保证并列时首次出现者获胜
            Some(b) if comments[b].created_at >= c.created_at => {}
            _ => best = Some(i),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;
    use chrono::NaiveDate;

    fn comment(id: &str, hour: u32, minute: u32) -> Comment {
        Comment {
            id: id.to_string(),
            content: format!("body of {}", id),
            author: Author::anonymous(),
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
            replies_count: 0,
            show_full: false,
        }
    }

    fn ids(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_recent_is_descending() {
        let input = vec![comment("t1", 10, 0), comment("t2", 9, 0), comment("t3", 11, 0)];
        let sorted = sort(&input, SortMode::Recent);
        assert_eq!(ids(&sorted), vec!["t3", "t1", "t2"]);
        // 输入本身不被打乱
        assert_eq!(ids(&input), vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_recent_tie_keeps_input_order() {
        let input = vec![comment("a", 10, 0), comment("b", 10, 0), comment("c", 9, 0)];
        let sorted = sort(&input, SortMode::Recent);
        assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_relevant_pins_newest_then_ascending() {
        let input = vec![comment("t1", 10, 0), comment("t2", 9, 0), comment("t3", 11, 0)];
        let sorted = sort(&input, SortMode::Relevant);
        assert_eq!(ids(&sorted), vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn test_relevant_anchor_tie_takes_first_in_input() {
        let input = vec![comment("x", 11, 0), comment("y", 11, 0), comment("z", 9, 0)];
        let sorted = sort(&input, SortMode::Relevant);
        assert_eq!(sorted[0].id, "x");
        assert_eq!(ids(&sorted), vec!["x", "z", "y"]);
    }

    #[test]
    fn test_relevant_anchor_found_anywhere() {
        let input = vec![comment("old", 8, 0), comment("newest", 12, 0), comment("mid", 10, 0)];
        let sorted = sort(&input, SortMode::Relevant);
        assert_eq!(ids(&sorted), vec!["newest", "old", "mid"]);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(sort(&[], SortMode::Relevant).is_empty());
        assert!(sort(&[], SortMode::Recent).is_empty());
        let one = vec![comment("only", 10, 0)];
        assert_eq!(ids(&sort(&one, SortMode::Relevant)), vec!["only"]);
    }
}
