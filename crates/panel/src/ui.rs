/// 编辑模式：进入时用目标评论正文预填输入框并展开
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(String),
}

/// 删除确认：同一时刻至多一条待确认；新请求直接顶掉旧的，不排队
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    ConfirmPending(String),
    Deleting(String),
}

/// 会关掉菜单/下拉的外部事件。挂着不关的菜单不是小瑕疵：
/// 它可能还指着一条已被删除的评论。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismiss {
    OutsidePointer,
    VisibilityHidden,
    ActionTaken,
}

/// 面板的瞬态 UI 状态机。唯一的 open_menu 字段是权威来源，
/// 各评论的菜单不允许各自记一份开关。
#[derive(Debug, Default)]
pub struct UiState {
    open_menu: Option<String>,
    bottom_spacer: bool,
    composer_expanded: bool,
    edit: EditState,
    delete: DeleteState,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 单选语义：给 X 开菜单会顺手关掉 Y 的。
    /// is_last 为真时设置底部留白标记，避免菜单被滚动边界裁掉。
    pub fn toggle_menu(&mut self, comment_id: &str, is_last: bool) {
        if self.open_menu.as_deref() == Some(comment_id) {
            self.close_menus();
        } else {
            self.open_menu = Some(comment_id.to_string());
            self.bottom_spacer = is_last;
        }
    }

    pub fn open_menu(&self) -> Option<&str> {
        self.open_menu.as_deref()
    }

    pub fn bottom_spacer(&self) -> bool {
        self.bottom_spacer
    }

    pub fn close_menus(&mut self) {
        self.open_menu = None;
        // 没有菜单开着就不需要留白
        self.bottom_spacer = false;
    }

    pub fn dismiss(&mut self, event: Dismiss) {
        self.close_menus();
        match event {
            Dismiss::OutsidePointer | Dismiss::VisibilityHidden => {
                // 待确认的删除一并取消；进行中的不动
                if let DeleteState::ConfirmPending(_) = self.delete {
                    self.delete = DeleteState::Idle;
                }
            }
            Dismiss::ActionTaken => {}
        }
    }

    pub fn composer_expanded(&self) -> bool {
        self.composer_expanded
    }

    pub fn expand_composer(&mut self) {
        self.composer_expanded = true;
    }

    /// 收起输入框。正文去留由调用方决定：只有显式取消才清空
    pub fn collapse_composer(&mut self) {
        self.composer_expanded = false;
    }

    pub fn editing(&self) -> Option<&str> {
        match &self.edit {
            EditState::Editing(id) => Some(id),
            EditState::Idle => None,
        }
    }

    pub fn start_editing(&mut self, comment_id: &str) {
        self.edit = EditState::Editing(comment_id.to_string());
        self.composer_expanded = true;
    }

    pub fn stop_editing(&mut self) {
        self.edit = EditState::Idle;
    }

    pub fn delete_state(&self) -> &DeleteState {
        &self.delete
    }

    /// 发起删除确认。删除请求在途时忽略新请求。
    pub fn request_delete(&mut self, comment_id: &str) -> bool {
        if matches!(self.delete, DeleteState::Deleting(_)) {
            return false;
        }
        self.delete = DeleteState::ConfirmPending(comment_id.to_string());
        true
    }

    pub fn cancel_delete(&mut self) {
        if let DeleteState::ConfirmPending(_) = self.delete {
            self.delete = DeleteState::Idle;
        }
    }

    /// ConfirmPending -> Deleting，返回目标 id
    pub fn begin_deleting(&mut self) -> Option<String> {
        match &self.delete {
            DeleteState::ConfirmPending(id) => {
                let id = id.clone();
                self.delete = DeleteState::Deleting(id.clone());
                Some(id)
            }
            _ => None,
        }
    }

    pub fn finish_delete(&mut self) {
        self.delete = DeleteState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_open_menu() {
        let mut ui = UiState::new();
        ui.toggle_menu("a", false);
        assert_eq!(ui.open_menu(), Some("a"));

        // 给 B 开菜单，A 的必须关掉
        ui.toggle_menu("b", false);
        assert_eq!(ui.open_menu(), Some("b"));

        // 同一条再点一次是关闭
        ui.toggle_menu("b", false);
        assert_eq!(ui.open_menu(), None);
    }

    #[test]
    fn test_bottom_spacer_follows_last_menu() {
        let mut ui = UiState::new();
        ui.toggle_menu("last", true);
        assert!(ui.bottom_spacer());

        ui.toggle_menu("last", true);
        assert!(!ui.bottom_spacer());

        ui.toggle_menu("mid", false);
        assert!(!ui.bottom_spacer());
    }

    #[test]
    fn test_dismiss_closes_menu_and_pending_delete() {
        let mut ui = UiState::new();
        ui.toggle_menu("a", false);
        ui.request_delete("a");

        ui.dismiss(Dismiss::OutsidePointer);
        assert_eq!(ui.open_menu(), None);
        assert_eq!(*ui.delete_state(), DeleteState::Idle);
    }

    #[test]
    fn test_dismiss_leaves_inflight_delete_alone() {
        let mut ui = UiState::new();
        ui.request_delete("a");
        ui.begin_deleting().unwrap();

        ui.dismiss(Dismiss::VisibilityHidden);
        assert_eq!(*ui.delete_state(), DeleteState::Deleting("a".to_string()));
    }

    #[test]
    fn test_new_delete_request_replaces_pending() {
        let mut ui = UiState::new();
        assert!(ui.request_delete("a"));
        assert!(ui.request_delete("b"));
        assert_eq!(*ui.delete_state(), DeleteState::ConfirmPending("b".to_string()));

        assert_eq!(ui.begin_deleting().as_deref(), Some("b"));
        // 在途期间的新请求被忽略
        assert!(!ui.request_delete("c"));
        ui.finish_delete();
        assert_eq!(*ui.delete_state(), DeleteState::Idle);
    }

    #[test]
    fn test_editing_expands_composer() {
        let mut ui = UiState::new();
        ui.start_editing("c1");
        assert_eq!(ui.editing(), Some("c1"));
        assert!(ui.composer_expanded());

        ui.stop_editing();
        assert_eq!(ui.editing(), None);
    }
}
