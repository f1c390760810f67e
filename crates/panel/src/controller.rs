use crate::drafts::DraftDebouncer;
use crate::ui::{Dismiss, UiState};
use domain::{
    sort, Author, Comment, CommentChange, CommentSet, PostId, Profile, SortMode, Transition,
};
use remote::{CommentBackend, RemoteError};
use std::sync::Arc;
use std::time::Duration;
use storage::{Db, DraftScope};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PanelError {
    /// 没有有效会话就提交/删除：本地直接拒绝，不发网络请求
    #[error("sign in required")]
    SignInRequired,
    #[error("no article is open")]
    NoPost,
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Posted(Comment),
    /// 已有提交在途、正文为空或响应已过时：本次无事发生
    Ignored,
}

/// 评论面板的编排层：持有本地评论集合、草稿写入漏斗和瞬态 UI 状态，
/// 把用户动作接到远端接口上。设计为单任务持有，远端调用的完成
/// 都落回同一个任务，不存在共享内存竞争。
pub struct PanelController {
    backend: Arc<dyn CommentBackend>,
    drafts: Db,
    draft_ttl: chrono::Duration,
    debouncer: DraftDebouncer,
    changes: broadcast::Sender<CommentChange>,
    session: Option<Profile>,
    post: Option<PostId>,
    comments: CommentSet,
    sort_mode: SortMode,
    ui: UiState,
    composer_text: String,
    submitting: bool,
}

impl PanelController {
    pub fn new(
        backend: Arc<dyn CommentBackend>,
        drafts: Db,
        draft_ttl: chrono::Duration,
        debounce: Duration,
    ) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            backend,
            drafts,
            draft_ttl,
            debouncer: DraftDebouncer::new(debounce),
            changes,
            session: None,
            post: None,
            comments: CommentSet::new(),
            sort_mode: SortMode::default(),
            ui: UiState::new(),
            composer_text: String::new(),
            submitting: false,
        }
    }

    /// 宿主文章视图订阅这里来刷新评论计数徽标
    pub fn subscribe_changes(&self) -> broadcast::Receiver<CommentChange> {
        self.changes.subscribe()
    }

    /// 草稿作用域只在这一个边界拼出来，身份永远取自当前会话
    fn scope(&self) -> Option<DraftScope> {
        match (&self.session, &self.post) {
            (Some(profile), Some(post)) => {
                Some(DraftScope::new(profile.id.clone(), post.clone()))
            }
            _ => None,
        }
    }

    /// 打开一篇文章：整体替换评论集合 (唯一一次)，排序回到默认的
    /// relevant，恢复草稿与输入框展开标记。
    pub async fn open_post(&mut self, post_id: PostId) -> Result<(), PanelError> {
        self.post = Some(post_id.clone());
        self.comments.replace_all(Vec::new());
        self.sort_mode = SortMode::default();
        self.ui = UiState::new();
        self.composer_text.clear();
        self.submitting = false;
        self.debouncer.cancel_pending();

        // 评论列表和当前用户资料并行拉取
        let (list, profile) = futures::future::join(
            self.backend.list_comments(&post_id),
            self.backend.current_profile(),
        )
        .await;

        self.session = match profile {
            Ok(p) => Some(p),
            Err(e) => {
                info!("No usable session, panel is read-only: {}", e);
                None
            }
        };

        self.comments.replace_all(list?);

        // 草稿恢复失败只降级，不影响面板打开
        if let Some(scope) = self.scope() {
            match self.drafts.load_draft(&scope, self.draft_ttl).await {
                Ok(Some(text)) => self.composer_text = text,
                Ok(None) => {}
                Err(e) => warn!("Draft restore failed: {:?}", e),
            }
            match self.drafts.load_expanded(&scope).await {
                Ok(true) => self.ui.expand_composer(),
                Ok(false) => {}
                Err(e) => warn!("Expanded flag restore failed: {:?}", e),
            }
        }
        Ok(())
    }

    /// 手动重试入口：只重拉当前文章的评论列表
    pub async fn refresh(&mut self) -> Result<(), PanelError> {
        let post_id = self.post.clone().ok_or(PanelError::NoPost)?;
        let list = self.backend.list_comments(&post_id).await?;
        if self.post.as_ref() == Some(&post_id) {
            self.comments.replace_all(list);
        }
        Ok(())
    }

    /// 关闭面板：把输入框里的文字立即落盘再清状态
    pub async fn close_post(&mut self) {
        if let Some(scope) = self.scope() {
            let text = self.composer_text.clone();
            self.debouncer.flush(&self.drafts, &scope, &text).await;
        } else {
            self.debouncer.cancel_pending();
        }
        self.post = None;
        self.session = None;
        self.comments.replace_all(Vec::new());
        self.ui = UiState::new();
        self.composer_text.clear();
        self.submitting = false;
    }

    /// 当前渲染顺序。模式或集合一变就整体重算，锚点不做增量维护。
    pub fn visible_comments(&self) -> Vec<Comment> {
        sort(self.comments.as_slice(), self.sort_mode)
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    pub fn composer_text(&self) -> &str {
        &self.composer_text
    }

    pub fn session(&self) -> Option<&Profile> {
        self.session.as_ref()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// 每次键入都走这里；落盘交给去抖漏斗
    pub fn composer_input(&mut self, text: impl Into<String>) {
        self.composer_text = text.into();
        if let Some(scope) = self.scope() {
            self.debouncer
                .schedule(self.drafts.clone(), scope, self.composer_text.clone());
        }
    }

    pub async fn expand_composer(&mut self) {
        self.ui.expand_composer();
        self.persist_expanded(true).await;
    }

    /// 点击外部等导致的收起：正文保留
    pub async fn collapse_composer(&mut self) {
        self.ui.collapse_composer();
        self.persist_expanded(false).await;
    }

    /// 显式取消：唯一会清掉已输入文字的收起路径
    pub async fn cancel_composer(&mut self) {
        self.composer_text.clear();
        self.ui.stop_editing();
        self.ui.collapse_composer();
        self.debouncer.cancel_pending();
        if let Some(scope) = self.scope() {
            if let Err(e) = self.drafts.clear_draft(&scope).await {
                warn!("Draft clear failed: {:?}", e);
            }
        }
        self.persist_expanded(false).await;
    }

    async fn persist_expanded(&self, expanded: bool) {
        if let Some(scope) = self.scope() {
            if let Err(e) = self.drafts.set_expanded(&scope, expanded).await {
                warn!("Expanded flag save failed: {:?}", e);
            }
        }
    }

    /// 进入编辑：用目标评论正文预填输入框并展开。
    /// 展开标记照常落盘，编辑到一半刷新页面也要回到展开态。
    pub async fn start_edit(&mut self, comment_id: &str) -> bool {
        match self.comments.get(comment_id) {
            Some(c) => {
                self.composer_text = c.content.clone();
                self.ui.dismiss(Dismiss::ActionTaken);
                self.ui.start_editing(comment_id);
                self.persist_expanded(true).await;
                true
            }
            None => false,
        }
    }

    /// 提交：无编辑目标走新建 (插到队首)，有编辑目标走更新 (原位替换)。
    /// 在途期间的二次提交是 no-op；失败时已输入文字原样保留等用户重试。
    pub async fn submit(&mut self) -> Result<SubmitOutcome, PanelError> {
        if self.submitting {
            return Ok(SubmitOutcome::Ignored);
        }
        let session = self.session.clone().ok_or(PanelError::SignInRequired)?;
        let post_id = self.post.clone().ok_or(PanelError::NoPost)?;

        let text = self.composer_text.trim().to_string();
        if text.is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        let editing = self.ui.editing().map(|s| s.to_string());

        self.submitting = true;
        let result = match &editing {
            Some(id) => self.backend.update_comment(&post_id, id, &text).await,
            None => self.backend.create_comment(&post_id, &text).await,
        };
        self.submitting = false;

        let comment = result?;
        Ok(self
            .apply_submit_result(&post_id, &session, editing, comment)
            .await)
    }

    /// 把提交结果合并进本地集合。issued_post 是发请求时捕获的文章 id：
    /// 跟当前文章对不上说明面板已经切走，迟到的响应整个丢弃，
    /// 本地状态一个字都不动。
    async fn apply_submit_result(
        &mut self,
        issued_post: &PostId,
        session: &Profile,
        editing: Option<String>,
        mut comment: Comment,
    ) -> SubmitOutcome {
        if self.post.as_ref() != Some(issued_post) {
            warn!("Dropping stale submit response for post {}", issued_post);
            return SubmitOutcome::Ignored;
        }

        // 自己刚发的评论服务端却没带作者信息：用会话身份补齐，
        // 不能退回匿名占位
        if comment.author.is_anonymous() {
            comment.author = Author::from_profile(session);
        }

        let change = match editing {
            Some(_) => {
                if !self.comments.apply(Transition::Replaced(comment.clone())) {
                    warn!("Edited comment {} is gone from the local set", comment.id);
                }
                self.ui.stop_editing();
                CommentChange::Updated {
                    post_id: issued_post.clone(),
                    comment_id: comment.id.clone(),
                }
            }
            None => {
                self.comments.apply(Transition::Added(comment.clone()));
                CommentChange::Added {
                    post_id: issued_post.clone(),
                    comment_id: comment.id.clone(),
                }
            }
        };

        // 提交成功：草稿和展开标记显式清理
        self.composer_text.clear();
        self.debouncer.cancel_pending();
        if let Some(scope) = self.scope() {
            if let Err(e) = self.drafts.clear_draft(&scope).await {
                warn!("Draft clear failed: {:?}", e);
            }
        }
        self.ui.collapse_composer();
        self.persist_expanded(false).await;

        // fire-and-forget，宿主没在听也无所谓
        let _ = self.changes.send(change);
        SubmitOutcome::Posted(comment)
    }

    pub fn request_delete(&mut self, comment_id: &str) -> bool {
        self.ui.request_delete(comment_id)
    }

    pub fn cancel_delete(&mut self) {
        self.ui.cancel_delete();
    }

    /// 确认删除。本地集合只在拿到服务端确认之后才剪：删除失败时
    /// 目标必须原样留在列表里，不允许出现"幽灵"状态。
    pub async fn confirm_delete(&mut self) -> Result<bool, PanelError> {
        if self.session.is_none() {
            // 挂着的确认指向一条未登录用户永远删不了的评论，清掉再报错
            self.ui.cancel_delete();
            return Err(PanelError::SignInRequired);
        }
        let post_id = self.post.clone().ok_or(PanelError::NoPost)?;
        let comment_id = match self.ui.begin_deleting() {
            Some(id) => id,
            None => return Ok(false),
        };

        let result = self.backend.delete_comment(&post_id, &comment_id).await;
        self.ui.finish_delete();

        match result {
            Ok(()) => Ok(self.apply_delete_confirmation(post_id, comment_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// 服务端确认后的本地剪除。issued_post 在发请求时捕获；
    /// 确认落地前文章已经切换就丢弃，不碰换过的集合。
    fn apply_delete_confirmation(&mut self, issued_post: PostId, comment_id: String) -> bool {
        if self.post.as_ref() != Some(&issued_post) {
            warn!("Dropping stale delete response for post {}", issued_post);
            return false;
        }
        self.comments.apply(Transition::Removed(comment_id.clone()));
        self.ui.dismiss(Dismiss::ActionTaken);
        let _ = self.changes.send(CommentChange::Removed {
            post_id: issued_post,
            comment_id,
        });
        true
    }

    /// 菜单开关走可见顺序算"是否最后一条"，留白标记跟着它走
    pub fn toggle_menu(&mut self, comment_id: &str) {
        let is_last = self
            .visible_comments()
            .last()
            .map(|c| c.id == comment_id)
            .unwrap_or(false);
        self.ui.toggle_menu(comment_id, is_last);
    }

    pub fn dismiss(&mut self, event: Dismiss) {
        self.ui.dismiss(event);
    }

    pub fn toggle_show_full(&mut self, comment_id: &str) -> bool {
        self.comments.toggle_show_full(comment_id)
    }
}
