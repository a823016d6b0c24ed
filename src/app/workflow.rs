// ==========================================
// Transfer Model - 转移/重置工作流状态机
// ==========================================
// 状态:
//   Idle ──Submit──▶ Validating ──Valid──▶ Submitting ──Succeeded──▶ Idle
//                       │                      │
//                    Invalid                 Failed
//                       ▼                      ▼
//                     Error ◀──────────────────┘
//   Error ──Dismiss / 编辑表单──▶ Idle, Error ──Submit──▶ Validating
// 红线:
// - 校验失败不访问数据库，不清缓存
// - 过程失败保留缓存，错误消息原样展示
// - 仅在写成功后清空缓存
// ==========================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::{validate_move, validate_reset_site, ReadApi, TransferApi};
use crate::app::dashboard::{format_thousands, SiteOption};
use crate::domain::{MoveOutcome, MoveRequest, ResetOutcome, ResetScope};
use crate::i18n::t_with_args;

// ==========================================
// WorkflowState - 工作流状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Idle,
    Validating,
    Submitting,
    Error { message: String },
}

impl WorkflowState {
    fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "IDLE",
            WorkflowState::Validating => "VALIDATING",
            WorkflowState::Submitting => "SUBMITTING",
            WorkflowState::Error { .. } => "ERROR",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==========================================
// WorkflowEvent - 驱动事件
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    SelectFrom(String),
    SelectTo(String),
    SetAmount(f64),
    Submit,
    Valid,
    Invalid(String),
    Succeeded,
    Failed(String),
    Dismiss,
}

impl WorkflowEvent {
    fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::SelectFrom(_) => "SELECT_FROM",
            WorkflowEvent::SelectTo(_) => "SELECT_TO",
            WorkflowEvent::SetAmount(_) => "SET_AMOUNT",
            WorkflowEvent::Submit => "SUBMIT",
            WorkflowEvent::Valid => "VALID",
            WorkflowEvent::Invalid(_) => "INVALID",
            WorkflowEvent::Succeeded => "SUCCEEDED",
            WorkflowEvent::Failed(_) => "FAILED",
            WorkflowEvent::Dismiss => "DISMISS",
        }
    }

    fn is_form_edit(&self) -> bool {
        matches!(
            self,
            WorkflowEvent::SelectFrom(_) | WorkflowEvent::SelectTo(_) | WorkflowEvent::SetAmount(_)
        )
    }
}

/// 状态转换表（纯函数）
pub fn transition(state: &WorkflowState, event: &WorkflowEvent) -> ApiResult<WorkflowState> {
    use WorkflowEvent as E;
    use WorkflowState as S;

    let next = match (state, event) {
        (S::Idle, e) | (S::Error { .. }, e) if e.is_form_edit() => S::Idle,
        (S::Idle, E::Submit) | (S::Error { .. }, E::Submit) => S::Validating,
        (S::Idle, E::Dismiss) | (S::Error { .. }, E::Dismiss) => S::Idle,
        (S::Validating, E::Valid) => S::Submitting,
        (S::Validating, E::Invalid(message)) => S::Error {
            message: message.clone(),
        },
        (S::Submitting, E::Succeeded) => S::Idle,
        (S::Submitting, E::Failed(message)) => S::Error {
            message: message.clone(),
        },
        _ => {
            return Err(ApiError::InvalidStateTransition {
                from: state.to_string(),
                event: event.name().to_string(),
            })
        }
    };
    Ok(next)
}

// ==========================================
// Notice - 操作结果提示
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    Success(String),
    Error(String),
}

// ==========================================
// MoveForm - 转移表单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveForm {
    pub from_key: Option<String>,
    pub to_key: Option<String>,
    pub amount_mt: f64,
}

impl Default for MoveForm {
    fn default() -> Self {
        Self {
            from_key: None,
            to_key: None,
            amount_mt: 0.0,
        }
    }
}

impl MoveForm {
    fn to_request(&self) -> MoveRequest {
        MoveRequest::new(
            self.from_key.clone().unwrap_or_default(),
            self.to_key.clone().unwrap_or_default(),
            self.amount_mt,
        )
    }
}

// ==========================================
// TransferWorkflow
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    pub form: MoveForm,
    pub notice: Option<Notice>,
}

#[derive(Debug)]
pub struct TransferWorkflow {
    state: WorkflowState,
    form: MoveForm,
    notice: Option<Notice>,
    /// 最近一次渲染的站点列表（校验与提示文本使用）
    sites: Vec<SiteOption>,
}

impl Default for TransferWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferWorkflow {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            form: MoveForm::default(),
            notice: None,
            sites: Vec::new(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn form(&self) -> &MoveForm {
        &self.form
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            state: self.state.clone(),
            form: self.form.clone(),
            notice: self.notice.clone(),
        }
    }

    /// 同步最近一次渲染的站点列表
    ///
    /// 表单中已不存在的站点会被清空。
    pub fn sync_sites(&mut self, sites: &[SiteOption]) {
        self.sites = sites.to_vec();
        let known = |key: &Option<String>| {
            key.as_ref()
                .map(|k| self.sites.iter().any(|s| &s.key == k))
                .unwrap_or(true)
        };
        if !known(&self.form.from_key) {
            self.form.from_key = None;
        }
        if !known(&self.form.to_key) {
            self.form.to_key = None;
        }
    }

    /// 应用事件
    pub fn apply(&mut self, event: WorkflowEvent) -> ApiResult<&WorkflowState> {
        let next = transition(&self.state, &event)?;
        tracing::debug!(from = %self.state, event = event.name(), to = %next, "工作流状态转换");

        match event {
            WorkflowEvent::SelectFrom(key) => self.form.from_key = Some(key),
            WorkflowEvent::SelectTo(key) => self.form.to_key = Some(key),
            WorkflowEvent::SetAmount(amount) => self.form.amount_mt = amount,
            WorkflowEvent::Dismiss => self.notice = None,
            WorkflowEvent::Invalid(ref message) | WorkflowEvent::Failed(ref message) => {
                self.notice = Some(Notice::Error(message.clone()))
            }
            _ => {}
        }
        if matches!(next, WorkflowState::Idle) && !matches!(self.state, WorkflowState::Submitting)
        {
            // 编辑/关闭时清掉上一次的错误提示，成功提示保留到下一次编辑
            if matches!(self.notice, Some(Notice::Error(_))) {
                self.notice = None;
            }
        }

        self.state = next;
        Ok(&self.state)
    }

    pub fn select_from(&mut self, site_key: impl Into<String>) -> ApiResult<&WorkflowState> {
        self.apply(WorkflowEvent::SelectFrom(site_key.into()))
    }

    pub fn select_to(&mut self, site_key: impl Into<String>) -> ApiResult<&WorkflowState> {
        self.apply(WorkflowEvent::SelectTo(site_key.into()))
    }

    pub fn set_amount(&mut self, amount_mt: f64) -> ApiResult<&WorkflowState> {
        self.apply(WorkflowEvent::SetAmount(amount_mt))
    }

    pub fn dismiss(&mut self) -> ApiResult<&WorkflowState> {
        self.apply(WorkflowEvent::Dismiss)
    }

    // ==========================================
    // 提交
    // ==========================================

    /// 提交转移表单
    ///
    /// 校验失败: Error，不访问数据库，不清缓存
    /// 过程失败: Error（消息原样），不清缓存
    /// 成功: Idle + 成功提示，清空查询缓存
    pub async fn submit_move(
        &mut self,
        transfer_api: &TransferApi,
        read_api: &ReadApi,
        actor: &str,
    ) -> ApiResult<MoveOutcome> {
        self.apply(WorkflowEvent::Submit)?;

        let request = self.form.to_request();
        if let Err(e) = validate_move(&request, &self.site_keys()) {
            self.apply(WorkflowEvent::Invalid(e.to_string()))?;
            return Err(e);
        }
        self.apply(WorkflowEvent::Valid)?;

        match transfer_api.move_material(request, actor).await {
            Ok(outcome) => {
                read_api.invalidate();
                let message = self.move_confirmation(&outcome);
                self.apply(WorkflowEvent::Succeeded)?;
                self.notice = Some(Notice::Success(message));
                Ok(outcome)
            }
            Err(e) => {
                self.apply(WorkflowEvent::Failed(e.to_string()))?;
                Err(e)
            }
        }
    }

    /// 重置单站点覆写
    pub async fn submit_reset_site(
        &mut self,
        site_key: &str,
        transfer_api: &TransferApi,
        read_api: &ReadApi,
        actor: &str,
    ) -> ApiResult<ResetOutcome> {
        self.apply(WorkflowEvent::Submit)?;

        if let Err(e) = validate_reset_site(site_key, &self.site_keys()) {
            self.apply(WorkflowEvent::Invalid(e.to_string()))?;
            return Err(e);
        }
        self.apply(WorkflowEvent::Valid)?;

        let result = transfer_api.reset_site(site_key, actor).await;
        self.finish_reset(result, read_api)
    }

    /// 重置全部覆写
    pub async fn submit_reset_all(
        &mut self,
        transfer_api: &TransferApi,
        read_api: &ReadApi,
        actor: &str,
    ) -> ApiResult<ResetOutcome> {
        self.apply(WorkflowEvent::Submit)?;
        self.apply(WorkflowEvent::Valid)?;

        let result = transfer_api.reset_all(actor).await;
        self.finish_reset(result, read_api)
    }

    fn finish_reset(
        &mut self,
        result: ApiResult<ResetOutcome>,
        read_api: &ReadApi,
    ) -> ApiResult<ResetOutcome> {
        match result {
            Ok(outcome) => {
                read_api.invalidate();
                let message = self.reset_confirmation(&outcome);
                self.apply(WorkflowEvent::Succeeded)?;
                self.notice = Some(Notice::Success(message));
                Ok(outcome)
            }
            Err(e) => {
                self.apply(WorkflowEvent::Failed(e.to_string()))?;
                Err(e)
            }
        }
    }

    // ==========================================
    // 提示文本
    // ==========================================

    fn site_keys(&self) -> Vec<String> {
        self.sites.iter().map(|s| s.key.clone()).collect()
    }

    fn site_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.sites
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.name.as_str())
            .unwrap_or(key)
    }

    /// "Moved 20.00 MT from SiteA to SiteB. SiteA: 100.00 → 80.00; SiteB: 50.00 → 70.00"
    pub fn move_confirmation(&self, outcome: &MoveOutcome) -> String {
        let totals = &outcome.totals;
        t_with_args(
            "transfer.moved",
            &[
                ("amount", &format_thousands(outcome.request.delta_mt, 2)),
                ("from", self.site_name(&outcome.request.from_key)),
                ("to", self.site_name(&outcome.request.to_key)),
                ("from_before", &format_thousands(totals.from_before, 2)),
                ("from_after", &format_thousands(totals.from_after, 2)),
                ("to_before", &format_thousands(totals.to_before, 2)),
                ("to_after", &format_thousands(totals.to_after, 2)),
            ],
        )
    }

    pub fn reset_confirmation(&self, outcome: &ResetOutcome) -> String {
        let count = outcome.rows_reset.to_string();
        match &outcome.scope {
            ResetScope::Site(key) => t_with_args(
                "transfer.reset_site",
                &[("count", &count), ("site", self.site_name(key))],
            ),
            ResetScope::All => t_with_args("transfer.reset_all", &[("count", &count)]),
        }
    }
}
