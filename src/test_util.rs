use crate::api::AdminApi;
use crate::chart::{Chart, ChartAdapter, ChartConfig};
use crate::errors::DashboardError;
use crate::input::InputSource;
use crate::models::{ClickLogRecord, NewUser, PeriodKey, StatsResponse, UserId, UserPatch, UserRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListUsers,
    CreateUser(serde_json::Value),
    UpdateUser(UserId, serde_json::Value),
    DeleteUser(UserId),
    ListClicks,
    ClickStats(PeriodKey),
}

/// In-memory backend that records every call it receives.
#[derive(Default)]
pub struct FakeApi {
    pub users: Mutex<Vec<UserRecord>>,
    pub clicks: Mutex<Vec<ClickLogRecord>>,
    pub stats: Mutex<Option<StatsResponse>>,
    pub fail_reads: Mutex<bool>,
    pub fail_writes: Mutex<Option<DashboardError>>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        let api = Self::default();
        *api.users.lock().unwrap() = users;
        api
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::CreateUser(_) | Call::UpdateUser(..) | Call::DeleteUser(_)))
            .count()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    pub fn fail_writes_with(&self, err: DashboardError) {
        *self.fail_writes.lock().unwrap() = Some(err);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn read_result(&self) -> Result<(), DashboardError> {
        if *self.fail_reads.lock().unwrap() {
            return Err(DashboardError::Status { status: 500, message: None });
        }
        Ok(())
    }

    fn write_result(&self) -> Result<(), DashboardError> {
        match self.fail_writes.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, DashboardError> {
        self.record(Call::ListUsers);
        self.read_result()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, user: &NewUser) -> Result<(), DashboardError> {
        self.record(Call::CreateUser(serde_json::to_value(user).unwrap()));
        self.write_result()
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<(), DashboardError> {
        self.record(Call::UpdateUser(id, serde_json::to_value(patch).unwrap()));
        self.write_result()
    }

    async fn delete_user(&self, id: UserId) -> Result<(), DashboardError> {
        self.record(Call::DeleteUser(id));
        self.write_result()?;
        self.users.lock().unwrap().retain(|user| user.id != id);
        Ok(())
    }

    async fn list_clicks(&self) -> Result<Vec<ClickLogRecord>, DashboardError> {
        self.record(Call::ListClicks);
        self.read_result()?;
        Ok(self.clicks.lock().unwrap().clone())
    }

    async fn click_stats(&self, period: PeriodKey) -> Result<StatsResponse, DashboardError> {
        self.record(Call::ClickStats(period));
        self.read_result()?;
        self.stats
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DashboardError::Status { status: 404, message: None })
    }
}

pub fn user(id: i64, name: &str, expires_at: Option<DateTime<Utc>>) -> UserRecord {
    UserRecord {
        id: UserId(id),
        email: format!("{name}@example.com"),
        username: name.to_string(),
        is_admin: false,
        access_expires_at: expires_at,
        last_analysis_started_at: None,
    }
}

pub fn stats(labels: &[&str], telegram: &[u64], compra: &[u64], total: &[u64]) -> StatsResponse {
    StatsResponse {
        labels: labels.iter().map(|label| label.to_string()).collect(),
        telegram: telegram.to_vec(),
        compra: compra.to_vec(),
        total: total.to_vec(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    Created(usize),
    Destroyed(usize),
}

/// Chart adapter that logs chart lifecycle and tracks how many charts are live.
#[derive(Default, Clone)]
pub struct RecordingAdapter {
    pub events: Rc<RefCell<Vec<ChartEvent>>>,
    pub live: Rc<RefCell<usize>>,
    pub max_live: Rc<RefCell<usize>>,
    pub configs: Rc<RefCell<Vec<ChartConfig>>>,
}

pub struct RecordedChart {
    serial: usize,
    adapter: RecordingAdapter,
}

impl ChartAdapter for RecordingAdapter {
    type Chart = RecordedChart;

    fn draw(&mut self, config: ChartConfig) -> RecordedChart {
        let serial = self.configs.borrow().len();
        self.configs.borrow_mut().push(config);
        self.events.borrow_mut().push(ChartEvent::Created(serial));
        *self.live.borrow_mut() += 1;
        let live = *self.live.borrow();
        let mut max_live = self.max_live.borrow_mut();
        *max_live = (*max_live).max(live);
        RecordedChart {
            serial,
            adapter: self.clone(),
        }
    }
}

impl Chart for RecordedChart {
    fn destroy(&mut self) {
        self.adapter.events.borrow_mut().push(ChartEvent::Destroyed(self.serial));
        *self.adapter.live.borrow_mut() -= 1;
    }

    fn lines(&self) -> Vec<String> {
        vec![format!("chart #{}", self.serial)]
    }
}

/// Pre-recorded answers, consumed in order. Records every notice shown.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<Option<String>>,
    confirmations: VecDeque<bool>,
    pub prompts: Vec<String>,
    pub alerts: Vec<String>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, text: &str) -> Self {
        self.answers.push_back(Some(text.to_string()));
        self
    }

    pub fn cancel(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    pub fn confirming(mut self, yes: bool) -> Self {
        self.confirmations.push_back(yes);
        self
    }
}

impl InputSource for ScriptedInput {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.prompts.push(message.to_string());
        self.answers.pop_front().flatten()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.confirmations.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[test]
fn scripted_input_defaults_to_cancel_and_decline() {
    let mut input = ScriptedInput::new().answer("x");
    assert_eq!(input.prompt("a").as_deref(), Some("x"));
    assert_eq!(input.prompt("b"), None);
    assert!(!input.confirm("c"));
    assert_eq!(input.prompts.len(), 3);
}
