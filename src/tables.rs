use crate::api::AdminApi;
use crate::models::{ClickLogRecord, UserId, UserRecord};
use crate::status::{ExpirationStatus, classify_expiration, format_instant, format_optional_instant};
use chrono::{DateTime, Utc};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit(UserId),
    Renew(UserId),
    Delete(UserId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub expiration: ExpirationStatus,
    pub last_analysis: String,
    pub actions: [RowAction; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClickRow {
    pub id: i64,
    pub actor: String,
    pub button: String,
    pub clicked_at: String,
}

#[derive(Debug, Default)]
pub struct UserTable {
    rows: Vec<UserRow>,
}

impl UserTable {
    pub fn rows(&self) -> &[UserRow] {
        &self.rows
    }

    /// Replaces every row, keeping the order the backend returned.
    pub fn render(&mut self, records: &[UserRecord], now: DateTime<Utc>) {
        self.rows = records.iter().map(|record| user_row(record, now)).collect();
    }

    /// A failed fetch leaves the current rows in place.
    pub async fn refresh<A: AdminApi + ?Sized>(&mut self, api: &A) {
        match api.list_users().await {
            Ok(records) => self.render(&records, Utc::now()),
            Err(err) => warn!("user list not refreshed: {err}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ClickTable {
    rows: Vec<ClickRow>,
}

impl ClickTable {
    pub fn rows(&self) -> &[ClickRow] {
        &self.rows
    }

    pub fn render(&mut self, records: &[ClickLogRecord]) {
        self.rows = records.iter().map(click_row).collect();
    }

    pub async fn refresh<A: AdminApi + ?Sized>(&mut self, api: &A) {
        match api.list_clicks().await {
            Ok(records) => self.render(&records),
            Err(err) => warn!("click log not refreshed: {err}"),
        }
    }
}

fn user_row(record: &UserRecord, now: DateTime<Utc>) -> UserRow {
    let id = record.id;
    UserRow {
        id,
        email: record.email.clone(),
        username: record.username.clone(),
        is_admin: record.is_admin,
        expiration: classify_expiration(record.access_expires_at, now),
        last_analysis: format_optional_instant(record.last_analysis_started_at),
        actions: [RowAction::Edit(id), RowAction::Renew(id), RowAction::Delete(id)],
    }
}

fn click_row(record: &ClickLogRecord) -> ClickRow {
    let actor = record
        .username
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| record.user_id.to_string());

    ClickRow {
        id: record.id,
        actor,
        button: record.button_name.clone(),
        clicked_at: format_instant(record.clicked_at),
    }
}
