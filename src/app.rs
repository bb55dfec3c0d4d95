use crate::api::AdminApi;
use crate::chart::ChartAdapter;
use crate::commands::{self, CreateUserForm, FormMessage, Outcome};
use crate::input::InputSource;
use crate::models::{PeriodKey, UserId};
use crate::stats::StatisticsRequestor;
use crate::tables::{ClickTable, RowAction, UserTable};
use std::str::FromStr;

pub const HELP: &str = "commands: create | edit <id> | renew <id> | delete <id> | period <daily|weekly|monthly> | refresh | show | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Create,
    Edit(UserId),
    Renew(UserId),
    Delete(UserId),
    Period(PeriodKey),
    Refresh,
    Show,
    Help,
    Quit,
}

impl From<RowAction> for Event {
    fn from(action: RowAction) -> Self {
        match action {
            RowAction::Edit(id) => Event::Edit(id),
            RowAction::Renew(id) => Event::Renew(id),
            RowAction::Delete(id) => Event::Delete(id),
        }
    }
}

impl FromStr for Event {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments for '{command}'"));
        }

        let user_id = || -> Result<UserId, String> {
            let raw = argument.ok_or_else(|| format!("'{command}' needs a user id"))?;
            raw.parse().map_err(|_| format!("invalid user id '{raw}'"))
        };

        match command.as_str() {
            "create" => Ok(Event::Create),
            "edit" => user_id().map(Event::Edit),
            "renew" => user_id().map(Event::Renew),
            "delete" => user_id().map(Event::Delete),
            "period" => argument
                .ok_or_else(|| "'period' needs a period key".to_string())?
                .parse()
                .map(Event::Period),
            "refresh" => Ok(Event::Refresh),
            "show" | "" => Ok(Event::Show),
            "help" => Ok(Event::Help),
            "quit" | "exit" => Ok(Event::Quit),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Wires operator events to commands and the statistics chart.
pub struct Dashboard<A, C: ChartAdapter> {
    api: A,
    users: UserTable,
    clicks: ClickTable,
    stats: StatisticsRequestor<C>,
    create_form: CreateUserForm,
}

impl<A: AdminApi, C: ChartAdapter> Dashboard<A, C> {
    pub fn new(api: A, chart_adapter: C) -> Self {
        Self {
            api,
            users: UserTable::default(),
            clicks: ClickTable::default(),
            stats: StatisticsRequestor::new(chart_adapter),
            create_form: CreateUserForm::default(),
        }
    }

    pub fn users(&self) -> &UserTable {
        &self.users
    }

    pub fn clicks(&self) -> &ClickTable {
        &self.clicks
    }

    pub fn stats(&self) -> &StatisticsRequestor<C> {
        &self.stats
    }

    pub fn create_form(&self) -> &CreateUserForm {
        &self.create_form
    }

    /// Users, click log and default-period statistics, fetched concurrently.
    pub async fn initial_load(&mut self) {
        self.load_all(PeriodKey::default()).await;
    }

    async fn load_all(&mut self, period: PeriodKey) {
        let Self {
            api, users, clicks, stats, ..
        } = self;
        tokio::join!(users.refresh(&*api), clicks.refresh(&*api), stats.load(&*api, period));
    }

    pub async fn handle(&mut self, event: Event, input: &mut dyn InputSource) -> Flow {
        match event {
            Event::Create => {
                if fill_create_form(&mut self.create_form, input) == Outcome::Aborted {
                    return Flow::Continue;
                }
                commands::create_user(&self.api, &mut self.create_form, &mut self.users).await;
                if let Some(FormMessage::Success(text) | FormMessage::Error(text)) = &self.create_form.message {
                    input.alert(text);
                }
            }
            Event::Edit(id) => {
                commands::edit_user(&self.api, input, &mut self.users, id).await;
            }
            Event::Renew(id) => {
                commands::renew_access(&self.api, input, &mut self.users, id).await;
            }
            Event::Delete(id) => {
                commands::delete_user(&self.api, input, &mut self.users, id).await;
            }
            Event::Period(period) => {
                self.stats.load(&self.api, period).await;
            }
            Event::Refresh => self.load_all(self.stats.period()).await,
            Event::Show => {}
            Event::Help => input.alert(HELP),
            Event::Quit => return Flow::Exit,
        }
        Flow::Continue
    }
}

/// Prompts for each form field. A blank answer keeps what the form already
/// holds, so input survives a failed submission.
pub fn fill_create_form(form: &mut CreateUserForm, input: &mut dyn InputSource) -> Outcome {
    for (label, field) in [
        ("Email", &mut form.email),
        ("Username", &mut form.username),
        ("Password", &mut form.password),
    ] {
        let Some(answer) = input.prompt(&format!("{label} [{}]:", masked(label, field))) else {
            return Outcome::Aborted;
        };
        if !answer.trim().is_empty() {
            *field = answer;
        }
    }

    form.is_admin = input.confirm("Administrator?");
    form.set_lifetime(input.confirm("Lifetime access?"));
    if !form.lifetime() {
        let current = form.expires_at().to_string();
        if let Some(answer) = input.prompt(&format!("Expires at (YYYY-MM-DD HH:MM) [{current}]:")) {
            if !answer.trim().is_empty() {
                form.set_expires_at(&answer);
            }
        }
    }
    Outcome::Succeeded
}

fn masked(label: &str, value: &str) -> String {
    if label == "Password" && !value.is_empty() {
        "*".repeat(value.len())
    } else {
        value.to_string()
    }
}
