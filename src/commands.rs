use crate::api::AdminApi;
use crate::errors::DashboardError;
use crate::input::InputSource;
use crate::models::{Expiration, NewUser, UserId, UserPatch};
use crate::status::parse_local_datetime;
use crate::tables::UserTable;
use tracing::{info, warn};

pub const CREATED_MESSAGE: &str = "User created!";
pub const GENERIC_ERROR: &str = "Error";
pub const EDIT_FAILED: &str = "Error editing user";
pub const DELETE_FAILED: &str = "Error deleting user";
pub const RENEW_FAILED: &str = "Error renewing access";
pub const RENEWED_MESSAGE: &str = "Access renewed!";
pub const INVALID_DATE: &str = "Invalid date!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    /// Stopped before any network call.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Success(String),
    Error(String),
}

/// Input state of the create-user form. Survives failed submissions.
#[derive(Debug, Clone, Default)]
pub struct CreateUserForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub is_admin: bool,
    lifetime: bool,
    expires_at: String,
    pub message: Option<FormMessage>,
}

impl CreateUserForm {
    pub fn lifetime(&self) -> bool {
        self.lifetime
    }

    pub fn expires_at(&self) -> &str {
        &self.expires_at
    }

    /// Turning lifetime on disables the expiration input and clears it.
    pub fn set_lifetime(&mut self, lifetime: bool) {
        self.lifetime = lifetime;
        if lifetime {
            self.expires_at.clear();
        }
    }

    /// Ignored while the lifetime toggle is on.
    pub fn set_expires_at(&mut self, value: &str) {
        if !self.lifetime {
            self.expires_at = value.to_string();
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_payload(&self) -> Result<NewUser, DashboardError> {
        let email = required(&self.email, "email")?;
        let username = required(&self.username, "username")?;
        if self.password.is_empty() {
            return Err(DashboardError::validation("password is required"));
        }

        let access_expires_at = if self.lifetime {
            Some(Expiration::Lifetime)
        } else if self.expires_at.trim().is_empty() {
            None
        } else {
            let at = parse_local_datetime(&self.expires_at)
                .ok_or_else(|| DashboardError::validation(INVALID_DATE))?;
            Some(Expiration::At(at))
        };

        Ok(NewUser {
            email,
            username,
            password: self.password.clone(),
            is_admin: self.is_admin,
            access_expires_at,
        })
    }
}

fn required(value: &str, field: &str) -> Result<String, DashboardError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DashboardError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub async fn create_user<A: AdminApi + ?Sized>(
    api: &A,
    form: &mut CreateUserForm,
    users: &mut UserTable,
) -> Outcome {
    let payload = match form.to_payload() {
        Ok(payload) => payload,
        Err(err) => {
            form.message = Some(FormMessage::Error(err.to_string()));
            return Outcome::Aborted;
        }
    };

    match api.create_user(&payload).await {
        Ok(()) => {
            info!("created user {}", payload.username);
            form.reset();
            form.message = Some(FormMessage::Success(CREATED_MESSAGE.to_string()));
            users.refresh(api).await;
            Outcome::Succeeded
        }
        Err(err) => {
            warn!("create user failed: {err}");
            let text = err.backend_message().unwrap_or(GENERIC_ERROR).to_string();
            form.message = Some(FormMessage::Error(text));
            Outcome::Failed
        }
    }
}

/// Blank or cancelled answers leave that field out of the patch.
pub fn collect_edit(input: &mut dyn InputSource) -> UserPatch {
    let mut ask = |message: &str| input.prompt(message).filter(|answer| !answer.is_empty());
    UserPatch {
        username: ask("New username (leave blank to keep):"),
        email: ask("New email (leave blank to keep):"),
        password: ask("New password (leave blank to keep):"),
        access_expires_at: None,
    }
}

pub async fn edit_user<A: AdminApi + ?Sized>(
    api: &A,
    input: &mut dyn InputSource,
    users: &mut UserTable,
    id: UserId,
) -> Outcome {
    let patch = collect_edit(input);
    match api.update_user(id, &patch).await {
        Ok(()) => {
            info!("edited user {id}");
            users.refresh(api).await;
            Outcome::Succeeded
        }
        Err(err) => {
            warn!("edit user {id} failed: {err}");
            input.alert(EDIT_FAILED);
            Outcome::Failed
        }
    }
}

pub async fn delete_user<A: AdminApi + ?Sized>(
    api: &A,
    input: &mut dyn InputSource,
    users: &mut UserTable,
    id: UserId,
) -> Outcome {
    if !input.confirm(&format!("Delete user {id}?")) {
        return Outcome::Aborted;
    }

    match api.delete_user(id).await {
        Ok(()) => {
            info!("deleted user {id}");
            users.refresh(api).await;
            Outcome::Succeeded
        }
        Err(err) => {
            warn!("delete user {id} failed: {err}");
            input.alert(DELETE_FAILED);
            Outcome::Failed
        }
    }
}

pub async fn renew_access<A: AdminApi + ?Sized>(
    api: &A,
    input: &mut dyn InputSource,
    users: &mut UserTable,
    id: UserId,
) -> Outcome {
    let Some(answer) = input.prompt("New expiration date (YYYY-MM-DD HH:MM):") else {
        return Outcome::Aborted;
    };
    let Some(until) = parse_local_datetime(&answer) else {
        input.alert(INVALID_DATE);
        return Outcome::Aborted;
    };

    match api.update_user(id, &UserPatch::renew(until)).await {
        Ok(()) => {
            info!("renewed access for user {id} until {until}");
            input.alert(RENEWED_MESSAGE);
            users.refresh(api).await;
            Outcome::Succeeded
        }
        Err(err) => {
            warn!("renew access for user {id} failed: {err}");
            input.alert(RENEW_FAILED);
            Outcome::Failed
        }
    }
}
