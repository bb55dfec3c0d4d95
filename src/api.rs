use crate::config::DashboardConfig;
use crate::errors::DashboardError;
use crate::models::{
    ClickLogRecord, ClickLogResponse, CreateUserResponse, NewUser, PeriodKey, StatsResponse, UserId,
    UserPatch, UserRecord, UsersResponse,
};
use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

/// The user-management backend as seen by the dashboard.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, DashboardError>;
    async fn create_user(&self, user: &NewUser) -> Result<(), DashboardError>;
    /// Keys absent from `patch` must be left untouched by the backend.
    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<(), DashboardError>;
    async fn delete_user(&self, id: UserId) -> Result<(), DashboardError>;
    async fn list_clicks(&self) -> Result<Vec<ClickLogRecord>, DashboardError>;
    async fn click_stats(&self, period: PeriodKey) -> Result<StatsResponse, DashboardError>;
}

pub struct HttpAdminApi {
    http_client: Client,
    base_url: Url,
}

impl HttpAdminApi {
    pub fn new(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|err| DashboardError::Config(format!("ADMIN_SESSION_COOKIE: {err}")))?;
            headers.insert(COOKIE, value);
        }
        let http_client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http_client,
            base_url: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, DashboardError> {
        self.base_url
            .join(path)
            .map_err(|err| DashboardError::Config(format!("{path}: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        let url = self.url(path)?;
        debug!("GET {url}");
        let response = ensure_success(self.http_client.get(url).send().await?).await?;
        response.json().await.map_err(DashboardError::invalid_response)
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn list_users(&self) -> Result<Vec<UserRecord>, DashboardError> {
        let payload: UsersResponse = self.get_json("/api/admin/users").await?;
        Ok(payload.users)
    }

    async fn create_user(&self, user: &NewUser) -> Result<(), DashboardError> {
        let url = self.url("/api/admin/users")?;
        debug!("POST {url}");
        let response = self.http_client.post(url).json(user).send().await?;
        let status = response.status();
        let body: CreateUserResponse = response.json().await.unwrap_or_default();

        if !status.is_success() {
            return Err(DashboardError::Status {
                status: status.as_u16(),
                message: body.error,
            });
        }
        if !body.ok {
            return Err(DashboardError::Rejected { message: body.error });
        }
        Ok(())
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<(), DashboardError> {
        let url = self.url(&format!("/api/admin/users/{id}"))?;
        debug!("PUT {url}");
        ensure_success(self.http_client.put(url).json(patch).send().await?).await?;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), DashboardError> {
        let url = self.url(&format!("/api/admin/users/{id}"))?;
        debug!("DELETE {url}");
        ensure_success(self.http_client.delete(url).send().await?).await?;
        Ok(())
    }

    async fn list_clicks(&self) -> Result<Vec<ClickLogRecord>, DashboardError> {
        let payload: ClickLogResponse = self.get_json("/api/admin/clicks/list").await?;
        Ok(payload.logs)
    }

    async fn click_stats(&self, period: PeriodKey) -> Result<StatsResponse, DashboardError> {
        let mut url = self.url("/api/admin/clicks/stats")?;
        url.query_pairs_mut().append_pair("period", period.as_str());
        debug!("GET {url}");
        let response = ensure_success(self.http_client.get(url).send().await?).await?;
        response.json().await.map_err(DashboardError::invalid_response)
    }
}

/// Any non-2xx status is a failure regardless of body.
async fn ensure_success(response: Response) -> Result<Response, DashboardError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<CreateUserResponse>()
        .await
        .ok()
        .and_then(|body| body.error);
    Err(DashboardError::Status {
        status: status.as_u16(),
        message,
    })
}
