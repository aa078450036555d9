//! Admin panel endpoints: system stats and user role/status management

use crate::api::{paginate, segment};
use crate::client::AuthenticatedHttpClient;
use crate::error::Result;
use crate::models::{Pagination, SystemStats, UserAdminView, UserListResponse, UserRole, UserStatus};
use crate::request::ApiRequest;

pub struct AdminApi<'a> {
    client: &'a AuthenticatedHttpClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a AuthenticatedHttpClient) -> Self {
        Self { client }
    }

    pub async fn system_stats(&self) -> Result<SystemStats> {
        self.client
            .send_json(&ApiRequest::get("/api/admin/stats"))
            .await
    }

    pub async fn list_users(&self, page: Pagination) -> Result<UserListResponse> {
        let req = paginate(ApiRequest::get("/api/admin/users"), page);
        self.client.send_json(&req).await
    }

    pub async fn update_user_role(&self, user_id: &str, role: UserRole) -> Result<UserAdminView> {
        let path = format!("/api/admin/users/{}/role", segment("user", user_id)?);
        let req = ApiRequest::patch(path).json(&serde_json::json!({ "role": role }))?;
        self.client.send_json(&req).await
    }

    pub async fn update_user_status(
        &self,
        user_id: &str,
        status: UserStatus,
    ) -> Result<UserAdminView> {
        let path = format!("/api/admin/users/{}/status", segment("user", user_id)?);
        let req = ApiRequest::patch(path).json(&serde_json::json!({ "status": status }))?;
        self.client.send_json(&req).await
    }
}
