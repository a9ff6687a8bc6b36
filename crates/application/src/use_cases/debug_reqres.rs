//! ReqRes diagnostic.
//!
//! Sends a fixed series of user requests to `ReqRes` and returns the raw
//! exchanges. Nothing is asserted; the caller prints them.

use std::sync::Arc;

use probe_domain::request::{RequestBody, RequestSpec};
use probe_domain::response::ResponseSpec;
use probe_domain::settings::UserFixture;
use serde_json::json;
use tracing::info;

use crate::clients::ReqResApi;
use crate::execute_request::ExecuteRequest;
use crate::ports::HttpClient;

/// One request of the diagnostic and what came back.
#[derive(Debug, Clone)]
pub struct DebugExchange {
    /// What the request probes.
    pub label: String,
    /// The request as sent.
    pub request: RequestSpec,
    /// The response, or the transport error message.
    pub result: Result<ResponseSpec, String>,
}

/// Use case for the `ReqRes` diagnostic.
pub struct DebugReqRes {
    executor: ExecuteRequest,
    api: ReqResApi,
}

impl DebugReqRes {
    /// Creates the use case.
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>, api: ReqResApi) -> Self {
        Self {
            executor: ExecuteRequest::new(client),
            api,
        }
    }

    /// The requests of the diagnostic, in sending order.
    #[must_use]
    pub fn requests(&self, user: &UserFixture) -> Vec<(String, RequestSpec)> {
        let manual_body = json!({"name": user.name, "job": user.job}).to_string();
        let manual = self
            .api
            .session()
            .prepare(
                RequestSpec::post("/users")
                    .with_header("Content-Type", "application/json")
                    .with_body(RequestBody::raw(manual_body, Some("application/json"))),
            );
        let promoted = UserFixture {
            name: "Jane Smith".to_string(),
            job: "Senior QA".to_string(),
        };

        vec![
            ("list users".to_string(), self.api.get_users(None)),
            ("list users, page 1".to_string(), self.api.get_users(Some(1))),
            ("create user".to_string(), self.api.create_user(user)),
            ("create user, manual JSON".to_string(), manual),
            ("update user 2".to_string(), self.api.update_user(2, &promoted)),
        ]
    }

    /// Sends every request and collects the exchanges. Failures are
    /// recorded, never returned.
    pub async fn execute(&self, user: &UserFixture) -> Vec<DebugExchange> {
        let mut exchanges = Vec::new();
        for (label, request) in self.requests(user) {
            let result = self
                .executor
                .execute(&request)
                .await
                .map_err(|e| e.to_string());
            match &result {
                Ok(response) => info!(%label, status = response.status, "reqres exchange"),
                Err(error) => info!(%label, %error, "reqres exchange failed"),
            }
            exchanges.push(DebugExchange {
                label,
                request,
                result,
            });
        }
        exchanges
    }
}
