//! Blocking HTTP implementation of the [`Api`] trait.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::auth::TokenStore;
use super::{Api, ApiError};
use crate::model::{
    Customer, CustomerDraft, LogEntry, Server, ServerDraft, SessionDraft, WaSession,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Some deployments wrap list payloads in `{"data": [...]}`, others
/// return the bare array. Accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    fn into_rows(self) -> Vec<T> {
        match self {
            ListResponse::Wrapped { data } => data,
            ListResponse::Bare(rows) => rows,
        }
    }
}

/// REST client for the automation service's admin API.
pub struct HttpApi {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApi {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = self
            .authorize(req)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let detail = resp
            .text()
            .unwrap_or_default()
            .chars()
            .take(200)
            .collect::<String>();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Auth(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail
            ))),
            _ => Err(ApiError::Http {
                status: status.as_u16(),
                detail,
            }),
        }
    }

    fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        debug!(path, "GET list");
        let resp = self.send(self.client.get(self.url(path)))?;
        let list: ListResponse<T> = resp.json().map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(list.into_rows())
    }

    fn post_json<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        debug!(path, "POST");
        self.send(self.client.post(self.url(path)).json(body))?;
        Ok(())
    }

    fn put_json<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        debug!(path, "PUT");
        self.send(self.client.put(self.url(path)).json(body))?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "DELETE");
        self.send(self.client.delete(self.url(path)))?;
        Ok(())
    }
}

impl Api for HttpApi {
    fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.get_list("customers")
    }

    fn list_sessions(&self) -> Result<Vec<WaSession>, ApiError> {
        self.get_list("sessions")
    }

    fn list_servers(&self) -> Result<Vec<Server>, ApiError> {
        self.get_list("servers")
    }

    fn list_logs(&self) -> Result<Vec<LogEntry>, ApiError> {
        self.get_list("logs")
    }

    fn create_customer(&self, draft: &CustomerDraft) -> Result<(), ApiError> {
        self.post_json("customers", draft)
    }

    fn update_customer(&self, id: &str, draft: &CustomerDraft) -> Result<(), ApiError> {
        self.put_json(&format!("customers/{}", id), draft)
    }

    fn delete_customer(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("customers/{}", id))
    }

    fn create_session(&self, draft: &SessionDraft) -> Result<(), ApiError> {
        self.post_json("sessions", draft)
    }

    fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("sessions/{}", id))
    }

    fn create_server(&self, draft: &ServerDraft) -> Result<(), ApiError> {
        self.post_json("servers", draft)
    }

    fn update_server(&self, id: &str, draft: &ServerDraft) -> Result<(), ApiError> {
        self.put_json(&format!("servers/{}", id), draft)
    }

    fn delete_server(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("servers/{}", id))
    }

    fn restart_server(&self, id: &str) -> Result<(), ApiError> {
        self.post_json(&format!("servers/{}/restart", id), &serde_json::json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_accepts_both_shapes() {
        let wrapped: ListResponse<u32> = serde_json::from_str(r#"{"data": [1, 2]}"#).unwrap();
        assert_eq!(wrapped.into_rows(), vec![1, 2]);

        let bare: ListResponse<u32> = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(bare.into_rows(), vec![3, 4]);
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let tokens: Arc<dyn TokenStore> = Arc::new(super::super::MemoryTokenStore::new(None));
        let api = HttpApi::new("http://localhost:8080/api/", tokens).unwrap();
        assert_eq!(api.url("customers"), "http://localhost:8080/api/customers");
    }
}
