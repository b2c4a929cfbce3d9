use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::catalog::CatalogOps;
use crate::entity::{IcatEntity, Rule};
use crate::error::{IcatError, IcatResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Session against a live ICAT server's REST interface. One blocking-style
/// request at a time; the handle is never shared across tasks.
pub struct IcatSession {
    http: reqwest::Client,
    base: String,
    session_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    session_id: String,
}

/// Error envelope the server returns, e.g. `{"code":"OBJECT_ALREADY_EXISTS",
/// "message":"..."}`.
#[derive(Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl IcatSession {
    /// Build an unauthenticated session handle. `tls_verify = false` accepts
    /// self-signed certificates, common on development deployments.
    pub fn connect(endpoint: &str, tls_verify: bool) -> IcatResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!tls_verify)
            .build()?;

        Ok(IcatSession {
            http,
            base: endpoint.trim_end_matches('/').to_owned(),
            session_id: None,
        })
    }

    fn session_id(&self) -> IcatResult<&str> {
        self.session_id
            .as_deref()
            .ok_or_else(|| IcatError::Protocol("entityManager call before login".to_owned()))
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) if !body.message.is_empty() => format!("{} ({})", body.message, body.code),
            _ => format!("HTTP {status}"),
        }
    }

    /// POST a batch of enveloped records to the entityManager endpoint.
    async fn submit(&self, context: &str, entities: Value) -> IcatResult<()> {
        let session_id = self.session_id()?;
        let payload = entities.to_string();
        let response = self
            .http
            .post(format!("{}/icat/entityManager", self.base))
            .form(&[("sessionId", session_id), ("entities", payload.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IcatError::Rejected {
                context: context.to_owned(),
                message: Self::error_message(response).await,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogOps for IcatSession {
    async fn login(&mut self, mechanism: &str, credentials: &[(String, String)]) -> IcatResult<()> {
        let credentials: Vec<Value> = credentials
            .iter()
            .map(|(key, value)| serde_json::json!({ (key.as_str()): value }))
            .collect();
        let payload =
            serde_json::json!({"plugin": mechanism, "credentials": credentials}).to_string();

        let response = self
            .http
            .post(format!("{}/icat/session", self.base))
            .form(&[("json", payload.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IcatError::Auth {
                mechanism: mechanism.to_owned(),
                message: Self::error_message(response).await,
            });
        }

        let body: LoginResponse = response.json().await?;
        debug!(endpoint = %self.base, mechanism, "logged in");
        self.session_id = Some(body.session_id);
        Ok(())
    }

    async fn get(&self, entity_type: &str, id: i64) -> IcatResult<Value> {
        let session_id = self.session_id()?;
        let query = format!("SELECT o FROM {entity_type} o WHERE o.id = {id}");
        let response = self
            .http
            .get(format!("{}/icat/entityManager", self.base))
            .query(&[("sessionId", session_id), ("query", query.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IcatError::Rejected {
                context: format!("lookup of {entity_type} {id}"),
                message: Self::error_message(response).await,
            });
        }

        let mut rows: Vec<Value> = response.json().await?;
        if rows.is_empty() {
            return Err(IcatError::NotFound {
                entity_type: entity_type.to_owned(),
                id,
            });
        }

        // Each row comes back enveloped, {"Facility": {..fields..}}.
        let row = rows.swap_remove(0);
        match row.get(entity_type) {
            Some(fields) => Ok(fields.clone()),
            None => Err(IcatError::Protocol(format!(
                "row not enveloped as {entity_type}: {row}"
            ))),
        }
    }

    async fn create(&self, entity: Value) -> IcatResult<()> {
        self.submit("record creation", Value::Array(vec![entity]))
            .await
    }

    async fn create_many(&self, entities: Vec<Value>) -> IcatResult<()> {
        debug!(count = entities.len(), "bulk create");
        self.submit("bulk record creation", Value::Array(entities))
            .await
    }

    async fn create_rules(&self, crud_flags: &str, tables: &[&str]) -> IcatResult<()> {
        let rules: Vec<Value> = tables
            .iter()
            .map(|table| Rule::for_table(crud_flags, table).envelope())
            .collect();
        debug!(count = rules.len(), crud_flags, "creating table rules");
        self.submit("rule creation", Value::Array(rules)).await
    }
}
