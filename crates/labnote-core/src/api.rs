//! Client for the notebook's inventory REST API.
//!
//! Only the request shapes and the `{success, data}` envelope are handled
//! here; validation and stock arithmetic live on the server.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::entity::{ApiEnvelope, Entity, EntityType, LowStockAlert, UsageInput, UsageLog};
use crate::error::LabnoteError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Inventory operations the front end issues against the API.
pub trait EntityApi {
    fn list(&self, entity_type: EntityType) -> Result<Vec<Entity>, LabnoteError>;

    /// Server-side search. With no type, every entity type is queried.
    fn search(
        &self,
        entity_type: Option<EntityType>,
        query: &str,
    ) -> Result<Vec<Entity>, LabnoteError>;

    fn usage(&self, entity_type: EntityType, id: &str) -> Result<Vec<UsageLog>, LabnoteError>;

    fn record_usage(
        &self,
        entity_type: EntityType,
        id: &str,
        input: &UsageInput,
    ) -> Result<UsageLog, LabnoteError>;

    fn low_stock_alerts(&self) -> Result<Vec<LowStockAlert>, LabnoteError>;
}

/// [`EntityApi`] over HTTP with JSON bodies.
#[derive(Clone)]
pub struct HttpEntityApi {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpEntityApi {
    pub fn new(base_url: &str) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/entities/{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, LabnoteError> {
        let url = self.url(path);
        debug!(%url, "api get");
        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        let mut response = request.call()?;
        let body = response.body_mut().read_to_string()?;
        decode_envelope(&body)
    }
}

/// Decode a response body as an [`ApiEnvelope`] and unwrap its data.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, LabnoteError> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|e| LabnoteError::Decode(Box::new(e)))?;
    envelope.into_result()
}

impl EntityApi for HttpEntityApi {
    fn list(&self, entity_type: EntityType) -> Result<Vec<Entity>, LabnoteError> {
        self.get(entity_type.path_segment(), &[])
    }

    fn search(
        &self,
        entity_type: Option<EntityType>,
        query: &str,
    ) -> Result<Vec<Entity>, LabnoteError> {
        match entity_type {
            Some(t) => self.get(t.path_segment(), &[("search", query)]),
            None => {
                let mut all = Vec::new();
                for t in EntityType::ALL {
                    all.extend(self.get::<Vec<Entity>>(t.path_segment(), &[("search", query)])?);
                }
                Ok(all)
            }
        }
    }

    fn usage(&self, entity_type: EntityType, id: &str) -> Result<Vec<UsageLog>, LabnoteError> {
        self.get(&format!("{}/{id}/usage", entity_type.path_segment()), &[])
    }

    fn record_usage(
        &self,
        entity_type: EntityType,
        id: &str,
        input: &UsageInput,
    ) -> Result<UsageLog, LabnoteError> {
        let url = self.url(&format!("{}/{id}/usage", entity_type.path_segment()));
        debug!(%url, quantity = input.quantity, "api post usage");
        let mut response = self.agent.post(&url).send_json(input)?;
        let body = response.body_mut().read_to_string()?;
        decode_envelope(&body)
    }

    fn low_stock_alerts(&self) -> Result<Vec<LowStockAlert>, LabnoteError> {
        self.get("alerts/low-stock", &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let api = HttpEntityApi::new("http://lab.local:3000/");
        assert_eq!(
            api.url("genes/g-1/usage"),
            "http://lab.local:3000/api/entities/genes/g-1/usage"
        );
    }

    #[test]
    fn decode_usage_log_list() {
        let body = r#"{"success": true, "data": [
            {"entityId": "r-4", "quantity": 2.5, "unit": "mL", "usedAt": "2026-03-01T09:30:00Z"}
        ]}"#;
        let logs: Vec<UsageLog> = decode_envelope(body).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].entity_id, "r-4");
        assert_eq!(logs[0].unit.as_deref(), Some("mL"));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_envelope::<Vec<Entity>>("<html>502</html>").unwrap_err();
        assert!(matches!(err, LabnoteError::Decode(_)));
    }

    #[test]
    fn usage_input_omits_empty_fields() {
        let input = UsageInput {
            quantity: 1.0,
            unit: None,
            note: Some("miniprep".to_string()),
        };
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(json, r#"{"quantity":1.0,"note":"miniprep"}"#);
    }
}
