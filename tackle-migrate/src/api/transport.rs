//! Transport abstraction over a Tackle REST instance
//!
//! Everything the migration engine does goes through [`Transport::execute`].
//! The provided helpers turn non-2xx results of required calls into
//! [`RequestError`]s and unwrap collection envelopes, so the engine only
//! deals with plain JSON records.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::operations::{Operation, OperationResult};

/// Executes operations against one Tackle instance
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable label used in diagnostics ("source", "destination")
    fn label(&self) -> &str;

    /// Execute a single operation.
    ///
    /// Non-2xx responses are reported as an unsuccessful [`OperationResult`];
    /// `Err` is reserved for failures to talk to the server at all.
    async fn execute(&self, operation: &Operation) -> Result<OperationResult>;

    /// Execute an operation that must succeed and return its response body
    async fn require(&self, operation: Operation) -> Result<Value> {
        let result = self.execute(&operation).await?;
        let status = result.status_code;
        result.into_result().map_err(|message| {
            anyhow::Error::new(RequestError {
                target: self.label().to_string(),
                method: operation.http_method(),
                path: operation.path().to_string(),
                status,
                message,
            })
        })
    }

    /// GET a collection, accepting both bare arrays and envelopes
    async fn list(&self, path: &str) -> Result<Vec<Value>> {
        let body = self.require(Operation::list(path)).await?;
        collection_from(body).with_context(|| format!("Unexpected response from {} {}", self.label(), path))
    }

    /// GET a single resource
    async fn get(&self, path: &str) -> Result<Value> {
        self.require(Operation::get(path)).await
    }

    /// POST a request body to a read-only endpoint returning a collection
    async fn query(&self, path: &str, body: Value) -> Result<Vec<Value>> {
        let response = self.require(Operation::query(path, body)).await?;
        collection_from(response).with_context(|| format!("Unexpected response from {} {}", self.label(), path))
    }
}

/// A required call answered with a non-2xx status
#[derive(Debug, Clone, PartialEq)]
pub struct RequestError {
    pub target: String,
    pub method: &'static str,
    pub path: String,
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "{} {} {} failed with HTTP {}: {}",
                self.target, self.method, self.path, status, self.message
            ),
            None => write!(
                f,
                "{} {} {} failed: {}",
                self.target, self.method, self.path, self.message
            ),
        }
    }
}

impl std::error::Error for RequestError {}

/// Extract the record array from a collection response.
///
/// Accepted shapes:
/// - a bare JSON array
/// - `{"_embedded": {"<resource>": [...]}, "page": {...}}`
/// - `{"<resource>": [...]}`
/// - `null` (treated as an empty collection)
///
/// Inside an envelope, the record array is the one holding objects. Two
/// non-empty record arrays make the response ambiguous and are rejected.
pub fn collection_from(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => {
            if let Some(embedded) = map.remove("_embedded") {
                let Value::Object(embedded) = embedded else {
                    anyhow::bail!("'_embedded' is not an object");
                };
                // An empty page comes back without a resource key at all
                return Ok(record_array(embedded)?.unwrap_or_default());
            }
            record_array(map)?
                .ok_or_else(|| anyhow::anyhow!("object response contains no record array"))
        }
        other => anyhow::bail!("expected a collection, got {}", kind_of(&other)),
    }
}

/// The array of records among the values of `map`; `None` if no value is an array
fn record_array(map: Map<String, Value>) -> Result<Option<Vec<Value>>> {
    let arrays: Vec<(String, Vec<Value>)> = map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Array(items) => Some((key, items)),
            _ => None,
        })
        .collect();
    if arrays.is_empty() {
        return Ok(None);
    }

    let mut records: Vec<_> = arrays
        .into_iter()
        .filter(|(_, items)| !items.is_empty() && items.iter().all(Value::is_object))
        .collect();
    match records.len() {
        0 => Ok(Some(Vec::new())),
        1 => Ok(records.pop().map(|(_, items)| items)),
        _ => {
            let keys: Vec<_> = records.iter().map(|(key, _)| key.as_str()).collect();
            anyhow::bail!("ambiguous response, records under {}", keys.join(", "))
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
