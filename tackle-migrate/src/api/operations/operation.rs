//! Core Operation types for Tackle REST calls

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a single request that can be executed against a Tackle instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Fetch a collection (bare array or wrapped in an envelope)
    List {
        /// Collection path relative to the instance url (e.g., "/hub/tags")
        path: String,
    },
    /// Fetch a single resource
    Get {
        /// Resource path (e.g., "/api/pathfinder/assessments/12")
        path: String,
    },
    /// Read-only POST that carries a request body and returns a collection
    ///
    /// Used by endpoints that compute per-application data from a list of
    /// application identifiers.
    Query {
        /// Endpoint path
        path: String,
        /// Request body as JSON
        body: Value,
    },
    /// Create a new record
    Create {
        /// Collection path
        path: String,
        /// Record data as JSON
        data: Value,
    },
    /// Delete a record
    Delete {
        /// Resource path including the record id
        path: String,
    },
}

/// Outcome of one executed [`Operation`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    pub operation: Operation,
    /// Whether the operation succeeded (2xx)
    pub success: bool,
    /// Response body, if any
    pub data: Option<Value>,
    /// Response text of a failed call
    pub error: Option<String>,
    pub status_code: Option<u16>,
}

impl Operation {
    /// Create a new List operation
    pub fn list(path: impl Into<String>) -> Self {
        Self::List { path: path.into() }
    }

    /// Create a new Get operation
    pub fn get(path: impl Into<String>) -> Self {
        Self::Get { path: path.into() }
    }

    /// Create a new Query operation
    pub fn query(path: impl Into<String>, body: Value) -> Self {
        Self::Query {
            path: path.into(),
            body,
        }
    }

    /// Create a new Create operation
    pub fn create(path: impl Into<String>, data: Value) -> Self {
        Self::Create {
            path: path.into(),
            data,
        }
    }

    /// Create a new Delete operation
    pub fn delete(path: impl Into<String>) -> Self {
        Self::Delete { path: path.into() }
    }

    /// Get the request path for this operation
    pub fn path(&self) -> &str {
        match self {
            Self::List { path } => path,
            Self::Get { path } => path,
            Self::Query { path, .. } => path,
            Self::Create { path, .. } => path,
            Self::Delete { path } => path,
        }
    }

    pub fn http_method(&self) -> &'static str {
        match self {
            Self::List { .. } => "GET",
            Self::Get { .. } => "GET",
            Self::Query { .. } => "POST",
            Self::Create { .. } => "POST",
            Self::Delete { .. } => "DELETE",
        }
    }

    /// Request body, for operations that send one
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Query { body, .. } => Some(body),
            Self::Create { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Short name used in logs and by test doubles
    pub fn operation_type(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Get { .. } => "get",
            Self::Query { .. } => "query",
            Self::Create { .. } => "create",
            Self::Delete { .. } => "delete",
        }
    }
}

impl OperationResult {
    pub fn success(operation: Operation, data: Option<Value>, status_code: u16) -> Self {
        Self {
            operation,
            success: true,
            data,
            error: None,
            status_code: Some(status_code),
        }
    }

    /// Non-2xx answer carrying the response text
    pub fn error(operation: Operation, error: String, status_code: Option<u16>) -> Self {
        Self {
            operation,
            success: false,
            data: None,
            error: Some(error),
            status_code,
        }
    }

    /// 2xx answer
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Response body on success (`Null` when empty), error text otherwise
    pub fn into_result(self) -> Result<Value, String> {
        if self.success {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(self.error.unwrap_or_else(|| "no response body".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_methods() {
        assert_eq!(Operation::list("/hub/tags").http_method(), "GET");
        assert_eq!(Operation::get("/hub/tags/1").http_method(), "GET");
        assert_eq!(Operation::query("/api/x", json!([])).http_method(), "POST");
        assert_eq!(Operation::create("/hub/tags", json!({})).http_method(), "POST");
        assert_eq!(Operation::delete("/hub/tags/1").http_method(), "DELETE");
    }

    #[test]
    fn test_body_only_on_writes_and_queries() {
        assert!(Operation::list("/hub/tags").body().is_none());
        assert!(Operation::delete("/hub/tags/1").body().is_none());
        assert_eq!(
            Operation::create("/hub/tags", json!({"name": "Java"})).body(),
            Some(&json!({"name": "Java"}))
        );
    }

    #[test]
    fn test_into_result() {
        let ok = OperationResult::success(Operation::list("/hub/tags"), None, 200);
        assert_eq!(ok.into_result(), Ok(Value::Null));

        let failed = OperationResult::error(
            Operation::delete("/hub/tags/3"),
            "not found".to_string(),
            Some(404),
        );
        assert!(!failed.is_success());
        assert_eq!(failed.into_result(), Err("not found".to_string()));
    }
}
