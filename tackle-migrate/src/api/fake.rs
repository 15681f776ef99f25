//! In-memory transport used by the engine tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::operations::{Operation, OperationResult};
use super::transport::Transport;

/// Serves canned GET/query responses and records every operation.
///
/// Creates echo their body back, deletes succeed, unknown reads are 404.
#[derive(Debug, Default)]
pub struct FakeTransport {
    label: String,
    reads: HashMap<String, Value>,
    queries: HashMap<(String, String), Value>,
    failing_creates: HashSet<String>,
    failing_deletes: HashSet<String>,
    log: Mutex<Vec<Operation>>,
}

impl FakeTransport {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }

    /// Canned response for a GET path
    pub fn with_get(mut self, path: &str, body: Value) -> Self {
        self.reads.insert(path.to_string(), body);
        self
    }

    /// Canned response for a POST query with a given body
    pub fn with_query(mut self, path: &str, request: Value, body: Value) -> Self {
        self.queries.insert((path.to_string(), request.to_string()), body);
        self
    }

    /// Make creates against `path` fail with HTTP 409
    pub fn failing_create(mut self, path: &str) -> Self {
        self.failing_creates.insert(path.to_string());
        self
    }

    /// Make the delete of `path` fail with HTTP 404
    pub fn failing_delete(mut self, path: &str) -> Self {
        self.failing_deletes.insert(path.to_string());
        self
    }

    /// Every operation executed so far, in order
    pub fn operations(&self) -> Vec<Operation> {
        self.log.lock().unwrap().clone()
    }

    /// Operations of one kind ("create", "delete", ...)
    pub fn operations_of(&self, operation_type: &str) -> Vec<Operation> {
        self.operations()
            .into_iter()
            .filter(|op| op.operation_type() == operation_type)
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    fn label(&self) -> &str {
        &self.label
    }

    async fn execute(&self, operation: &Operation) -> Result<OperationResult> {
        self.log.lock().unwrap().push(operation.clone());

        let result = match operation {
            Operation::List { path } | Operation::Get { path } => match self.reads.get(path) {
                Some(body) => OperationResult::success(operation.clone(), Some(body.clone()), 200),
                None => not_found(operation),
            },
            Operation::Query { path, body } => {
                match self.queries.get(&(path.clone(), body.to_string())) {
                    Some(response) => {
                        OperationResult::success(operation.clone(), Some(response.clone()), 200)
                    }
                    None => OperationResult::success(operation.clone(), Some(Value::Array(vec![])), 200),
                }
            }
            Operation::Create { path, data } => {
                if self.failing_creates.contains(path) {
                    OperationResult::error(operation.clone(), "conflict".to_string(), Some(409))
                } else {
                    OperationResult::success(operation.clone(), Some(data.clone()), 201)
                }
            }
            Operation::Delete { path } => {
                if self.failing_deletes.contains(path) {
                    not_found(operation)
                } else {
                    OperationResult::success(operation.clone(), None, 204)
                }
            }
        };
        Ok(result)
    }
}

fn not_found(operation: &Operation) -> OperationResult {
    OperationResult::error(operation.clone(), "not found".to_string(), Some(404))
}
