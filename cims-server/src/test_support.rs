//! In-memory doubles for the database and the LLM

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::db::{DbFailure, Row, Statement, Store};
use crate::llm::{ChatCompletion, ChatRequest, LlmError};

/// What the fake database answers for one statement
pub enum Reply {
    Rows(Vec<Row>),
    Affected(u64),
}

type Responder = Box<dyn Fn(&Statement) -> Result<Reply, DbFailure> + Send + Sync>;

/// Store that records every statement and answers through a closure
pub struct FakeStore {
    calls: Mutex<Vec<Statement>>,
    respond: Responder,
}

impl FakeStore {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&Statement) -> Result<Reply, DbFailure> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// No rows for queries, one affected row for writes
    pub fn empty() -> Self {
        Self::new(|st| {
            if st.sql().trim_start().starts_with("SELECT") || st.procedure().is_some_and(is_lookup) {
                Ok(Reply::Rows(Vec::new()))
            } else {
                Ok(Reply::Affected(1))
            }
        })
    }

    pub fn calls(&self) -> Vec<Statement> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, statement: &Statement) -> Result<Reply, DbFailure> {
        self.calls.lock().unwrap().push(statement.clone());
        (self.respond)(statement)
    }
}

fn is_lookup(procedure: &str) -> bool {
    procedure.starts_with("Buscar") || procedure.starts_with("Obtener") || procedure.starts_with("sp_obtener")
}

#[async_trait]
impl Store for FakeStore {
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Row>, DbFailure> {
        match self.answer(statement)? {
            Reply::Rows(rows) => Ok(rows),
            Reply::Affected(_) => Ok(Vec::new()),
        }
    }

    async fn execute(&self, statement: &Statement) -> Result<u64, DbFailure> {
        match self.answer(statement)? {
            Reply::Rows(rows) => Ok(rows.len() as u64),
            Reply::Affected(n) => Ok(n),
        }
    }
}

/// JSON object literal as a row
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("row must be an object, got {}", other),
    }
}

/// Chat client with a canned reply
pub struct FakeLlm {
    reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_owned()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the API key were missing
    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for FakeLlm {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone().ok_or(LlmError::MissingApiKey)
    }
}
