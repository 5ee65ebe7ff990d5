//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use airtable_mcp::auth::{MockBroker, TokenProvider};
use airtable_mcp::client::{ApiClient, ClientConfig};
use airtable_mcp::tools::ToolSurface;
use serde_json::{Value, json};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const BASE: &str = "appTest";
pub const TABLE: &str = "Tasks";

/// API base pointing at a mock server
pub fn api_base(server: &MockServer) -> String {
    format!("{}/v0", server.uri())
}

/// Client backed by a counting in-process broker
pub fn client(server: &MockServer, broker: Arc<MockBroker>) -> Arc<ApiClient> {
    client_with_timeout(server, broker, Duration::from_secs(5))
}

pub fn client_with_timeout(server: &MockServer, broker: Arc<MockBroker>, timeout: Duration) -> Arc<ApiClient> {
    let tokens = Arc::new(TokenProvider::new(broker));
    let config = ClientConfig::with_api_base(api_base(server)).with_timeout(timeout);
    Arc::new(ApiClient::new(config, tokens).expect("client"))
}

pub fn surface(server: &MockServer, broker: Arc<MockBroker>) -> ToolSurface {
    ToolSurface::new(client(server, broker))
}

/// Minimal in-memory table speaking the records API shape:
/// `POST` creates, `GET` lists with `pageSize`/`offset`, `GET /{id}` fetches one.
#[derive(Clone, Default)]
pub struct FakeTable {
    records: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<AtomicUsize>,
}

const MAX_BATCH: usize = 10;

impl FakeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-filled with `n` records named `row 0` .. `row n-1`
    pub fn seeded(n: usize) -> Self {
        let table = Self::new();
        for i in 0..n {
            table.insert(json!({ "Name": format!("row {i}") }));
        }
        table
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn insert(&self, fields: Value) -> Value {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = json!({
            "id": format!("rec{:014}", n),
            "createdTime": "2024-01-01T00:00:00.000Z",
            "fields": fields,
        });
        self.records.lock().unwrap().push(record.clone());
        record
    }

    fn create(&self, body: &[u8]) -> ResponseTemplate {
        let Ok(body) = serde_json::from_slice::<Value>(body) else {
            return ResponseTemplate::new(422).set_body_string(r#"{"error":{"type":"INVALID_REQUEST_BODY"}}"#);
        };

        if let Some(records) = body.get("records").and_then(Value::as_array) {
            if records.len() > MAX_BATCH {
                return ResponseTemplate::new(422).set_body_json(json!({
                    "error": {
                        "type": "INVALID_RECORDS",
                        "message": format!("Too many records: {} (max {})", records.len(), MAX_BATCH)
                    }
                }));
            }
            let created: Vec<Value> = records
                .iter()
                .map(|r| self.insert(r.get("fields").cloned().unwrap_or_else(|| json!({}))))
                .collect();
            return ResponseTemplate::new(200).set_body_json(json!({ "records": created }));
        }

        match body.get("fields") {
            Some(fields) => ResponseTemplate::new(200).set_body_json(self.insert(fields.clone())),
            None => ResponseTemplate::new(422).set_body_string(r#"{"error":{"type":"INVALID_REQUEST_MISSING_FIELDS"}}"#),
        }
    }

    fn list(&self, request: &Request) -> ResponseTemplate {
        let param = |key: &str| {
            request
                .url
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };
        let page_size = param("pageSize").and_then(|v| v.parse().ok()).unwrap_or(100usize);
        let start = param("offset")
            .and_then(|v| v.strip_prefix("itr").and_then(|n| n.parse().ok()))
            .unwrap_or(0usize);

        let records = self.records.lock().unwrap();
        let end = (start + page_size).min(records.len());
        let page: Vec<Value> = records.get(start..end).map(<[Value]>::to_vec).unwrap_or_default();

        let mut body = json!({ "records": page });
        if end < records.len() {
            body["offset"] = Value::String(format!("itr{end}"));
        }
        ResponseTemplate::new(200).set_body_json(body)
    }

    fn get(&self, id: &str) -> ResponseTemplate {
        let records = self.records.lock().unwrap();
        match records.iter().find(|r| r["id"] == id) {
            Some(record) => ResponseTemplate::new(200).set_body_json(record.clone()),
            None => ResponseTemplate::new(404).set_body_string(r#"{"error":"NOT_FOUND"}"#),
        }
    }
}

impl Respond for FakeTable {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let segments: Vec<String> = request
            .url
            .path_segments()
            .map(|s| s.map(str::to_string).collect())
            .unwrap_or_default();

        // v0 / base / table [/ record]
        match (request.method.as_str(), segments.get(3)) {
            ("POST", None) => self.create(&request.body),
            ("GET", None) => self.list(request),
            ("GET", Some(id)) => self.get(id),
            _ => ResponseTemplate::new(405),
        }
    }
}
