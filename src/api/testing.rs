//! Scripted transport for exercising the caches in tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

use super::transport::{ApiRequest, Transport, TransportError};

struct Scripted {
  result: Result<Value, TransportError>,
  gate: Option<oneshot::Receiver<()>>,
}

/// Answers each endpoint from its own FIFO queue and records every call.
#[derive(Default)]
pub struct ScriptedTransport {
  queues: Mutex<HashMap<&'static str, VecDeque<Scripted>>>,
  calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue a response for `endpoint`
  pub fn push(&self, endpoint: &'static str, result: Result<Value, TransportError>) {
    self.enqueue(endpoint, Scripted { result, gate: None });
  }

  /// Queue a response that is held back until the returned sender fires
  pub fn push_gated(
    &self,
    endpoint: &'static str,
    result: Result<Value, TransportError>,
  ) -> oneshot::Sender<()> {
    let (release, gate) = oneshot::channel();
    self.enqueue(
      endpoint,
      Scripted {
        result,
        gate: Some(gate),
      },
    );
    release
  }

  pub fn calls(&self) -> Vec<ApiRequest> {
    self.calls.lock().unwrap().clone()
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }

  /// Yield until at least `count` requests have been issued
  pub async fn wait_for_calls(&self, count: usize) {
    while self.call_count() < count {
      tokio::task::yield_now().await;
    }
  }

  fn enqueue(&self, endpoint: &'static str, scripted: Scripted) {
    self
      .queues
      .lock()
      .unwrap()
      .entry(endpoint)
      .or_default()
      .push_back(scripted);
  }
}

#[async_trait]
impl Transport for ScriptedTransport {
  async fn request(&self, request: &ApiRequest) -> Result<Value, TransportError> {
    self.calls.lock().unwrap().push(request.clone());
    let scripted = self
      .queues
      .lock()
      .unwrap()
      .get_mut(request.endpoint())
      .and_then(VecDeque::pop_front);

    let Some(scripted) = scripted else {
      return Err(TransportError::Rejected(format!(
        "no scripted response for {}",
        request.endpoint()
      )));
    };
    if let Some(gate) = scripted.gate {
      let _ = gate.await;
    }
    scripted.result
  }
}

/// Helpers for building wire payloads
pub mod payloads {
  use serde_json::{json, Value};

  pub fn employee(id: &str, first: &str, last: &str) -> Value {
    json!({ "id": id, "firstName": first, "lastName": last })
  }

  pub fn transaction(id: &str, employee_id: &str) -> Value {
    json!({
      "id": id,
      "amount": 10.0,
      "employee": employee(employee_id, "Ann", "Lee"),
      "merchant": format!("merchant-{}", id),
      "date": "2022-01-24",
      "approved": false,
    })
  }

  pub fn page(ids: &[&str], next_page: Option<u32>) -> Value {
    let data: Vec<Value> = ids.iter().map(|id| transaction(id, "1")).collect();
    json!({ "data": data, "nextPage": next_page })
  }

  pub fn transactions(ids: &[&str], employee_id: &str) -> Value {
    Value::Array(ids.iter().map(|id| transaction(id, employee_id)).collect())
  }
}
