use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::transport::{ApiRequest, Transport, TransportError};

/// JSON-over-HTTP transport
#[derive(Clone)]
pub struct HttpTransport {
  client: reqwest::Client,
  base_url: Url,
  token: Option<String>,
}

impl HttpTransport {
  pub fn new(base_url: &str, token: Option<String>) -> Result<Self, TransportError> {
    // Without the trailing slash `join` would replace the last path segment
    let base_url = if base_url.ends_with('/') {
      Url::parse(base_url)?
    } else {
      Url::parse(&format!("{}/", base_url))?
    };

    Ok(Self {
      client: reqwest::Client::new(),
      base_url,
      token,
    })
  }

  /// Build the URL for a request, including its query string
  fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
    let mut url = self.base_url.join(request.endpoint())?;
    match request {
      ApiRequest::PaginatedTransactions { page } => {
        url
          .query_pairs_mut()
          .append_pair("page", &page.0.to_string());
      }
      ApiRequest::TransactionsByEmployee { employee_id } => {
        url
          .query_pairs_mut()
          .append_pair("employeeId", employee_id.as_str());
      }
      ApiRequest::Employees | ApiRequest::SetTransactionApproval { .. } => {}
    }
    Ok(url)
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn request(&self, request: &ApiRequest) -> Result<Value, TransportError> {
    let url = self.url_for(request)?;
    debug!(%url, "sending request");

    let builder = match request {
      ApiRequest::SetTransactionApproval {
        transaction_id,
        value,
      } => self.client.post(url).json(&json!({
        "transactionId": transaction_id,
        "value": value,
      })),
      _ => self.client.get(url),
    };
    let builder = match &self.token {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    };

    let response = builder.send().await?.error_for_status()?;
    let body = response.bytes().await?;
    if body.is_empty() {
      return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&body)?)
  }
}
