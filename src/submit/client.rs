//! Portfolio backend client
//!
//! One outbound call: POST the whole batch of canonical drafts to the
//! store's bulk-create endpoint. Transport failure (no response) maps to
//! a single synthetic outcome distinct from store-reported errors.

use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{AssetType, TradeAction};

/// Wire shape of one transaction in the bulk-create request
#[derive(Debug, Clone, Serialize)]
pub struct CreateTransactionRequest {
    pub timestamp: DateTime<Utc>,
    pub action: TradeAction,
    pub symbol: String,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fees: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_margin: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Store response; errors are batch-granularity and do not map back to
/// source row numbers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkImportResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The store accepted `count` records; `errors` may be non-empty when
    /// it accepted only part of the batch.
    Accepted { count: u32, errors: Vec<String> },
    /// The store rejected the batch outright
    Rejected { errors: Vec<String> },
    /// No usable response arrived
    Transport { message: String },
}

/// Classify a store response. Zero accepted records with a non-empty
/// error list counts as a rejection even when the store said "success".
pub fn interpret_response(http_ok: bool, body: BulkImportResponse) -> SubmitOutcome {
    if !http_ok || !body.success || (body.count == 0 && !body.errors.is_empty()) {
        let errors = if body.errors.is_empty() {
            vec!["Store rejected the batch without details".to_string()]
        } else {
            body.errors
        };
        SubmitOutcome::Rejected { errors }
    } else {
        SubmitOutcome::Accepted {
            count: body.count,
            errors: body.errors,
        }
    }
}

/// HTTP client for the external record store
pub struct StoreClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl StoreClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// Submit the whole batch in one call
    pub async fn submit_batch(&self, batch: &[CreateTransactionRequest]) -> SubmitOutcome {
        let url = format!("{}/api/transactions/bulk", self.base_url);
        info!("Submitting {} transactions to {}", batch.len(), url);

        let mut request = self.http.post(&url).json(batch);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Bulk submission transport failure: {}", e);
                return SubmitOutcome::Transport {
                    message: format!("No response from server: {e}"),
                };
            }
        };

        let http_ok = response.status().is_success();
        let status = response.status();
        match response.json::<BulkImportResponse>().await {
            Ok(body) => interpret_response(http_ok, body),
            Err(_) if !http_ok => SubmitOutcome::Rejected {
                errors: vec![format!("Store returned HTTP {status}")],
            },
            Err(e) => SubmitOutcome::Transport {
                message: format!("Unreadable response from server: {e}"),
            },
        }
    }
}
