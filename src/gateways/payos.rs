use crate::config::GatewayConfig;
use crate::domain::payment::PaymentStatus;
use crate::error::PaymentError;
use crate::gateways::{
    GatewayClient, GatewayItem, GatewayLink, GatewayLinkRequest, GatewayPaymentInfo, GatewayWebhookEvent,
};
use crate::money::MoneyConverter;
use crate::templates::link_signature_payload;
use chrono::DateTime;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

const SUCCESS_CODE: &str = "00";
const NOT_FOUND_CODE: &str = "101";

/// Amounts travel as JSON 32-bit integers of whole VND.
pub const MAX_AMOUNT: i64 = i32::MAX as i64;

pub fn converter() -> MoneyConverter {
    MoneyConverter::new(0, MAX_AMOUNT)
}

pub fn map_code(code: &str) -> PaymentStatus {
    match code {
        "00" | "PAID" => PaymentStatus::Paid,
        "PENDING" | "PROCESSING" => PaymentStatus::Pending,
        "CANCELLED" | "EXPIRED" => PaymentStatus::Cancelled,
        "FAILED" => PaymentStatus::Failed,
        _ => PaymentStatus::Pending,
    }
}

pub struct PayosClient {
    pub base_url: String,
    pub client_id: String,
    pub api_key: String,
    pub checksum_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Deserialize)]
struct Envelope {
    code: String,
    #[serde(default)]
    desc: String,
    data: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateLinkBody<'a> {
    order_code: i64,
    amount: i64,
    description: &'a str,
    items: &'a [GatewayItem],
    return_url: &'a str,
    cancel_url: &'a str,
    expired_at: i64,
    signature: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkData {
    order_code: i64,
    amount: i64,
    checkout_url: Option<String>,
    qr_code: Option<String>,
    account_number: Option<String>,
    account_name: Option<String>,
    payment_link_id: Option<String>,
    expired_at: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentInfoData {
    #[serde(default)]
    id: String,
    order_code: i64,
    amount: i64,
    status: String,
    #[serde(default)]
    transactions: Vec<TransactionData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionData {
    #[serde(default)]
    reference: String,
    account_number: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct WebhookEnvelope {
    data: WebhookData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookData {
    order_code: i64,
    amount: i64,
    code: String,
    #[serde(default)]
    reference: String,
    #[serde(default)]
    payment_link_id: String,
}

impl PayosClient {
    pub fn new(config: &GatewayConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            api_key: config.api_key.clone(),
            checksum_key: config.checksum_key.clone(),
            timeout_ms: config.timeout_ms,
            client,
        }
    }

    pub fn sign(&self, payload: &[u8]) -> String {
        sign_hex(&self.checksum_key, payload)
    }

    /// `lookup` is the order code for calls addressing an existing payment.
    /// Only those can fail with `NotFound`.
    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        lookup: Option<i64>,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PaymentError> {
        let resp = request
            .header("x-client-id", &self.client_id)
            .header("x-api-key", &self.api_key)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| unavailable(operation, e))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(match lookup {
                Some(order_code) => PaymentError::NotFound { order_code },
                None => PaymentError::GatewayRejected {
                    operation,
                    code: "HTTP_404".to_string(),
                    detail: "endpoint not found".to_string(),
                },
            });
        }

        let body = resp.text().await.map_err(|e| unavailable(operation, e))?;
        if status.is_server_error() {
            return Err(PaymentError::GatewayUnavailable {
                operation,
                detail: format!("HTTP {}: {}", status.as_u16(), truncate(&body)),
            });
        }

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| PaymentError::GatewayRejected {
            operation,
            code: format!("HTTP_{}", status.as_u16()),
            detail: format!("unreadable response ({e}): {}", truncate(&body)),
        })?;

        if let (NOT_FOUND_CODE, Some(order_code)) = (envelope.code.as_str(), lookup) {
            return Err(PaymentError::NotFound { order_code });
        }
        if envelope.code != SUCCESS_CODE {
            return Err(PaymentError::GatewayRejected {
                operation,
                code: envelope.code,
                detail: envelope.desc,
            });
        }

        // Absent data reaches T as JSON null; only callers expecting a body reject it.
        let data = envelope.data.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(data).map_err(|e| PaymentError::GatewayRejected {
            operation,
            code: SUCCESS_CODE.to_string(),
            detail: format!("unexpected data shape: {e}"),
        })
    }
}

#[async_trait::async_trait]
impl GatewayClient for PayosClient {
    fn name(&self) -> &'static str {
        "payos"
    }

    async fn create_payment_link(&self, request: GatewayLinkRequest) -> Result<GatewayLink, PaymentError> {
        let url = format!("{}/v2/payment-requests", self.base_url);
        let signature = self.sign(
            link_signature_payload(
                request.amount_minor,
                &request.cancel_url,
                &request.description,
                request.order_code,
                &request.return_url,
            )
            .as_bytes(),
        );
        let body = CreateLinkBody {
            order_code: request.order_code,
            amount: request.amount_minor,
            description: &request.description,
            items: &request.items,
            return_url: &request.return_url,
            cancel_url: &request.cancel_url,
            expired_at: request.expires_at.timestamp(),
            signature,
        };

        debug!(order_code = request.order_code, amount = request.amount_minor, "payos create payment link");
        let data: LinkData = self
            .call("create_payment_link", None, self.client.post(url).json(&body))
            .await?;

        Ok(GatewayLink {
            order_code: data.order_code,
            amount_minor: data.amount,
            checkout_url: data.checkout_url.filter(|s| !s.is_empty()),
            qr_code: data.qr_code.filter(|s| !s.is_empty()),
            account_number: data.account_number,
            account_name: data.account_name,
            payment_link_id: data.payment_link_id,
            expires_at: data
                .expired_at
                .filter(|ts| *ts > 0)
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    async fn get_payment_info(&self, order_code: i64) -> Result<GatewayPaymentInfo, PaymentError> {
        let url = format!("{}/v2/payment-requests/{}", self.base_url, order_code);
        debug!(order_code, "payos get payment info");
        let data: PaymentInfoData = self.call("get_payment_info", Some(order_code), self.client.get(url)).await?;

        let first = data.transactions.into_iter().next();
        Ok(GatewayPaymentInfo {
            order_code: data.order_code,
            amount_minor: data.amount,
            status_code: data.status,
            transaction_id: data.id,
            reference: first.as_ref().map(|t| t.reference.clone()).unwrap_or_default(),
            account_number: first.as_ref().and_then(|t| t.account_number.clone()),
            description: first.and_then(|t| t.description).unwrap_or_default(),
        })
    }

    async fn cancel_payment(&self, order_code: i64, reason: &str) -> Result<(), PaymentError> {
        let url = format!("{}/v2/payment-requests/{}/cancel", self.base_url, order_code);
        let body = serde_json::json!({ "cancellationReason": reason });
        debug!(order_code, "payos cancel payment");
        let _: serde_json::Value = self
            .call("cancel_payment", Some(order_code), self.client.post(url).json(&body))
            .await?;
        Ok(())
    }

    fn verify_signature(&self, signature: &str, raw_body: &[u8]) -> bool {
        let ok = verify_hex(&self.checksum_key, signature, raw_body);
        if !ok {
            warn!("webhook signature rejected");
        }
        ok
    }

    fn parse_webhook(&self, raw_body: &[u8]) -> Result<GatewayWebhookEvent, PaymentError> {
        parse_webhook_body(raw_body)
    }

    fn map_status(&self, code: &str) -> PaymentStatus {
        map_code(code)
    }
}

/// Hex HMAC-SHA256 of `payload` under `key`.
pub fn sign_hex(key: &str, payload: &[u8]) -> String {
    // HMAC takes keys of any length.
    let mut mac = match HmacSha256::new_from_slice(key.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

pub fn verify_hex(key: &str, signature: &str, raw_body: &[u8]) -> bool {
    let expected = match hex::decode(signature.trim().trim_start_matches("sha256=")) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        _ => return false,
    };
    let mut mac = match HmacSha256::new_from_slice(key.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(raw_body);
    // verify_slice compares in constant time.
    mac.verify_slice(&expected).is_ok()
}

pub fn parse_webhook_body(raw_body: &[u8]) -> Result<GatewayWebhookEvent, PaymentError> {
    let envelope: WebhookEnvelope =
        serde_json::from_slice(raw_body).map_err(|e| PaymentError::MalformedWebhook {
            reason: e.to_string(),
            raw: raw_body.to_vec(),
        })?;
    let data = envelope.data;
    Ok(GatewayWebhookEvent {
        order_code: data.order_code,
        amount_minor: data.amount,
        status_code: data.code,
        transaction_id: data.payment_link_id,
        reference: data.reference,
    })
}

fn unavailable(operation: &'static str, e: reqwest::Error) -> PaymentError {
    PaymentError::GatewayUnavailable {
        operation,
        detail: if e.is_timeout() {
            "gateway timeout".to_string()
        } else {
            e.to_string()
        },
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(checksum_key: &str) -> PayosClient {
        PayosClient {
            base_url: "http://127.0.0.1:1".to_string(),
            client_id: "cid".to_string(),
            api_key: "key".to_string(),
            checksum_key: checksum_key.to_string(),
            timeout_ms: 100,
            client: reqwest::Client::new(),
        }
    }

    #[test]
    fn status_table_covers_known_codes() {
        assert_eq!(map_code("00"), PaymentStatus::Paid);
        assert_eq!(map_code("PAID"), PaymentStatus::Paid);
        assert_eq!(map_code("PENDING"), PaymentStatus::Pending);
        assert_eq!(map_code("PROCESSING"), PaymentStatus::Pending);
        assert_eq!(map_code("CANCELLED"), PaymentStatus::Cancelled);
        assert_eq!(map_code("EXPIRED"), PaymentStatus::Cancelled);
        assert_eq!(map_code("FAILED"), PaymentStatus::Failed);
    }

    #[test]
    fn unknown_codes_stay_pending() {
        for code in ["", "01", "paid", "REFUNDED", "???"] {
            assert_eq!(map_code(code), PaymentStatus::Pending, "code {code:?}");
        }
    }

    #[test]
    fn accepts_own_signature() {
        let c = client("checksum-secret");
        let body = br#"{"code":"00","data":{"orderCode":1}}"#;
        let sig = c.sign(body);
        assert!(c.verify_signature(&sig, body));
        assert!(c.verify_signature(&format!("sha256={sig}"), body));
    }

    #[test]
    fn rejects_tampered_or_malformed_signature() {
        let c = client("checksum-secret");
        let body = br#"{"code":"00"}"#;
        let sig = c.sign(body);
        assert!(!c.verify_signature(&sig, br#"{"code":"01"}"#));
        assert!(!client("other-secret").verify_signature(&sig, body));
        assert!(!c.verify_signature("not-hex", body));
        assert!(!c.verify_signature("", body));
        assert!(!c.verify_signature("abcd", body));
    }

    #[test]
    fn malformed_webhook_keeps_raw_bytes() {
        let c = client("k");
        let raw = b"{not json".to_vec();
        match c.parse_webhook(&raw) {
            Err(PaymentError::MalformedWebhook { raw: kept, .. }) => assert_eq!(kept, raw),
            other => panic!("expected MalformedWebhook, got {other:?}"),
        }
    }

    #[test]
    fn webhook_missing_data_is_malformed() {
        let c = client("k");
        let raw = br#"{"code":"00","desc":"success","success":true}"#;
        assert!(matches!(c.parse_webhook(raw), Err(PaymentError::MalformedWebhook { .. })));
    }
}
