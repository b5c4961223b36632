#[derive(Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub client_id: String,
    pub api_key: String,
    pub checksum_key: String,
    pub timeout_ms: u64,
    pub return_url: String,
    pub cancel_url: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("PAYOS_BASE_URL")
                .unwrap_or_else(|_| "https://api-merchant.payos.vn".to_string()),
            client_id: std::env::var("PAYOS_CLIENT_ID").unwrap_or_default(),
            api_key: std::env::var("PAYOS_API_KEY").unwrap_or_default(),
            checksum_key: std::env::var("PAYOS_CHECKSUM_KEY").unwrap_or_default(),
            timeout_ms: std::env::var("GATEWAY_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(2500),
            return_url: std::env::var("PAYMENT_RETURN_URL")
                .unwrap_or_else(|_| "http://localhost:3000/payment/success".to_string()),
            cancel_url: std::env::var("PAYMENT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:3000/payment/cancel".to_string()),
        }
    }
}

// Keys stay out of logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("timeout_ms", &self.timeout_ms)
            .field("return_url", &self.return_url)
            .field("cancel_url", &self.cancel_url)
            .finish_non_exhaustive()
    }
}
