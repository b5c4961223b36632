use anyhow::{bail, Context, Result};
use payments_core::config::GatewayConfig;
use payments_core::{PaymentGateway, PaymentMethod};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (method, order_code) = match args.as_slice() {
        [method, order_code] => (method, order_code),
        _ => bail!("usage: payment_status <ONLINE_GATEWAY|CASH_ON_DELIVERY> <order_code>"),
    };
    let method: PaymentMethod = method.parse()?;
    let order_code: i64 = order_code
        .parse()
        .with_context(|| format!("order code {order_code:?} is not an integer"))?;

    let cfg = GatewayConfig::from_env();
    tracing::debug!(config = ?cfg, "loaded gateway config");
    let gateway = PaymentGateway::from_config(&cfg, reqwest::Client::new());

    let info = gateway.process_payment(order_code, method).await?;
    tracing::info!(order_code, status = ?info.status, "payment status resolved");
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
