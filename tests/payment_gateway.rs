use chrono::{Duration, Utc};
use payments_core::config::GatewayConfig;
use payments_core::gateways::mock::MockGatewayClient;
use payments_core::gateways::payos;
use payments_core::strategy::cash_on_delivery::CashOnDeliveryStrategy;
use payments_core::strategy::online::OnlineGatewayStrategy;
use payments_core::{Order, OrderItem, PaymentError, PaymentGateway, PaymentMethod, PaymentStatus};
use rust_decimal::Decimal;
use std::sync::Arc;

fn order(id: i64, total: i64) -> Order {
    Order {
        id,
        order_number: format!("ORD-{id}"),
        total_amount: Decimal::from(total),
        items: vec![OrderItem {
            name: "Widget".to_string(),
            quantity: 1,
            unit_price: Decimal::from(total),
        }],
    }
}

fn full_gateway() -> PaymentGateway {
    let mock = Arc::new(MockGatewayClient::new("ALWAYS_SUCCESS", "k"));
    PaymentGateway::builder()
        .register(OnlineGatewayStrategy::new(
            mock,
            payos::converter(),
            "https://shop.example/ok",
            "https://shop.example/cancel",
        ))
        .register(CashOnDeliveryStrategy)
        .build()
}

fn cod_only() -> PaymentGateway {
    PaymentGateway::builder().register(CashOnDeliveryStrategy).build()
}

fn within(actual: chrono::DateTime<Utc>, expected: chrono::DateTime<Utc>, seconds: i64) -> bool {
    (actual - expected).num_seconds().abs() <= seconds
}

#[tokio::test]
async fn every_response_carries_the_method_that_produced_it() {
    let gateway = full_gateway();
    for method in [PaymentMethod::OnlineGateway, PaymentMethod::CashOnDelivery] {
        let link = gateway.create_payment_link(&order(7, 20_000), method).await.unwrap();
        assert_eq!(link.payment_method, method);

        let info = gateway.process_payment(link.order_code, method).await.unwrap();
        assert_eq!(info.payment_method, method);
    }
}

#[tokio::test]
async fn cod_link_uses_order_identity_and_delivery_window() {
    let gateway = cod_only();
    let link = gateway
        .create_payment_link(&order(42, 50_000), PaymentMethod::CashOnDelivery)
        .await
        .unwrap();

    assert_eq!(link.order_code, 42);
    assert_eq!(link.amount, Decimal::from(50_000));
    assert!(link.payment_url.is_none());
    assert!(link.qr_code.is_none());
    assert!(link.account_number.is_none());
    assert!(within(link.expires_at, Utc::now() + Duration::days(7), 60));
}

#[tokio::test]
async fn cod_status_is_always_pending_with_zero_amount() {
    let gateway = cod_only();
    for code in [0, -1, 42, i64::MIN, i64::MAX] {
        let info = gateway
            .process_payment(code, PaymentMethod::CashOnDelivery)
            .await
            .unwrap();
        assert_eq!(info.status, PaymentStatus::Pending);
        assert!(info.amount.is_zero());
        assert_eq!(info.transaction_id, format!("COD-{code}"));
        assert_eq!(info.reference, format!("COD-REF-{code}"));
    }
}

#[tokio::test]
async fn cod_cancel_always_succeeds() {
    let gateway = cod_only();
    gateway
        .cancel_payment(42, PaymentMethod::CashOnDelivery, "customer changed mind")
        .await
        .unwrap();
    gateway
        .cancel_payment(0, PaymentMethod::CashOnDelivery, "")
        .await
        .unwrap();
}

#[test]
fn cod_verification_accepts_anything() {
    let gateway = cod_only();
    assert!(gateway.verify_webhook(PaymentMethod::CashOnDelivery, "", b"").unwrap());
    assert!(gateway
        .verify_webhook(PaymentMethod::CashOnDelivery, "garbage", &[0xff, 0x00, 0x13])
        .unwrap());
}

#[test]
fn cod_webhook_is_a_placeholder_that_keeps_raw_bytes() {
    let gateway = cod_only();
    let raw = br#"{"anything":true}"#;
    let out = gateway.handle_webhook(PaymentMethod::CashOnDelivery, raw).unwrap();
    assert!(out.is_placeholder());
    assert_eq!(out.status, PaymentStatus::Pending);
    assert_eq!(out.payment_method, PaymentMethod::CashOnDelivery);
    assert_eq!(out.raw_payload, raw.to_vec());
}

#[tokio::test]
async fn unregistered_method_is_unsupported_everywhere() {
    let gateway = cod_only();
    let method = PaymentMethod::OnlineGateway;
    assert!(!gateway.supports(method));

    let unsupported = |err: PaymentError| matches!(err, PaymentError::UnsupportedMethod(ref m) if m == "ONLINE_GATEWAY");

    assert!(unsupported(gateway.create_payment_link(&order(1, 1_000), method).await.unwrap_err()));
    assert!(unsupported(gateway.process_payment(1, method).await.unwrap_err()));
    assert!(unsupported(gateway.cancel_payment(1, method, "x").await.unwrap_err()));
    assert!(unsupported(gateway.verify_webhook(method, "sig", b"{}").unwrap_err()));
    assert!(unsupported(gateway.handle_webhook(method, b"{}").unwrap_err()));
}

#[tokio::test]
async fn empty_gateway_supports_nothing() {
    let gateway = PaymentGateway::default();
    let err = gateway
        .process_payment(1, PaymentMethod::CashOnDelivery)
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::UnsupportedMethod(_)));
}

#[test]
fn configured_gateway_registers_both_methods() {
    let cfg = GatewayConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        client_id: "cid".to_string(),
        api_key: "key".to_string(),
        checksum_key: "sum".to_string(),
        timeout_ms: 100,
        return_url: "https://shop.example/ok".to_string(),
        cancel_url: "https://shop.example/cancel".to_string(),
    };
    let gateway = PaymentGateway::from_config(&cfg, reqwest::Client::new());
    assert!(gateway.supports(PaymentMethod::OnlineGateway));
    assert!(gateway.supports(PaymentMethod::CashOnDelivery));
}

#[tokio::test]
async fn shared_gateway_serves_concurrent_callers() {
    let gateway = full_gateway();
    let mut handles = Vec::new();
    for id in 1..=16_i64 {
        let gateway = gateway.clone();
        handles.push(tokio::spawn(async move {
            let method = if id % 2 == 0 {
                PaymentMethod::OnlineGateway
            } else {
                PaymentMethod::CashOnDelivery
            };
            let link = gateway.create_payment_link(&order(id, 10_000), method).await?;
            Ok::<_, PaymentError>((method, link.payment_method))
        }));
    }

    for handle in handles {
        let (asked, got) = handle.await.unwrap().unwrap();
        assert_eq!(asked, got);
    }
}
