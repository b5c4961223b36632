/// QR/bank-transfer gateways cap the transfer memo at 25 characters.
pub const MAX_DESCRIPTION_LEN: usize = 25;

pub fn payment_description(order_number: &str) -> String {
    format!("DH {order_number}")
        .chars()
        .take(MAX_DESCRIPTION_LEN)
        .collect()
}

pub fn callback_url(base: &str, order_number: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}orderNumber={order_number}")
}

/// Canonical string the create-link request signature is computed over.
/// Keys are in alphabetical order.
pub fn link_signature_payload(
    amount: i64,
    cancel_url: &str,
    description: &str,
    order_code: i64,
    return_url: &str,
) -> String {
    format!(
        "amount={amount}&cancelUrl={cancel_url}&description={description}&orderCode={order_code}&returnUrl={return_url}"
    )
}

pub fn cod_transaction_id(order_code: i64) -> String {
    format!("COD-{order_code}")
}

pub fn cod_reference(order_code: i64) -> String {
    format!("COD-REF-{order_code}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_embeds_order_number() {
        assert_eq!(payment_description("ORD-1001"), "DH ORD-1001");
    }

    #[test]
    fn description_is_truncated() {
        let d = payment_description("ORD-2024-10-14-000000123456");
        assert_eq!(d.chars().count(), MAX_DESCRIPTION_LEN);
        assert!(d.starts_with("DH ORD-2024"));
    }

    #[test]
    fn callback_url_appends_query() {
        assert_eq!(
            callback_url("https://shop.example/payment/success", "A1"),
            "https://shop.example/payment/success?orderNumber=A1"
        );
        assert_eq!(
            callback_url("https://shop.example/cb?src=qr", "A1"),
            "https://shop.example/cb?src=qr&orderNumber=A1"
        );
    }

    #[test]
    fn signature_payload_is_alphabetical() {
        let s = link_signature_payload(2000, "https://c", "DH 1", 123, "https://r");
        assert_eq!(
            s,
            "amount=2000&cancelUrl=https://c&description=DH 1&orderCode=123&returnUrl=https://r"
        );
    }

    #[test]
    fn cod_identifiers() {
        assert_eq!(cod_transaction_id(42), "COD-42");
        assert_eq!(cod_reference(-3), "COD-REF--3");
    }
}
