//! Hosted checkout payment provider client.
//!
//! Speaks the Stripe-style checkout session API: a session is created with
//! form-encoded line items, the customer pays on the provider's page, and
//! the storefront retrieves the session afterwards to confirm payment.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use marketstall_core::{Money, OrderId};

use crate::config::PaymentConfig;
use crate::models::OrderDetail;

/// Errors that can occur when talking to the payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A checkout session as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Where to send the customer to pay.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl CheckoutSession {
    /// Whether the provider reports the session as paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }
}

/// Payment provider client.
#[derive(Clone)]
pub struct PaymentProvider {
    client: reqwest::Client,
    api_base: String,
    secret_key: SecretString,
    currency: String,
    return_base: String,
}

impl PaymentProvider {
    /// Create a new client. `return_base` is the storefront's public URL,
    /// used to build the success and cancel redirects.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PaymentConfig, return_base: &str) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            secret_key: config.secret_key.clone(),
            currency: config.currency.clone(),
            return_base: return_base.trim_end_matches('/').to_owned(),
        })
    }

    /// Open a checkout session for an order.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the response is malformed.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.order.id))]
    pub async fn create_checkout_session(
        &self,
        order: &OrderDetail,
        shipping_fee: Money,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);
        let form = session_form(
            order,
            shipping_fee,
            &self.currency,
            &self.return_base,
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await?;

        let session = parse_session(response).await?;
        if session.url.is_none() {
            return Err(PaymentError::Parse(
                "checkout session has no redirect url".to_owned(),
            ));
        }
        Ok(session)
    }

    /// Fetch a checkout session's current state.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the response is malformed.
    #[tracing::instrument(skip(self))]
    pub async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions/{session_id}", self.api_base);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .send()
            .await?;

        parse_session(response).await
    }
}

async fn parse_session(response: reqwest::Response) -> Result<CheckoutSession, PaymentError> {
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(PaymentError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| PaymentError::Parse(e.to_string()))
}

/// Form fields for a checkout session request.
fn session_form(
    order: &OrderDetail,
    shipping_fee: Money,
    currency: &str,
    return_base: &str,
) -> Vec<(String, String)> {
    let order_id: OrderId = order.order.id;
    let mut form = vec![
        ("mode".to_owned(), "payment".to_owned()),
        (
            "success_url".to_owned(),
            format!("{return_base}/api/checkout/success?order_id={order_id}"),
        ),
        (
            "cancel_url".to_owned(),
            format!("{return_base}/api/checkout/cancel?order_id={order_id}"),
        ),
        ("client_reference_id".to_owned(), order_id.to_string()),
    ];

    let mut items: Vec<(String, Money, i32)> = order
        .lines
        .iter()
        .map(|line| {
            (
                format!("{} ({})", line.product_name, line.sku),
                line.unit_price,
                line.quantity,
            )
        })
        .collect();
    if shipping_fee > Money::ZERO {
        items.push(("Shipping".to_owned(), shipping_fee, 1));
    }

    for (i, (name, unit_price, quantity)) in items.into_iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        form.push((format!("{prefix}[price_data][currency]"), currency.to_owned()));
        form.push((format!("{prefix}[price_data][product_data][name]"), name));
        form.push((
            format!("{prefix}[price_data][unit_amount]"),
            unit_price.to_cents().to_string(),
        ));
        form.push((format!("{prefix}[quantity]"), quantity.to_string()));
    }

    form
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use marketstall_core::{OrderStatus, UserId, VariantId};

    use super::*;
    use crate::models::{Order, OrderLine};

    fn order() -> OrderDetail {
        OrderDetail {
            order: Order {
                id: OrderId::new(42),
                user_id: UserId::new(7),
                status: OrderStatus::Pending,
                total: Money::new(Decimal::new(3498, 2)).unwrap(),
                shipping_address: "1 Market St".to_owned(),
                payment_session_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            lines: vec![OrderLine {
                variant_id: Some(VariantId::new(3)),
                product_name: "Linen Shirt".to_owned(),
                sku: "LS-M-BLU".to_owned(),
                unit_price: Money::new(Decimal::new(1499, 2)).unwrap(),
                quantity: 2,
            }],
        }
    }

    fn field<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_session_form_fields() {
        let form = session_form(&order(), Money::ZERO, "usd", "https://shop.test");

        assert_eq!(field(&form, "mode"), Some("payment"));
        assert_eq!(field(&form, "client_reference_id"), Some("42"));
        assert_eq!(
            field(&form, "success_url"),
            Some("https://shop.test/api/checkout/success?order_id=42")
        );
        assert_eq!(
            field(&form, "cancel_url"),
            Some("https://shop.test/api/checkout/cancel?order_id=42")
        );
        assert_eq!(
            field(&form, "line_items[0][price_data][unit_amount]"),
            Some("1499")
        );
        assert_eq!(field(&form, "line_items[0][quantity]"), Some("2"));
        assert_eq!(field(&form, "line_items[1][quantity]"), None);
    }

    #[test]
    fn test_shipping_fee_becomes_a_line() {
        let fee = Money::new(Decimal::new(500, 2)).unwrap();
        let form = session_form(&order(), fee, "eur", "https://shop.test");

        assert_eq!(
            field(&form, "line_items[1][price_data][product_data][name]"),
            Some("Shipping")
        );
        assert_eq!(
            field(&form, "line_items[1][price_data][unit_amount]"),
            Some("500")
        );
        assert_eq!(
            field(&form, "line_items[1][price_data][currency]"),
            Some("eur")
        );
    }

    #[test]
    fn test_is_paid() {
        let session: CheckoutSession =
            serde_json::from_str(r#"{"id":"cs_1","url":null,"payment_status":"paid"}"#).unwrap();
        assert!(session.is_paid());

        let session: CheckoutSession = serde_json::from_str(r#"{"id":"cs_2"}"#).unwrap();
        assert!(!session.is_paid());
    }
}
