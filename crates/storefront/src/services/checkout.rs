//! Checkout orchestration.
//!
//! Placing an order reserves stock and opens a payment session; the
//! provider then redirects the customer back to `success` or `cancel`.

use sqlx::PgPool;
use thiserror::Error;

use marketstall_core::{OrderId, OrderStatus, UserId};

use crate::db::{OrderRepository, RepositoryError, settings};
use crate::models::Order;
use crate::services::payment::{PaymentError, PaymentProvider};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Shipping address missing.
    #[error("shipping address is required")]
    MissingAddress,

    /// The provider has not confirmed payment.
    #[error("payment has not been completed")]
    NotPaid,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Payment provider error.
    #[error("payment provider error: {0}")]
    Payment(#[from] PaymentError),
}

/// An order awaiting payment.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PendingCheckout {
    pub order_id: OrderId,
    pub redirect_url: String,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    orders: OrderRepository<'a>,
    payment: &'a PaymentProvider,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, payment: &'a PaymentProvider) -> Self {
        Self {
            pool,
            orders: OrderRepository::new(pool),
            payment,
        }
    }

    /// Place an order from the user's cart and open a payment session.
    ///
    /// If the provider refuses the session, the fresh order is cancelled so
    /// its reserved stock goes back on the shelf.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` with `Conflict` for an empty cart
    /// or insufficient stock, and `CheckoutError::Payment` if the provider
    /// fails.
    pub async fn start(
        &self,
        user_id: UserId,
        shipping_address: &str,
    ) -> Result<PendingCheckout, CheckoutError> {
        let shipping_address = shipping_address.trim();
        if shipping_address.is_empty() {
            return Err(CheckoutError::MissingAddress);
        }

        let shipping_fee = settings::shipping_flat_fee(self.pool).await?;
        let order = self
            .orders
            .place(user_id, shipping_address, shipping_fee)
            .await?;
        let order_id = order.order.id;

        let session = match self
            .payment
            .create_checkout_session(&order, shipping_fee)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "Payment session failed; releasing order");
                if let Err(cancel_err) = self.orders.cancel_pending(user_id, order_id).await {
                    tracing::error!(order_id = %order_id, error = %cancel_err, "Failed to release order");
                }
                return Err(e.into());
            }
        };

        self.orders
            .attach_payment_session(order_id, &session.id)
            .await?;

        tracing::info!(order_id = %order_id, "Checkout started");

        Ok(PendingCheckout {
            order_id,
            redirect_url: session.url.unwrap_or_default(),
        })
    }

    /// Confirm payment with the provider and mark the order paid.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotPaid` if the provider does not report the
    /// session as paid, and `RepositoryError::NotFound` for unknown orders.
    pub async fn confirm(&self, user_id: UserId, order_id: OrderId) -> Result<Order, CheckoutError> {
        let detail = self
            .orders
            .get_for_user(user_id, order_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if detail.order.status.is_revenue() {
            return Ok(detail.order);
        }

        let session_id = detail
            .order
            .payment_session_id
            .as_deref()
            .ok_or(CheckoutError::NotPaid)?;
        let session = self.payment.retrieve_session(session_id).await?;
        if !session.is_paid() {
            return Err(CheckoutError::NotPaid);
        }

        let order = self.orders.mark_paid(user_id, order_id).await?;
        tracing::info!(order_id = %order_id, "Order paid");
        Ok(order)
    }

    /// The customer abandoned payment: cancel the order and restock.
    ///
    /// The provider is asked first, so a cancel redirect that races a
    /// completed payment confirms the order instead of cancelling it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown orders and
    /// `RepositoryError::Conflict` if the order is no longer pending.
    pub async fn abandon(&self, user_id: UserId, order_id: OrderId) -> Result<Order, CheckoutError> {
        let detail = self
            .orders
            .get_for_user(user_id, order_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if detail.order.status == OrderStatus::Pending {
            if let Some(session_id) = detail.order.payment_session_id.as_deref() {
                if self.payment.retrieve_session(session_id).await?.is_paid() {
                    let order = self.orders.mark_paid(user_id, order_id).await?;
                    tracing::info!(order_id = %order_id, "Cancel arrived after payment; order paid");
                    return Ok(order);
                }
            }
        }

        let order = self.orders.cancel_pending(user_id, order_id).await?;
        tracing::info!(order_id = %order_id, "Checkout abandoned");
        Ok(order)
    }
}
