use std::{collections::HashMap, fmt::Debug, time::Duration};

use chrono::{DateTime, Days, Utc};
use fsp_common::INR_CURRENCY_CODE;
use log::*;

use crate::{
    db_types::{CustomerId, GatewayOrderId, GatewayPaymentId, NewOrder, Order, OrderId, PaymentStatusType},
    fsp_api::{
        errors::OrderFlowError,
        order_objects::{
            CreateOrderParams,
            CreateOrderResult,
            PaymentVerification,
            ReconciliationReport,
            VerifyPaymentParams,
        },
    },
    helpers::{new_receipt_label, verify_payment_signature},
    traits::{NewGatewayOrder, OrderManagementError, PaymentGateway, PaymentLifecycleDatabase, PaymentUpdate},
};

pub const DEFAULT_ORDER_WRITE_ATTEMPTS: u32 = 3;

/// Tunable behaviour of the order flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFlowConfig {
    /// Reject create-order requests whose total does not match the price breakdown.
    pub strict_totals: bool,
    /// How many times the local write is attempted after the gateway order has been created.
    pub write_attempts: u32,
}

impl Default for OrderFlowConfig {
    fn default() -> Self {
        Self { strict_totals: true, write_attempts: DEFAULT_ORDER_WRITE_ATTEMPTS }
    }
}

/// `OrderFlowApi` is the primary API for the order lifecycle. It creates orders against the payment gateway, verifies
/// the gateway's payment callbacks and answers order queries.
///
/// The API itself is stateless. All durable state lives in the backend.
pub struct OrderFlowApi<B, G> {
    db: B,
    gateway: G,
    config: OrderFlowConfig,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.config)
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(db: B, gateway: G, config: OrderFlowConfig) -> Self {
        Self { db, gateway, config }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn config(&self) -> &OrderFlowConfig {
        &self.config
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: PaymentLifecycleDatabase,
    G: PaymentGateway,
{
    /// Creates a new order for the authenticated customer.
    ///
    /// The request is normalized and validated before anything else happens. Then the customer's profile is looked
    /// up, a remote order is opened with the payment gateway, and finally the order is stored locally with
    /// `Pending/Pending` status.
    ///
    /// The remote call and the local write cannot be made atomic. If the local write fails, it is retried with the
    /// gateway order id as the idempotency key. If every attempt fails, the orphaned gateway order is logged with its
    /// receipt label so that it can be found with [`Self::reconcile_receipt`].
    pub async fn create_order(
        &self,
        params: CreateOrderParams,
        customer_id: &CustomerId,
    ) -> Result<CreateOrderResult, OrderFlowError> {
        let request = params.normalize()?;
        if self.config.strict_totals {
            request.check_totals()?;
        }
        let customer = self
            .db
            .fetch_customer(customer_id)
            .await?
            .ok_or_else(|| OrderFlowError::CustomerNotFound(customer_id.clone()))?;
        let receipt = new_receipt_label();
        let mut notes = HashMap::new();
        notes.insert("userId".to_string(), customer_id.to_string());
        notes.insert("serviceId".to_string(), request.service_id.to_string());
        notes.insert("serviceName".to_string(), request.service_name.clone());
        let remote_request = NewGatewayOrder {
            amount: request.total.paise(),
            currency: INR_CURRENCY_CODE.to_string(),
            receipt: receipt.to_string(),
            notes,
        };
        let remote = self.gateway.create_order(remote_request).await.map_err(|e| {
            error!("🔄️📦️ Could not create a gateway order for receipt {receipt}. {e}");
            OrderFlowError::from(e)
        })?;
        debug!("🔄️📦️ Gateway order {} created for receipt {receipt}", remote.id);
        if remote.amount != request.total.paise() {
            warn!(
                "🔄️📦️ Gateway order {} is for {} paise, but {} paise was requested",
                remote.id,
                remote.amount,
                request.total.paise()
            );
        }
        let order = NewOrder::new(
            receipt,
            remote.id.clone(),
            &customer,
            request.service_id.clone(),
            request.service_name.clone(),
            request.total,
        )
        .with_package(request.package_id.clone(), request.package_name.clone())
        .with_price_breakdown(request.service_price, request.discount)
        .with_taxes(request.cgst, request.sgst, request.igst);
        let order = self.save_new_order(order).await?;
        info!("🔄️📦️ Order [{}] for customer {customer_id} saved as gateway order {}", order.order_id, remote.id);
        Ok(CreateOrderResult {
            gateway_order_id: remote.id,
            amount: remote.amount,
            currency: remote.currency,
            key_id: self.gateway.key_id(),
            order,
        })
    }

    async fn save_new_order(&self, order: NewOrder) -> Result<Order, OrderFlowError> {
        let attempts = self.config.write_attempts.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.db.insert_order(order.clone()).await {
                Ok(saved) => return Ok(saved),
                Err(OrderManagementError::DuplicateGatewayOrder(_) | OrderManagementError::DuplicateOrderId(_)) => {
                    // An earlier attempt may have landed even though we saw an error. That counts as success.
                    let existing = self.db.fetch_order_by_gateway_order_id(&order.gateway_order_id).await?;
                    return match existing {
                        Some(existing) if existing.order_id == order.order_id => {
                            debug!("🔄️📦️ Order [{}] was already saved", existing.order_id);
                            Ok(existing)
                        },
                        _ => {
                            error!(
                                "🔄️📦️ ORPHANED gateway order. receipt={} gateway_order_id={}. A different order \
                                 already uses one of these ids.",
                                order.order_id, order.gateway_order_id
                            );
                            Err(OrderFlowError::Conflict(format!(
                                "Gateway order {} is already linked to another order",
                                order.gateway_order_id
                            )))
                        },
                    };
                },
                Err(e) => {
                    warn!("🔄️📦️ Attempt {attempt}/{attempts} to save order [{}] failed. {e}", order.order_id);
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(50 * u64::from(attempt))).await;
                    }
                },
            }
        }
        error!(
            "🔄️📦️ ORPHANED gateway order. receipt={} gateway_order_id={}. The gateway order exists but could not be \
             saved after {attempts} attempts.",
            order.order_id, order.gateway_order_id
        );
        let e = last_error.map(|e| e.to_string()).unwrap_or_default();
        Err(OrderFlowError::DatabaseError(e))
    }

    /// Verifies a payment callback and applies the outcome to the order.
    ///
    /// A valid signature moves the order from `Pending/Pending` to `InProcess/Paid`, stores the payment id, and
    /// projects the due date from the service's processing days. An invalid signature moves the payment status to
    /// `Failed`, but only if the order is still pending and belongs to `customer_id`, the caller; a bad signature sent
    /// for someone else's order changes nothing. Neither transition is ever applied to an order that has already left
    /// `Pending`.
    ///
    /// Repeating a valid callback is safe: if the order is already paid with the same payment id, the call succeeds
    /// without writing anything. A valid callback that disagrees with the stored outcome is a conflict.
    pub async fn verify_payment(
        &self,
        params: VerifyPaymentParams,
        customer_id: &CustomerId,
    ) -> Result<PaymentVerification, OrderFlowError> {
        let (gateway_order_id, payment_id, signature) = params.validate()?;
        let secret = self.gateway.signing_secret();
        let verified =
            verify_payment_signature(secret.reveal(), gateway_order_id.as_str(), payment_id.as_str(), &signature);
        if !verified {
            warn!("🔄️💳️ Invalid payment signature for gateway order {gateway_order_id} from customer {customer_id}");
            let order = self.fail_pending_order(&gateway_order_id, customer_id).await?;
            return Ok(PaymentVerification { verified: false, gateway_order_id, order });
        }
        let order = self.fetch_by_gateway_id(&gateway_order_id).await?;
        if !order.payment_status.can_transition_to(PaymentStatusType::Paid) {
            let order = Self::check_repeat_callback(order, &payment_id)?;
            return Ok(PaymentVerification { verified: true, gateway_order_id, order: Some(order) });
        }
        let due_date = self.projected_due_date(&order, Utc::now()).await?;
        let update = PaymentUpdate { payment_id: payment_id.clone(), due_date };
        let order = match self.db.mark_order_paid(&gateway_order_id, update).await? {
            Some(order) => {
                info!("🔄️💳️ Payment {payment_id} verified. Order [{}] is now in process", order.order_id);
                order
            },
            None => {
                // Someone else moved the order out of Pending between our read and our write.
                let order = self.fetch_by_gateway_id(&gateway_order_id).await?;
                Self::check_repeat_callback(order, &payment_id)?
            },
        };
        Ok(PaymentVerification { verified: true, gateway_order_id, order: Some(order) })
    }

    /// Marks the caller's pending order as failed. Returns the updated order, or `None` if nothing was written.
    async fn fail_pending_order(
        &self,
        gateway_order_id: &GatewayOrderId,
        customer_id: &CustomerId,
    ) -> Result<Option<Order>, OrderFlowError> {
        let Some(order) = self.db.fetch_order_by_gateway_order_id(gateway_order_id).await? else {
            debug!("🔄️💳️ No order for {gateway_order_id}. Nothing was marked as failed.");
            return Ok(None);
        };
        if &order.customer_id != customer_id {
            warn!(
                "🔄️💳️ Customer {customer_id} sent a bad signature for gateway order {gateway_order_id}, which \
                 belongs to someone else. The order is left as it is."
            );
            return Ok(None);
        }
        if !order.payment_status.can_transition_to(PaymentStatusType::Failed) {
            debug!(
                "🔄️💳️ Order [{}] is already settled ({}). Nothing was marked as failed.",
                order.order_id, order.payment_status
            );
            return Ok(None);
        }
        let order = self.db.mark_order_failed(gateway_order_id).await?;
        match &order {
            Some(order) => info!("🔄️💳️ Order [{}] marked as failed", order.order_id),
            None => debug!("🔄️💳️ Order {gateway_order_id} left Pending before it could be marked as failed"),
        }
        Ok(order)
    }

    fn check_repeat_callback(order: Order, payment_id: &GatewayPaymentId) -> Result<Order, OrderFlowError> {
        match (order.payment_status, order.gateway_payment_id.as_ref()) {
            (PaymentStatusType::Paid, Some(id)) if id == payment_id => {
                debug!("🔄️💳️ Payment {payment_id} for order [{}] was already verified", order.order_id);
                Ok(order)
            },
            (status, _) => {
                warn!(
                    "🔄️💳️ Payment {payment_id} for order [{}] conflicts with the stored outcome ({status})",
                    order.order_id
                );
                Err(OrderFlowError::Conflict(format!(
                    "Order {} has already been settled with payment status {status}",
                    order.gateway_order_id
                )))
            },
        }
    }

    async fn projected_due_date(
        &self,
        order: &Order,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, OrderFlowError> {
        let service = self.db.fetch_service(&order.service_id).await?;
        let days = match service {
            Some(service) => service.processing_days(),
            None => {
                debug!("🔄️💳️ Service {} is not in the catalog. No due date will be set.", order.service_id);
                None
            },
        };
        Ok(days.and_then(|d| u64::try_from(d).ok()).and_then(|d| now.checked_add_days(Days::new(d))))
    }

    async fn fetch_by_gateway_id(&self, id: &GatewayOrderId) -> Result<Order, OrderFlowError> {
        self.db.fetch_order_by_gateway_order_id(id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(id.to_string()))
    }

    /// Fetches an order by its internal id, or failing that, its gateway order id.
    pub async fn fetch_order(&self, id: &str) -> Result<Order, OrderFlowError> {
        self.db.fetch_order_by_id_or_gateway_id(id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(id.to_string()))
    }

    /// Like [`Self::fetch_order`], but other customers' orders are reported as not found.
    pub async fn fetch_order_for_customer(&self, id: &str, customer_id: &CustomerId) -> Result<Order, OrderFlowError> {
        let order = self.fetch_order(id).await?;
        if &order.customer_id == customer_id {
            Ok(order)
        } else {
            debug!("🔄️📦️ Customer {customer_id} asked for order {id}, which belongs to someone else");
            Err(OrderFlowError::OrderNotFound(id.to_string()))
        }
    }

    /// All orders for the customer, newest first.
    pub async fn orders_for_customer(&self, customer_id: &CustomerId) -> Result<Vec<Order>, OrderFlowError> {
        let orders = self.db.fetch_orders_for_customer(customer_id).await?;
        trace!("🔄️📦️ {} orders found for customer {customer_id}", orders.len());
        Ok(orders)
    }

    /// Compares the gateway's orders for a receipt label with the local records, and reports the gateway orders that
    /// were never saved locally.
    pub async fn reconcile_receipt(&self, receipt: &OrderId) -> Result<ReconciliationReport, OrderFlowError> {
        let remote = self.gateway.fetch_orders_by_receipt(receipt.as_str()).await?;
        let local_order = self.db.fetch_order_by_order_id(receipt).await?;
        let mut orphans = Vec::new();
        for gateway_order in remote {
            if self.db.fetch_order_by_gateway_order_id(&gateway_order.id).await?.is_none() {
                warn!("🔄️🔍️ Gateway order {} for receipt {receipt} has no local record", gateway_order.id);
                orphans.push(gateway_order);
            }
        }
        Ok(ReconciliationReport { receipt: receipt.clone(), local_order, orphans })
    }
}
