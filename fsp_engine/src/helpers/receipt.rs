use chrono::Utc;

use crate::db_types::OrderId;

/// Generates a fresh internal order id of the form `order_<unix-millis>_<8 hex chars>`.
///
/// The same string is sent to the gateway as the order's receipt label, which is what lets orphaned gateway orders be
/// traced back to the attempt that created them.
pub fn new_receipt_label() -> OrderId {
    let millis = Utc::now().timestamp_millis();
    let suffix = rand::random::<u32>();
    OrderId::new(format!("order_{millis}_{suffix:08x}"))
}
