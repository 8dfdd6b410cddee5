mod receipt;
mod signature;

pub use receipt::new_receipt_label;
pub use signature::{expected_signature, verify_payment_signature, SignatureError};
