mod inr;

pub mod helpers;
pub mod op;
mod secret;

pub use inr::{Inr, InrConversionError, INR_CURRENCY_CODE, PAISE_PER_RUPEE};
pub use secret::Secret;
