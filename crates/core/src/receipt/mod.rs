//! Receipt photos and PDFs attached to expenses and business transactions.
//!
//! Upload is two-phase: the client asks for a presigned URL, uploads the
//! file straight to storage, then confirms. Confirmation checks the object
//! exists with the declared size before the receipt row is written.

mod error;
mod service;
mod types;

pub use error::ReceiptError;
pub use service::{ReceiptRepository, ReceiptService};
pub use types::{
    ConfirmUploadInput, NewReceipt, Receipt, ReceiptTarget, RequestUploadInput, RequestUploadResult,
};
