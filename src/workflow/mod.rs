pub mod invoice_ctx;
pub mod reconcile_flow;

pub use invoice_ctx::InvoiceCtx;
pub use reconcile_flow::{ReconcileFlow, ReconcileResult};
