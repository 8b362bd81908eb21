pub mod bundle;
pub mod progress;
pub mod upload;

pub use bundle::{Attachment, DispatchOutcome, InvoiceBundle};
pub use progress::{format_elapsed, EventKind, ProgressEvent};
pub use upload::{Upload, UploadRejected, UploadedFile};
