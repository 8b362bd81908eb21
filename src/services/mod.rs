pub mod archive;
pub mod dispatcher;
pub mod downloader;
pub mod mime;
pub mod response_index;
pub mod url_resolver;

pub use archive::{decompose, InvoiceFolders};
pub use dispatcher::{BundleDispatcher, WebhookDispatcher};
pub use downloader::{HttpDownloader, PdfFetcher};
pub use mime::mime_for;
pub use response_index::{load_descriptor, DescriptorPattern, ResponseIndex};
pub use url_resolver::find_pdf_url;
