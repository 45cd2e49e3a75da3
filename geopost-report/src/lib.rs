mod endpoint;
mod http;
mod payload;

pub use endpoint::REPORT_URL;
pub use http::HttpReporter;
pub use payload::ReportPayload;
