//! Report generation for analysis results.

mod html;
mod json;
mod summary;
mod text;

pub use html::to_html;
pub(crate) use html::escape as escape_html;
pub use json::{to_json, JsonFormat};
pub use summary::{AnalysisReport, PageReport, ReportSummary};
pub use text::to_text;
