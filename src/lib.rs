//! Technical payload testing (TPT) report generation.
//!
//! Payload test results (which payloads were blocked at the border gateway
//! and on the host) are validated, laid out as a summary plus a colour-coded
//! detail table, and written as a paginated PDF.
//!
//! ```no_run
//! use serde_json::json;
//! use tpt_reports::{report_gen, ReportRequest};
//!
//! # fn main() -> Result<(), tpt_reports::ReportError> {
//! let request = ReportRequest::from_json(
//!     &json!({
//!         "assessment_id": "RV1234",
//!         "domain_tested": "cisa.gov",
//!         "election_name": "General",
//!         "output_directory": "out",
//!         "payloads_meta": {
//!             "num_payloads": 2, "border_blocked": 1, "border_not_blocked": 0,
//!             "host_blocked": 0, "host_not_blocked": 1,
//!             "payloads_blocked": 1, "payloads_not_blocked": 1
//!         }
//!     }),
//!     &json!([{
//!         "border_protection": "Blocked",
//!         "host_protection": "Not blocked",
//!         "Payload": "p1"
//!     }]),
//! )?;
//! let template = report_gen(&request.metadata, &request.records)?;
//! println!("{}", template.filename().display());
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod report;

pub use config::ReportConfig;
pub use error::ReportError;
pub use model::{AssessmentMetadata, Dataset, PayloadRecord, PayloadSummary, Protection};
pub use report::{report_gen, ReportComposer, ReportDocTemplate, ReportRequest, TemplateState};
