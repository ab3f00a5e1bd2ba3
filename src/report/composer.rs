//! Assembles a TPT report: title block, summary, and the per-payload detail
//! table, rendered through a [`ReportDocTemplate`].

use crate::assets::ReportAssets;
use crate::config::ReportConfig;
use crate::model::{json_kind, records_from_json, AssessmentMetadata, Dataset, PayloadRecord};
use crate::report::styles::{self, report_styles};
use crate::report::table::TableFormatter;
use crate::report::template::{Logo, PageDecoration, ReportDocTemplate};
use crate::ReportError;
use chrono::{DateTime, Local, NaiveDate};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tpt_layout::{Flowable, Paragraph};
use tpt_render_lopdf::DocumentInfo;
use tpt_style::StyleRegistry;

pub const REPORT_TITLE: &str = "Technical Payload Testing Report";

/// Width of the summary table's label column, as a share of the frame.
const SUMMARY_LABEL_SHARE: f32 = 0.45;
const SUMMARY_COUNT_SHARE: f32 = 0.2;
const SECTION_GAP: f32 = 18.0;
const NO_RESULTS: &str = "No payload results were recorded for this assessment.";

/// `<dir>/TPT_Report_<YYYY-MM-DD>_<assessment_id>.pdf`
pub fn report_filename(output_directory: &Path, assessment_id: &str, date: NaiveDate) -> PathBuf {
    output_directory.join(format!(
        "TPT_Report_{}_{}.pdf",
        date.format("%Y-%m-%d"),
        assessment_id
    ))
}

/// Metadata and records decoded from loosely typed JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub metadata: AssessmentMetadata,
    pub records: Vec<PayloadRecord>,
}

impl ReportRequest {
    /// `metadata` must be an object and `payloads` an array. A missing
    /// (`null`) input is an argument error; malformed content is a schema
    /// error.
    pub fn from_json(metadata: &Value, payloads: &Value) -> Result<Self, ReportError> {
        match (metadata, payloads) {
            (Value::Null, _) => {
                return Err(ReportError::Argument("assessment metadata is missing".into()));
            }
            (_, Value::Null) => {
                return Err(ReportError::Argument("payload list is missing".into()));
            }
            (Value::Object(_), Value::Array(_)) => {}
            (Value::Object(_), other) => {
                return Err(ReportError::Argument(format!(
                    "payload list must be an array, got {}",
                    json_kind(other)
                )));
            }
            (other, _) => {
                return Err(ReportError::Argument(format!(
                    "assessment metadata must be an object, got {}",
                    json_kind(other)
                )));
            }
        }

        let metadata: AssessmentMetadata = serde_json::from_value(metadata.clone())
            .map_err(|e| ReportError::Schema(format!("assessment metadata: {}", e)))?;
        let records = records_from_json(payloads)?;
        Ok(Self { metadata, records })
    }
}

/// Builds and renders reports with one configuration.
#[derive(Debug, Clone, Default)]
pub struct ReportComposer {
    config: ReportConfig,
}

impl ReportComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Renders the report dated now and returns the rendered template.
    pub fn compose(
        &self,
        metadata: &AssessmentMetadata,
        records: &[PayloadRecord],
    ) -> Result<ReportDocTemplate, ReportError> {
        self.compose_at(metadata, records, Local::now())
    }

    pub fn compose_request(
        &self,
        request: &ReportRequest,
    ) -> Result<ReportDocTemplate, ReportError> {
        self.compose(&request.metadata, &request.records)
    }

    /// Renders the report as generated at `now`.
    ///
    /// Inputs, configuration, and assets are all checked before the output
    /// file is created.
    pub fn compose_at(
        &self,
        metadata: &AssessmentMetadata,
        records: &[PayloadRecord],
        now: DateTime<Local>,
    ) -> Result<ReportDocTemplate, ReportError> {
        self.config.validate()?;
        let today = now.date_naive();
        let registry = report_styles(&self.config.font_family)?;
        let flowables = self.build_flowables(&registry, metadata, records, today)?;
        let assets = ReportAssets::load(&self.config)?;

        let filename = report_filename(&metadata.output_directory, &metadata.assessment_id, today);
        log::info!(
            "Generating report for assessment {} ({} payloads) at {}",
            metadata.assessment_id,
            records.len(),
            filename.display()
        );

        let decoration = PageDecoration {
            footer_style: registry.get(styles::FOOTER)?,
            footer_text: format!("Generated {}", today.format("%Y-%m-%d")),
            logo: Some(Logo {
                bytes: assets.logo,
                width: self.config.logo_width,
            }),
        };
        let mut template = ReportDocTemplate::new(filename, self.config.geometry())
            .with_fonts(assets.fonts)
            .with_decoration(decoration)
            .with_info(self.document_info(metadata, now));
        template.add_flowables(flowables)?;
        template.build()?;
        Ok(template)
    }

    /// The report content, without rendering it.
    pub fn flowables(
        &self,
        metadata: &AssessmentMetadata,
        records: &[PayloadRecord],
        date: NaiveDate,
    ) -> Result<Vec<Flowable>, ReportError> {
        let registry = report_styles(&self.config.font_family)?;
        self.build_flowables(&registry, metadata, records, date)
    }

    fn build_flowables(
        &self,
        registry: &StyleRegistry,
        metadata: &AssessmentMetadata,
        records: &[PayloadRecord],
        date: NaiveDate,
    ) -> Result<Vec<Flowable>, ReportError> {
        metadata.validate()?;
        let dataset = Dataset::from_records(records)?;
        let summary = &metadata.payload_summary;
        if summary.payload_count() != records.len() as u64 {
            return Err(ReportError::Schema(format!(
                "summary describes {} payloads but {} records were supplied",
                summary.payload_count(),
                records.len()
            )));
        }

        let title = registry.get(styles::TITLE)?;
        let heading = registry.get(styles::HEADING)?;
        let body = registry.get(styles::BODY)?;
        let frame_width = self.config.geometry().frame().width;

        let details = [
            format!("Assessment ID: {}", metadata.assessment_id),
            format!("Domain Tested: {}", metadata.domain_tested),
            format!("Election: {}", metadata.election_name),
            format!("Report Date: {}", date.format("%B %-d, %Y")),
        ];
        let mut flowables: Vec<Flowable> = vec![Paragraph::new(REPORT_TITLE, title).into()];
        flowables.extend(
            details
                .into_iter()
                .map(|text| Flowable::from(Paragraph::new(text, body.clone()))),
        );
        flowables.push(Flowable::Spacer(SECTION_GAP));
        flowables.push(Paragraph::new("Summary", heading.clone()).into());

        let summary_rows = summary_rows(metadata);
        let summary_data = Dataset::new(
            vec!["Measure".to_string(), "Count".to_string()],
            summary_rows,
        )?;
        let summary_table = TableFormatter::new(registry, styles::SUMMARY_TABLE)?.format(
            &summary_data,
            &[frame_width * SUMMARY_LABEL_SHARE, frame_width * SUMMARY_COUNT_SHARE],
        )?;
        flowables.push(summary_table.into());
        flowables.push(Flowable::Spacer(SECTION_GAP / 2.0));
        flowables.push(Paragraph::new(narrative(metadata), body.clone()).into());

        if summary_data.len() > self.config.summary_page_break_rows {
            log::debug!("Summary has {} rows; starting details on a new page", summary_data.len());
            flowables.push(Flowable::PageBreak);
        } else {
            flowables.push(Flowable::Spacer(SECTION_GAP));
        }

        flowables.push(Paragraph::new("Payload Results", heading).into());
        if dataset.column_count() == 0 {
            flowables.push(Paragraph::new(NO_RESULTS, body).into());
        } else {
            let detail = TableFormatter::new(registry, styles::DETAIL_TABLE)?
                .format_even(&dataset, frame_width)?;
            flowables.push(detail.into());
        }

        Ok(flowables)
    }

    fn document_info(&self, metadata: &AssessmentMetadata, now: DateTime<Local>) -> DocumentInfo {
        DocumentInfo {
            title: Some(format!("{} - {}", REPORT_TITLE, metadata.assessment_id)),
            author: Some(self.config.author.clone()),
            subject: Some(format!(
                "Payload testing of {} for {}",
                metadata.domain_tested, metadata.election_name
            )),
            producer: Some(format!("tpt-reports {}", env!("CARGO_PKG_VERSION"))),
            creation_date: Some(now.format("D:%Y%m%d%H%M%S").to_string()),
        }
    }
}

fn summary_rows(metadata: &AssessmentMetadata) -> Vec<Vec<String>> {
    let s = &metadata.payload_summary;
    [
        ("Payloads tested", s.payload_count()),
        ("Checkpoint results", s.total),
        ("Border gateway blocked", s.border_blocked),
        ("Border gateway not blocked", s.border_not_blocked),
        ("Host blocked", s.host_blocked),
        ("Host not blocked", s.host_not_blocked),
        ("Total blocked", s.blocked),
        ("Total not blocked", s.not_blocked),
    ]
    .into_iter()
    .map(|(label, count)| vec![label.to_string(), count.to_string()])
    .collect()
}

fn narrative(metadata: &AssessmentMetadata) -> String {
    let s = &metadata.payload_summary;
    format!(
        "{} payloads were tested against {}. \
         At the border gateway {} were blocked and {} were not; \
         on the host {} were blocked and {} were not. \
         Across all {} checkpoint results, {} were blocked.",
        s.payload_count(),
        metadata.domain_tested,
        s.border_blocked,
        s.border_not_blocked,
        s.host_blocked,
        s.host_not_blocked,
        s.total,
        s.blocked
    )
}

/// Renders a report with the default configuration.
pub fn report_gen(
    metadata: &AssessmentMetadata,
    records: &[PayloadRecord],
) -> Result<ReportDocTemplate, ReportError> {
    ReportComposer::new().compose(metadata, records)
}
