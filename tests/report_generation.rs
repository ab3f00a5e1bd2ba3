mod common;

use chrono::Local;
use common::fixtures::{cisa_metadata, cisa_payloads, many_payloads, metadata_for};
use common::pdf_assertions::{draws_image, font_names, font_resources_used, info_entry, media_box};
use common::{init_logger, GeneratedPdf, TestResult};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tpt_layout::Flowable;
use tpt_reports::report::template::TemplateError;
use tpt_reports::{
    report_gen, ReportComposer, ReportConfig, ReportError, ReportRequest, TemplateState,
};

fn expected_filename(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("TPT_Report_{}_{}.pdf", Local::now().format("%Y-%m-%d"), id))
}

fn dir_entries(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn cisa_scenario_renders_summary_and_detail_table() -> TestResult {
    init_logger();
    let dir = tempfile::tempdir()?;
    let request = ReportRequest::from_json(&cisa_metadata(dir.path()), &cisa_payloads())?;

    let today = Local::now().date_naive();
    let flowables = ReportComposer::new().flowables(&request.metadata, &request.records, today)?;
    let Some(Flowable::Table(detail)) = flowables.last() else {
        panic!("the detail table closes the report");
    };
    assert_eq!(detail.row_count(), 3);
    assert_eq!(detail.column_count(), 4);

    let template = report_gen(&request.metadata, &request.records)?;
    assert_eq!(template.state(), TemplateState::Rendered);
    assert_eq!(template.filename(), expected_filename(dir.path(), "test"));
    assert_eq!(template.page_size(), (612.0, 792.0));

    let pdf = GeneratedPdf::open(template.filename())?;
    assert_eq!(pdf.page_count(), 1);
    assert_eq!(template.page_count(), Some(1));
    let strings = pdf.all_strings();
    let position = |s: &str| strings.iter().position(|t| t == s);

    for label in [
        "Border gateway blocked",
        "Border gateway not blocked",
        "Host blocked",
        "Host not blocked",
    ] {
        let index = position(label)
            .unwrap_or_else(|| panic!("missing summary row {label}: {strings:?}"));
        assert_eq!(strings[index + 1], "1", "count for {label}");
    }

    let headers: Vec<&str> = ["border_protection", "C2_Protocol", "host_protection", "Payload"]
        .into_iter()
        .collect();
    let first_header = position("border_protection").expect("detail header");
    assert_eq!(&strings[first_header..first_header + 4], headers.as_slice());
    assert_eq!(
        &strings[first_header + 4..first_header + 8],
        ["Blocked", "test_protocol", "Not blocked", "test_payload_1"]
    );
    assert!(strings.iter().any(|s| s == "Page 1 of 1"));
    assert!(strings.iter().any(|s| s == "Assessment ID: test"));
    Ok(())
}

#[test]
fn pdf_embeds_fonts_logo_and_document_info() -> TestResult {
    let dir = tempfile::tempdir()?;
    let request = ReportRequest::from_json(&cisa_metadata(dir.path()), &cisa_payloads())?;
    let template = report_gen(&request.metadata, &request.records)?;
    let pdf = GeneratedPdf::open(template.filename())?;

    assert_eq!(font_names(&pdf.doc), vec!["DejaVuSans", "DejaVuSans-Bold"]);
    // Bold headings and regular body text each select their own face.
    assert_eq!(font_resources_used(&pdf.doc, 1), vec!["F1", "F2"]);
    assert!(draws_image(&pdf.doc, 1));
    assert_eq!(media_box(&pdf.doc, 1), Some((612.0, 792.0)));
    assert_eq!(
        info_entry(&pdf.doc, "Title").as_deref(),
        Some("Technical Payload Testing Report - test")
    );
    assert!(info_entry(&pdf.doc, "CreationDate").is_some_and(|d| d.starts_with("D:")));
    Ok(())
}

#[test]
fn long_detail_tables_span_pages_with_repeated_headers() -> TestResult {
    init_logger();
    let dir = tempfile::tempdir()?;
    let request = ReportRequest::from_json(&metadata_for(dir.path(), 60), &many_payloads(60))?;
    let template = report_gen(&request.metadata, &request.records)?;
    let pdf = GeneratedPdf::open(template.filename())?;

    let pages = pdf.page_count();
    assert!(pages >= 2, "expected several pages, got {pages}");
    let last = pdf.page_strings(pages as u32);
    assert!(last.iter().any(|s| s == "border_protection"), "header repeated on the last page");
    assert!(last.iter().any(|s| *s == format!("Page {pages} of {pages}")));

    let all = pdf.all_strings();
    for i in 0..60 {
        let name = format!("payload_{i:03}");
        assert_eq!(all.iter().filter(|s| **s == name).count(), 1, "{name} appears once");
    }
    Ok(())
}

#[test]
fn configured_page_size_is_used() -> TestResult {
    let dir = tempfile::tempdir()?;
    let request = ReportRequest::from_json(&cisa_metadata(dir.path()), &cisa_payloads())?;
    let config: ReportConfig = serde_json::from_value(serde_json::json!({"page_size": "A4"}))?;
    let template = ReportComposer::with_config(config).compose_request(&request)?;

    assert_eq!(template.page_size(), (595.28, 841.89));
    let pdf = GeneratedPdf::open(template.filename())?;
    let (width, height) = media_box(&pdf.doc, 1).expect("media box");
    assert!((width - 595.28).abs() < 0.01 && (height - 841.89).abs() < 0.01);
    Ok(())
}

#[test]
fn null_arguments_are_rejected_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    for (metadata, payloads) in [
        (Value::Null, Value::Null),
        (cisa_metadata(dir.path()), Value::Null),
        (Value::Null, cisa_payloads()),
    ] {
        let err = ReportRequest::from_json(&metadata, &payloads).unwrap_err();
        assert!(matches!(err, ReportError::Argument(_)), "{err}");
    }
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn a_rendered_report_cannot_be_rendered_again() -> TestResult {
    let dir = tempfile::tempdir()?;
    let request = ReportRequest::from_json(&cisa_metadata(dir.path()), &cisa_payloads())?;
    let mut template = report_gen(&request.metadata, &request.records)?;

    let err = template.build().unwrap_err();
    assert!(matches!(err, ReportError::Template(TemplateError::AlreadyRendered)));
    assert_eq!(template.state(), TemplateState::Rendered);
    Ok(())
}

#[test]
fn missing_output_directory_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("does-not-exist");
    let request = ReportRequest::from_json(&cisa_metadata(&missing), &cisa_payloads())?;

    let err = report_gen(&request.metadata, &request.records).unwrap_err();
    assert!(matches!(err, ReportError::Io(_)), "{err}");
    assert!(!missing.exists());
    Ok(())
}

#[test]
fn missing_assets_fail_before_the_output_file_is_created() -> TestResult {
    let dir = tempfile::tempdir()?;
    let request = ReportRequest::from_json(&cisa_metadata(dir.path()), &cisa_payloads())?;
    let config = ReportConfig {
        logo_file: PathBuf::from("no_such_logo.png"),
        ..ReportConfig::default()
    };

    let err = ReportComposer::with_config(config)
        .compose_request(&request)
        .unwrap_err();
    assert!(matches!(err, ReportError::Asset { .. }), "{err}");
    assert!(dir_entries(dir.path()).is_empty());
    Ok(())
}

#[test]
fn schema_errors_are_reported_before_rendering() -> TestResult {
    let dir = tempfile::tempdir()?;

    let mut payloads = cisa_payloads();
    payloads[1]["host_protection"] = Value::from("maybe");
    let err = ReportRequest::from_json(&cisa_metadata(dir.path()), &payloads).unwrap_err();
    assert!(matches!(err, ReportError::Schema(_)), "{err}");

    let mut payloads = cisa_payloads();
    payloads[1]
        .as_object_mut()
        .expect("payload object")
        .remove("C2_Protocol");
    let request = ReportRequest::from_json(&cisa_metadata(dir.path()), &payloads)?;
    let err = report_gen(&request.metadata, &request.records).unwrap_err();
    assert!(matches!(err, ReportError::Schema(_)), "{err}");

    let mut metadata = cisa_metadata(dir.path());
    metadata["payloads_meta"]["num_payloads"] = Value::from(5);
    let request = ReportRequest::from_json(&metadata, &cisa_payloads())?;
    let err = report_gen(&request.metadata, &request.records).unwrap_err();
    assert!(matches!(err, ReportError::Schema(_)), "{err}");

    assert!(dir_entries(dir.path()).is_empty());
    Ok(())
}
