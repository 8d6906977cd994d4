use aadhaar_report::config::ExportConfig;
use aadhaar_report::workflows::intake::{UpstreamImporter, VerificationMode, VerificationPayload};
use aadhaar_report::workflows::verification::{
    Assessment, ExportFormat, Report, ReportBuilder, ReportPackager,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn fixture_report() -> Report {
    let data = include_bytes!("../fixtures/batch_response.json");
    let payload = UpstreamImporter::from_reader(&data[..], VerificationMode::Batch)
        .expect("fixture imports");
    assert_eq!(payload.mode(), VerificationMode::Batch);

    payload
        .build_report(&ReportBuilder::new(generated_at()))
        .expect("batch always builds")
}

#[test]
fn fixture_summary_counts_every_file() {
    let Report::Batch(batch) = fixture_report() else {
        panic!("expected a batch report");
    };

    let summary = &batch.summary;
    assert_eq!(summary.total_processed, 4);
    assert_eq!(summary.valid_count, 2);
    assert_eq!(summary.non_aadhaar_count, 1);
    assert_eq!(summary.error_count, 1);
    assert_eq!(summary.risk_distribution.low, 1);
    assert_eq!(summary.risk_distribution.high, 1);
    assert_eq!(summary.success_rate_pct, 50.0);
    // (1 + 3) / 4 files
    assert_eq!(summary.overall_batch_risk, Assessment::Low);
}

#[test]
fn fixture_csv_reads_back_cell_for_cell() {
    let csv = fixture_report().to_csv().expect("renders csv");
    assert!(!csv.ends_with('\n'));

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let header = reader.headers().expect("header row").clone();
    assert_eq!(header.len(), 15);
    assert_eq!(&header[0], "Filename");
    assert_eq!(&header[14], "RiskLevel");

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("valid records");
    assert_eq!(rows.len(), 4);

    let ravi = &rows[0];
    assert_eq!(&ravi[1], "Yes");
    assert_eq!(&ravi[2], "N/A");
    assert_eq!(&ravi[3], "LOW");
    assert_eq!(&ravi[4], "12");
    assert_eq!(&ravi[5], "94.2");
    assert_eq!(&ravi[7], "Ravi \"R\" Kumar");
    assert!(ravi.iter().skip(10).take(4).all(|status| status == "VALID"));

    let receipt = &rows[1];
    assert_eq!(&receipt[1], "No");
    assert_eq!(&receipt[2], "NOT_AADHAAR");
    assert_eq!(&receipt[3], "UNKNOWN");
    assert_eq!(&receipt[6], "N/A");
    assert_eq!(&receipt[10], "MISSING");

    let blurred = &rows[2];
    assert_eq!(&blurred[2], "OCR_TIMEOUT");
    assert_eq!(&blurred[14], "HIGH");

    let old_scan = &rows[3];
    assert_eq!(&old_scan[4], "77.5");
    assert_eq!(&old_scan[10], "INVALID_FORMAT");
    assert_eq!(&old_scan[11], "TOO_SHORT");
    assert_eq!(&old_scan[12], "INVALID_FORMAT");
    assert_eq!(&old_scan[13], "INVALID");
}

#[test]
fn fixture_json_has_stable_field_names() {
    let text = fixture_report().to_json().expect("renders json");
    let value: Value = serde_json::from_str(&text).expect("valid json");

    assert_eq!(value["verification_type"], "batch");
    assert_eq!(value["total_files"], 4);
    assert_eq!(value["summary"]["risk_distribution"]["LOW"], 1);
    assert_eq!(value["summary"]["risk_distribution"]["MODERATE"], 0);
    assert_eq!(value["summary"]["overall_batch_risk"], "LOW");

    let entries = value["detailed_results"].as_array().expect("entries");
    assert_eq!(entries[1]["error_type"], "NOT_AADHAAR");
    assert!(entries[1]["risk_breakdown"].is_null());

    let old_scan = &entries[3]["risk_breakdown"];
    assert_eq!(old_scan["data_consistency_risk"], "HIGH");
    assert_eq!(
        old_scan["inconsistencies"],
        json!(["DOB_OUT_OF_RANGE", "ID_LENGTH_INVALID"])
    );
    assert_eq!(old_scan["image_quality_risk"], "HIGH");
    assert_eq!(old_scan["face_detected"], false);
    assert_eq!(
        entries[3]["validation_results"]["gender"],
        json!({ "status": "INVALID", "valid": false })
    );

    let stamped: DateTime<Utc> = value["generated_at"]
        .as_str()
        .expect("timestamp string")
        .parse()
        .expect("rfc3339 timestamp");
    assert_eq!(stamped, generated_at());
}

#[test]
fn single_csv_lists_fields_then_risks_then_indicators() {
    let payload = json!({
        "success": true,
        "result": {
            "filename": "front.jpg",
            "assessment": "MODERATE",
            "fraud_score": 41,
            "confidence_score": 88,
            "extracted": {
                "aadhaar": "2345 6789 0123",
                "name": "Meera Nair",
                "dob": "DOB: 03/07/1992",
                "gender": "F"
            },
            "indicators": ["✅ LOW: Face detected on card.", "⚪ INFO: QR Code check was disabled."]
        }
    });
    let single = UpstreamImporter::from_value(&payload, VerificationMode::Single)
        .expect("envelope parses");
    assert!(matches!(single, VerificationPayload::Single(_)));

    let report = single
        .build_report(&ReportBuilder::new(generated_at()))
        .expect("card builds");
    let csv = report.to_csv().expect("renders csv");

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("valid records");
    let labels: Vec<&str> = rows.iter().map(|row| &row[0]).collect();
    assert_eq!(
        labels,
        [
            "Aadhaar Number",
            "Name",
            "Date of Birth",
            "Gender",
            "Text Extraction Risk",
            "Data Consistency Risk",
            "Image Quality Risk",
            "Indicator 1",
            "Indicator 2",
        ]
    );
    assert_eq!(&rows[2][2], "VALID");
    assert_eq!(&rows[6][1], "LOW");
    assert_eq!(&rows[7][3], "LOW");
    assert_eq!(&rows[8][3], "N/A");
}

#[test]
fn descriptor_decodes_to_rendered_report() {
    let report = fixture_report();
    let descriptor = ReportPackager::export(&report, ExportFormat::Csv, &ExportConfig::default())
        .expect("packages");

    assert_eq!(
        descriptor.full_filename,
        "batch_aadhaar_verification_2026-03-14T09-30-00-000Z.csv"
    );
    assert_eq!(descriptor.mime_type, "text/csv");

    let decoded = STANDARD
        .decode(&descriptor.encoded_payload)
        .expect("valid base64");
    assert_eq!(
        String::from_utf8(decoded).expect("utf8 payload"),
        report.to_csv().expect("renders csv")
    );
}

#[test]
fn descriptor_uses_configured_prefix() {
    let config = ExportConfig {
        single_prefix: "kyc".to_string(),
        batch_prefix: "kyc_batch".to_string(),
    };
    let report = fixture_report();
    let descriptor =
        ReportPackager::export(&report, ExportFormat::Json, &config).expect("packages");

    assert!(descriptor.full_filename.starts_with("kyc_batch_2026-03-14T09-30-00"));
    assert!(descriptor.full_filename.ends_with(".json"));
    assert_eq!(descriptor.mime_type, "application/json");
}
