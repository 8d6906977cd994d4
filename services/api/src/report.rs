use aadhaar_report::config::{AppConfig, ExportConfig};
use aadhaar_report::error::AppError;
use aadhaar_report::workflows::intake::{UpstreamImporter, VerificationMode, VerificationPayload};
use aadhaar_report::workflows::verification::{
    BatchReport, DownloadDescriptor, ExportFormat, Report, ReportBuilder, ReportPackager,
    SingleReport,
};
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON file holding the upstream verification response
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Whether the response covers one card or a batch archive
    #[arg(long)]
    pub(crate) mode: VerificationMode,
    /// Print the serialized report in this format instead of a summary
    #[arg(long)]
    pub(crate) format: Option<ExportFormat>,
    /// Print the download descriptor instead of the raw report
    #[arg(long)]
    pub(crate) descriptor: bool,
    /// Generation timestamp (RFC 3339). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) generated_at: Option<DateTime<Utc>>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        input,
        mode,
        format,
        descriptor,
        generated_at,
    } = args;

    let config = AppConfig::load()?;
    let payload = UpstreamImporter::from_path(&input, mode)?;
    let generated_at = generated_at.unwrap_or_else(Utc::now);
    let report = build_report(&payload, generated_at)?;

    match (format, descriptor) {
        (format, true) => {
            let format = format.unwrap_or(ExportFormat::Json);
            let descriptor = package_report(&report, format, &config.export)?;
            println!("{}", descriptor_json(&descriptor)?);
        }
        (Some(format), false) => println!("{}", report.render(format)?),
        (None, false) => {
            for line in summary_lines(&report) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

pub(crate) fn build_report(
    payload: &VerificationPayload,
    generated_at: DateTime<Utc>,
) -> Result<Report, AppError> {
    let report = payload.build_report(&ReportBuilder::new(generated_at))?;
    info!(
        mode = %payload.mode(),
        files = payload.results().len(),
        "verification report built"
    );
    Ok(report)
}

pub(crate) fn package_report(
    report: &Report,
    format: ExportFormat,
    export: &ExportConfig,
) -> Result<DownloadDescriptor, AppError> {
    let descriptor = ReportPackager::export(report, format, export)?;
    info!(
        filename = %descriptor.full_filename,
        mime = %descriptor.mime_type,
        "report packaged for download"
    );
    Ok(descriptor)
}

pub(crate) fn summary_lines(report: &Report) -> Vec<String> {
    match report {
        Report::Single(single) => single_summary(single),
        Report::Batch(batch) => batch_summary(batch),
    }
}

fn single_summary(report: &SingleReport) -> Vec<String> {
    let validations = &report.validation_results;
    let risk = &report.risk_breakdown;

    let mut lines = vec![
        format!("Aadhaar verification report for {}", report.filename),
        format!(
            "- Assessment {} | fraud score {} | confidence {}",
            report.overall_assessment.label(),
            report.fraud_score,
            confidence_text(report.confidence_score)
        ),
        "Field checks:".to_string(),
        format!("  - Aadhaar Number: {}", validations.id_number.status.label()),
        format!("  - Name: {}", validations.name.status.label()),
        format!("  - Date of Birth: {}", validations.dob.status.label()),
        format!("  - Gender: {}", validations.gender.status.label()),
        "Risk breakdown:".to_string(),
        format!(
            "  - Text extraction: {} ({} fields extracted)",
            risk.text_extraction_risk.label(),
            risk.fields_extracted
        ),
        format!(
            "  - Data consistency: {}",
            risk.data_consistency_risk.label()
        ),
        format!("  - Image quality: {}", risk.image_quality_risk.label()),
    ];

    for flag in &risk.inconsistencies {
        lines.push(format!("    ! {}", flag.label()));
    }
    if !report.indicators.is_empty() {
        lines.push("Indicators:".to_string());
        lines.extend(report.indicators.iter().map(|indicator| format!("  - {indicator}")));
    }

    lines
}

fn batch_summary(report: &BatchReport) -> Vec<String> {
    let summary = &report.summary;
    let distribution = &summary.risk_distribution;

    let mut lines = vec![
        format!("Batch verification report ({} files)", report.total_files),
        format!(
            "- {} valid | {} not Aadhaar | {} errors | {:.0}% success rate",
            summary.valid_count,
            summary.non_aadhaar_count,
            summary.error_count,
            summary.success_rate_pct
        ),
        format!(
            "- Risk mix: LOW {} | MODERATE {} | HIGH {} | overall {}",
            distribution.low,
            distribution.moderate,
            distribution.high,
            summary.overall_batch_risk.label()
        ),
        "Files:".to_string(),
    ];

    for entry in &report.detailed_results {
        let filename = entry.filename.as_deref().unwrap_or("(unnamed)");
        let line = match entry.error_type.as_deref() {
            Some(error) => format!("  - {filename}: {error}"),
            None => format!("  - {filename}: {}", entry.overall_assessment.label()),
        };
        lines.push(line);
    }

    lines
}

fn confidence_text(confidence: Option<f64>) -> String {
    confidence.map_or_else(|| "N/A".to_string(), |value| value.to_string())
}

fn descriptor_json(descriptor: &DownloadDescriptor) -> Result<String, AppError> {
    serde_json::to_string_pretty(descriptor)
        .map_err(|err| AppError::Export(err.into()))
}
