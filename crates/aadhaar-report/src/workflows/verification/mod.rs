//! Result-processing core: field validation, risk scoring, batch aggregation,
//! and report export.

pub mod batch;
pub mod domain;
pub mod package;
pub mod report;
pub mod risk;
pub mod validation;

pub use batch::{BatchAggregator, BatchSummary, Bucket, RiskDistribution};
pub use domain::{
    Assessment, ErrorKind, ExtractedFields, ExtractionResult, RiskLevel, ShapeError,
    ValidationOutcome, ValidationStatus,
};
pub use package::{
    report_file_stem, DownloadDescriptor, ExportFormat, FormatParseError, ReportPackager,
};
pub use report::{
    BatchEntry, BatchReport, ExportError, Report, ReportBuilder, ReportKind, SingleReport,
};
pub use risk::{ConsistencyFlag, RiskBreakdown, RiskScorer};
pub use validation::{
    validate_dob, validate_gender, validate_id_number, validate_name, FieldValidations,
};
