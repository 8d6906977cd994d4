use crate::report::{run_report, ReportArgs};
use crate::server;
use aadhaar_report::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Aadhaar Verification Reports",
    about = "Turn upstream Aadhaar verification results into downloadable reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Render a report from a saved upstream response
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aadhaar_report::workflows::intake::VerificationMode;
    use aadhaar_report::workflows::verification::ExportFormat;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["aadhaar-report-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn report_command_parses_mode_and_format() {
        let cli = Cli::try_parse_from([
            "aadhaar-report-api",
            "report",
            "--input",
            "response.json",
            "--mode",
            "batch",
            "--format",
            "CSV",
            "--generated-at",
            "2026-03-14T09:30:00Z",
        ])
        .expect("parses");

        let Some(Command::Report(args)) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.mode, VerificationMode::Batch);
        assert_eq!(args.format, Some(ExportFormat::Csv));
        assert!(args.generated_at.is_some());
        assert!(!args.descriptor);
    }

    #[test]
    fn report_command_rejects_unknown_format() {
        let result = Cli::try_parse_from([
            "aadhaar-report-api",
            "report",
            "--input",
            "response.json",
            "--mode",
            "single",
            "--format",
            "xlsx",
        ]);
        assert!(result.is_err());
    }
}
