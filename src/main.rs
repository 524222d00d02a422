use mcstatus_query::run;
use std::io::Write;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() {
    // Stdout carries the report, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mcstatus_query=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    let report = run(args);

    // The exit status is always 0, even if the parent closed our stdout.
    if let Err(err) = writeln!(std::io::stdout().lock(), "{}", report.to_json_line()) {
        warn!(error = %err, "failed to write report");
    }
}
