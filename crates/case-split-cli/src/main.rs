use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use case_split_core::{case_split, CaseTable, ScanOrder, Split, Subject};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod case_file;

use case_file::CaseFile;

#[derive(Parser)]
#[command(name = "case-split")]
#[command(about = "Dispatch JSON subjects against a case table", long_about = None)]
struct Cli {
    /// Case table file (JSON)
    #[arg(short, long)]
    cases: PathBuf,

    /// Overrides the scan order from the case file
    #[arg(long, value_enum)]
    scan_order: Option<OrderArg>,

    /// Dispatch a single subject instead of reading NDJSON from stdin
    #[arg(short, long)]
    subject: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "CASE_SPLIT_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    CaseTable,
    Subject,
}

impl From<OrderArg> for ScanOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::CaseTable => ScanOrder::CaseTable,
            OrderArg::Subject => ScanOrder::Subject,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(false)` when at least one subject failed to dispatch.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let table = CaseFile::load(&cli.cases)?.into_table(cli.scan_order.map(ScanOrder::from))?;
    info!(cases = table.len(), order = %table.scan_order(), "case table loaded");
    let cases = Arc::new(table);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(raw) = cli.subject {
        return dispatch_line(&cases, &raw, "subject", &mut out);
    }

    let failed = dispatch_lines(&cases, io::stdin().lock(), &mut out)?;
    Ok(failed.is_empty())
}

/// Dispatches NDJSON subjects, skipping blank lines.
///
/// Returns the 1-based numbers of the lines that failed to dispatch.
fn dispatch_lines(
    cases: &Arc<CaseTable<Value>>,
    input: impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<Vec<usize>> {
    let mut failed = Vec::new();
    for (n, line) in input.lines().enumerate() {
        let line = line.context("read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let label = format!("line {}", n + 1);
        if !dispatch_line(cases, &line, &label, out)? {
            failed.push(n + 1);
        }
    }
    Ok(failed)
}

/// Dispatches one JSON subject and writes the result.
///
/// Dispatch failures are reported on stderr and yield `Ok(false)`; only I/O
/// errors abort.
fn dispatch_line(
    cases: &Arc<CaseTable<Value>>,
    raw: &str,
    label: &str,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let subject = match serde_json::from_str::<Value>(raw)
        .map_err(anyhow::Error::from)
        .and_then(|v| Subject::from_json(v).map_err(anyhow::Error::from))
    {
        Ok(subject) => subject,
        Err(e) => {
            eprintln!("{label}: {e}");
            return Ok(false);
        }
    };

    match case_split(cases, subject.as_ref()) {
        Ok(Split::Ready(value)) => {
            writeln!(out, "{value}")?;
            Ok(true)
        }
        Ok(Split::Deferred(_)) => {
            warn!(%label, "null subject skipped");
            Ok(true)
        }
        Err(e) => {
            eprintln!("{label}: {e}");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn cases() -> Arc<CaseTable<Value>> {
        let file = CaseFile::parse(r#"{ "cases": { "ok": "payload" } }"#).unwrap();
        Arc::new(file.into_table(None).unwrap())
    }

    fn dispatch(raw: &str) -> (bool, String) {
        let mut out = Vec::new();
        let ok = dispatch_line(&cases(), raw, "test", &mut out).unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn writes_result_as_json_line() {
        assert_eq!(dispatch(r#"{"ok": {"n": 1}}"#), (true, "{\"n\":1}\n".to_string()));
    }

    #[test]
    fn unmatched_subject_fails_without_output() {
        assert_eq!(dispatch(r#"{"nope": 1}"#), (false, String::new()));
    }

    #[rstest]
    #[case::null("null")]
    #[case::false_("false")]
    #[case::zero("0")]
    #[case::empty_string(r#""""#)]
    fn falsy_subject_is_skipped(#[case] raw: &str) {
        assert_eq!(dispatch(raw), (true, String::new()));
    }

    #[rstest]
    #[case::malformed("{")]
    #[case::number("42")]
    #[case::string(r#""ok""#)]
    fn malformed_or_truthy_scalar_subject_fails(#[case] raw: &str) {
        assert_eq!(dispatch(raw), (false, String::new()));
    }

    #[test]
    fn ndjson_reports_failed_line_numbers() {
        let input = "{\"ok\": 1}\n\n{\"nope\": 2}\n   \nnull\n{\"ok\": [3]}\n42\n";
        let mut out = Vec::new();
        let failed = dispatch_lines(&cases(), Cursor::new(input), &mut out).unwrap();
        assert_eq!(failed, vec![3, 7]);
        assert_eq!(String::from_utf8(out).unwrap(), "1\n[3]\n");
    }

    #[test]
    fn ndjson_all_ok_has_no_failures() {
        let mut out = Vec::new();
        let failed = dispatch_lines(&cases(), Cursor::new("{\"ok\": true}\n"), &mut out).unwrap();
        assert!(failed.is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "true\n");
    }
}
