#![deny(missing_docs)]
//! Warden command-line interface.
//!
//! Runs built-in guards against JSON candidates in any of their forms, and
//! waits for files to reach an expected state.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Write;
use std::path::PathBuf;
use std::time::Duration;
use warden_core::{
    Candidate, FileProbe, GuardForm, Guards, ProbeFormat, StdFileSystem, WaitUntilCall,
    WaitUntilOptions, build_catalog, filter_catalog, guards, render_catalog_markdown,
    render_catalog_text, render_json,
};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "warden", version, about = "Warden CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct GuardArgs {
    /// Guard name, e.g. `is_enum_value`.
    guard: String,
    /// Candidate as JSON; `undefined` when omitted.
    candidate: Option<String>,
    /// Extra guard argument as JSON (repeatable).
    #[arg(long = "arg")]
    args: Vec<String>,
}

#[derive(Args, Clone, Debug)]
struct MessageArgs {
    /// Failure message replacing the computed one.
    #[arg(short, long)]
    message: Option<String>,
}

#[derive(Args, Clone, Debug)]
struct WaitUntilArgs {
    /// Guard name, e.g. `has_key`.
    guard: String,
    /// File whose contents are polled.
    #[arg(long)]
    file: PathBuf,
    /// Treat the file as plain text instead of JSON.
    #[arg(long)]
    text: bool,
    /// Extra guard argument as JSON (repeatable).
    #[arg(long = "arg")]
    args: Vec<String>,
    /// Delay between attempts in milliseconds.
    #[arg(long, env = "WARDEN_INTERVAL_MS", default_value_t = 100)]
    interval_ms: u64,
    /// Total polling budget in milliseconds.
    #[arg(long, env = "WARDEN_TIMEOUT_MS", default_value_t = 10_000)]
    timeout_ms: u64,
    /// Prefix for the timeout message.
    #[arg(short, long)]
    message: Option<String>,
}

#[derive(Args, Clone, Debug)]
struct OutputArgs {
    /// Output format for the catalog.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// List guards and the forms they are available in.
    List {
        /// Only list guards exposed through this form.
        #[arg(long, value_parser = parse_form)]
        form: Option<GuardForm>,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Assert a candidate; fails with the assertion message.
    Assert {
        #[command(flatten)]
        guard: GuardArgs,
        #[command(flatten)]
        message: MessageArgs,
    },
    /// Print `true` or `false`.
    Check {
        #[command(flatten)]
        guard: GuardArgs,
    },
    /// Assert a candidate and print it back.
    AssertWrap {
        #[command(flatten)]
        guard: GuardArgs,
        #[command(flatten)]
        message: MessageArgs,
    },
    /// Print the candidate when it passes, `undefined` otherwise.
    CheckWrap {
        #[command(flatten)]
        guard: GuardArgs,
    },
    /// Poll a file until its contents pass the guard.
    WaitUntil(WaitUntilArgs),
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli.command, guards()).await {
        Ok(output) => {
            print!("{output}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            let mut source = std::error::Error::source(err.as_ref());
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = std::error::Error::source(cause);
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
fn main() {}

async fn run(command: Commands, guards: &Guards<Candidate>) -> CliResult<String> {
    match command {
        Commands::List { form, report } => run_list(guards, form, report.format),
        Commands::Assert { guard, message } => {
            run_assert(guards, &guard, message.message.as_deref())
        }
        Commands::Check { guard } => run_check(guards, &guard),
        Commands::AssertWrap { guard, message } => {
            run_assert_wrap(guards, &guard, message.message.as_deref())
        }
        Commands::CheckWrap { guard } => run_check_wrap(guards, &guard),
        Commands::WaitUntil(args) => run_wait_until(guards, args).await,
    }
}

fn parse_form(value: &str) -> Result<GuardForm, String> {
    GuardForm::parse(value).ok_or_else(|| {
        let known: Vec<&str> = GuardForm::ALL.iter().map(|form| form.as_str()).collect();
        format!("unknown form `{value}`, expected one of {}", known.join(", "))
    })
}

/// Parse a command-line value: `undefined`, JSON, or else a bare string.
fn parse_value(input: &str) -> Candidate {
    if input == "undefined" {
        return None;
    }
    Some(
        serde_json::from_str(input)
            .unwrap_or_else(|_| serde_json::Value::String(input.to_string())),
    )
}

fn render_candidate(candidate: &Candidate) -> String {
    match candidate {
        None => "undefined".to_string(),
        Some(value) => value.to_string(),
    }
}

fn parse_guard_args(args: &GuardArgs) -> (Candidate, Vec<Candidate>) {
    let candidate = args.candidate.as_deref().and_then(parse_value);
    let extra = args.args.iter().map(|arg| parse_value(arg)).collect();
    (candidate, extra)
}

fn run_list(
    guards: &Guards<Candidate>,
    form: Option<GuardForm>,
    format: OutputFormat,
) -> CliResult<String> {
    let mut catalog = build_catalog(guards);
    if let Some(form) = form {
        catalog = filter_catalog(catalog, form);
    }
    let contents = match format {
        OutputFormat::Text => render_catalog_text(&catalog),
        OutputFormat::Markdown => render_catalog_markdown(&catalog),
        OutputFormat::Json => {
            let mut json = render_json(&catalog)?;
            json.push('\n');
            json
        }
    };
    Ok(contents)
}

fn run_assert(
    guards: &Guards<Candidate>,
    args: &GuardArgs,
    message: Option<&str>,
) -> CliResult<String> {
    let (candidate, extra) = parse_guard_args(args);
    guards.assert(&args.guard, &candidate, &extra, message)?;
    log::debug!("{} passed for {}", args.guard, render_candidate(&candidate));
    Ok("ok\n".to_string())
}

fn run_check(guards: &Guards<Candidate>, args: &GuardArgs) -> CliResult<String> {
    let (candidate, extra) = parse_guard_args(args);
    let passed = guards.check(&args.guard, &candidate, &extra)?;
    Ok(format!("{passed}\n"))
}

fn run_assert_wrap(
    guards: &Guards<Candidate>,
    args: &GuardArgs,
    message: Option<&str>,
) -> CliResult<String> {
    let (candidate, extra) = parse_guard_args(args);
    let value = guards.assert_wrap(&args.guard, candidate, &extra, message)?;
    Ok(format!("{}\n", render_candidate(&value)))
}

fn run_check_wrap(guards: &Guards<Candidate>, args: &GuardArgs) -> CliResult<String> {
    let (candidate, extra) = parse_guard_args(args);
    let value = guards.check_wrap(&args.guard, candidate, &extra)?;
    Ok(format!("{}\n", render_candidate(&value.flatten())))
}

async fn run_wait_until(guards: &Guards<Candidate>, args: WaitUntilArgs) -> CliResult<String> {
    let format = if args.text {
        ProbeFormat::Text
    } else {
        ProbeFormat::Json
    };
    let probe = FileProbe::new(StdFileSystem::new(), &args.file).with_format(format);
    let options = WaitUntilOptions::default()
        .with_interval(Duration::from_millis(args.interval_ms))
        .with_timeout(Duration::from_millis(args.timeout_ms));
    let mut call = WaitUntilCall::new(probe.into_callback())
        .with_args(args.args.iter().map(|arg| parse_value(arg)).collect())
        .with_options(options);
    if let Some(message) = args.message {
        call = call.with_message(message);
    }

    log::info!(
        "waiting up to {}ms for {} to pass {}",
        args.timeout_ms,
        args.file.display(),
        args.guard
    );
    let value = guards.wait_until_call(&args.guard, call).await?;
    let mut output = String::new();
    let _ = writeln!(output, "{}", render_candidate(&value));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::{
        Cli, Commands, GuardArgs, OutputFormat, WaitUntilArgs, parse_form, parse_value, run,
        run_assert, run_check, run_check_wrap, run_list, run_wait_until,
    };
    use clap::Parser;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use warden_core::{GuardForm, WardenError, guards};

    fn guard_args(guard: &str, candidate: Option<&str>, args: &[&str]) -> GuardArgs {
        GuardArgs {
            guard: guard.to_string(),
            candidate: candidate.map(str::to_string),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    fn wait_args(guard: &str, file: PathBuf, args: &[&str], timeout_ms: u64) -> WaitUntilArgs {
        WaitUntilArgs {
            guard: guard.to_string(),
            file,
            text: false,
            args: args.iter().map(|arg| arg.to_string()).collect(),
            interval_ms: 5,
            timeout_ms,
            message: None,
        }
    }

    #[test]
    fn values_parse_as_json_or_strings() {
        assert_eq!(parse_value("undefined"), None);
        assert_eq!(parse_value("null"), Some(json!(null)));
        assert_eq!(parse_value("{\"a\":1}"), Some(json!({"a": 1})));
        assert_eq!(parse_value("\"A\""), Some(json!("A")));
        assert_eq!(parse_value("A"), Some(json!("A")));
    }

    #[test]
    fn forms_parse_from_any_spelling() {
        assert_eq!(parse_form("check-wrap"), Ok(GuardForm::CheckWrap));
        assert!(parse_form("maybe").is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "warden",
            "check",
            "is_enum_value",
            "A",
            "--arg",
            "[\"a\",\"b\"]",
        ])
        .expect("parse");
        match cli.command {
            Commands::Check { guard } => {
                assert_eq!(guard.guard, "is_enum_value");
                assert_eq!(guard.candidate.as_deref(), Some("A"));
                assert_eq!(guard.args, vec!["[\"a\",\"b\"]".to_string()]);
            }
            _ => panic!("expected check command"),
        }

        let cli = Cli::try_parse_from([
            "warden",
            "wait-until",
            "has_key",
            "--file",
            "/tmp/status.json",
            "--arg",
            "ready",
            "--interval-ms",
            "5",
            "--timeout-ms",
            "50",
        ])
        .expect("parse");
        match cli.command {
            Commands::WaitUntil(args) => {
                assert_eq!(args.file, PathBuf::from("/tmp/status.json"));
                assert_eq!(args.interval_ms, 5);
                assert_eq!(args.timeout_ms, 50);
            }
            _ => panic!("expected wait-until command"),
        }
    }

    #[test]
    fn check_prints_booleans() {
        let output =
            run_check(guards(), &guard_args("is_above", Some("5"), &["3"])).expect("check");
        assert_eq!(output, "true\n");
        let output =
            run_check(guards(), &guard_args("is_above", Some("2"), &["3"])).expect("check");
        assert_eq!(output, "false\n");
    }

    #[test]
    fn check_wrap_prints_candidate_or_undefined() {
        let args = guard_args("is_enum_value", Some("a"), &["{\"A\":\"a\"}"]);
        assert_eq!(run_check_wrap(guards(), &args).expect("check wrap"), "\"a\"\n");
        let args = guard_args("is_enum_value", Some("A"), &["{\"A\":\"a\"}"]);
        assert_eq!(run_check_wrap(guards(), &args).expect("check wrap"), "undefined\n");
    }

    #[test]
    fn assert_reports_the_assertion_message() {
        let args = guard_args("is_enum_value", Some("A"), &["[\"a\",\"b\",\"c\"]"]);
        let err = run_assert(guards(), &args, None).expect_err("assert fails");
        assert_eq!(err.to_string(), "A is not an enum value in 'a,b,c'.");
        let err = run_assert(guards(), &args, Some("custom msg")).expect_err("assert fails");
        assert_eq!(err.to_string(), "custom msg");
        assert_eq!(
            run_assert(guards(), &guard_args("is_defined", Some("1"), &[]), None).expect("passes"),
            "ok\n"
        );
    }

    #[test]
    fn unknown_guards_are_errors() {
        let err =
            run_check(guards(), &guard_args("is_teapot", Some("1"), &[])).expect_err("unknown");
        let err = err.downcast::<WardenError>().expect("warden error");
        assert!(matches!(*err, WardenError::UnknownGuard { .. }));
    }

    #[test]
    fn list_supports_formats_and_form_filter() {
        let text = run_list(guards(), None, OutputFormat::Text).expect("text");
        assert!(text.contains("is_undefined\tnullish\t"));

        let markdown = run_list(guards(), None, OutputFormat::Markdown).expect("markdown");
        assert!(markdown.contains("## enums"));

        let json =
            run_list(guards(), Some(GuardForm::CheckWrap), OutputFormat::Json).expect("json");
        let entries: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        let names: Vec<&str> = entries
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|entry| entry["name"].as_str())
            .collect();
        assert!(names.contains(&"is_null"));
        assert!(!names.contains(&"is_undefined"));
    }

    #[tokio::test]
    async fn run_dispatches_commands() {
        let cli =
            Cli::try_parse_from(["warden", "assert-wrap", "is_string", "warden"]).expect("parse");
        assert_eq!(run(cli.command, guards()).await.expect("run"), "\"warden\"\n");
    }

    #[tokio::test]
    async fn wait_until_reads_the_file() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create temp dir");
        let file = root.join("status.json");
        std::fs::write(&file, "{\"ready\": true}").expect("write status");

        let output = run_wait_until(guards(), wait_args("has_key", file, &["ready"], 1_000))
            .await
            .expect("file passes");
        assert_eq!(output, "{\"ready\":true}\n");

        std::fs::remove_dir_all(&root).expect("cleanup temp dir");
    }

    #[tokio::test]
    async fn wait_until_times_out_on_missing_files() {
        let root = std::env::temp_dir().join(unique_dir_name());
        let mut args = wait_args("is_defined", root.join("never.json"), &[], 20);
        args.message = Some("status file".to_string());

        let err = run_wait_until(guards(), args).await.expect_err("times out");
        let message = err.to_string();
        assert!(message.starts_with("status file: Timeout of '20' milliseconds"));
    }

    fn unique_dir_name() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        let count = COUNTER.fetch_add(1, Ordering::SeqCst);
        PathBuf::from(format!("warden_cli_test_{nanos}_{count}"))
    }
}
