mod logging;
mod render;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use ariadne::{Color, Fmt};
use clap::{Parser, Subcommand};
use labeldesk_core::render::NO_CONTENT_MESSAGE;
use labeldesk_core::{
    InterpretOptions, Preview, SAMPLE_LABELS, VisualTree, preview, sample, to_html,
    to_html_document, to_pretty_json,
};
use labeldesk_health::{
    Classification, Console, ConsoleConfig, ConsoleError, HealthSnapshot, LatencyGrade, Presence,
    SqlOutcome, TargetKind,
};
use labeldesk_print_client::PrinterEmulator;
use tracing::info;

use crate::render::{
    CheckLine, Format, emit, error_envelope, mark, mebibytes, print_checklist, verdict,
};

/// Exit status for request-level errors (unknown printer, empty command, ...).
const EXIT_REQUEST_ERROR: u8 = 2;

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "labeldesk",
    version,
    about = "Label preview and printer/database health console"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// TOML configuration file layered between defaults and environment.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Label preview ───────────────────────────────────────────────
    /// Preview label markup from a file, stdin ("-"), or a sample.
    Preview {
        /// Markup file; "-" or omitted reads stdin.
        #[arg(conflicts_with = "sample")]
        file: Option<String>,
        /// Preview a built-in sample instead.
        #[arg(long)]
        sample: Option<String>,
        /// Print an HTML fragment instead of the visual tree.
        #[arg(long)]
        html: bool,
    },

    /// List the built-in sample labels.
    Samples,

    // ── Health ──────────────────────────────────────────────────────
    /// Live health, or per-target detail with --detailed.
    Health {
        #[arg(long)]
        detailed: bool,
    },

    /// Diagnostic report, or flat booleans with --full.
    Diagnose {
        #[arg(long)]
        full: bool,
    },

    /// Start-up connectivity check. Always exits 0.
    Preflight,

    // ── Operations ──────────────────────────────────────────────────
    /// Printer operations.
    #[command(subcommand)]
    Printers(PrinterCmd),

    /// SQL console.
    #[command(subcommand)]
    Sql(SqlCmd),

    /// Run an emulated printer until interrupted.
    Emulate {
        #[arg(long, default_value = "ZEBRA-001")]
        name: String,
        #[arg(long, default_value = "ZT230")]
        model: String,
        #[arg(long, default_value = "0.0.0.0:9100")]
        bind: String,
    },
}

#[derive(Subcommand, Debug)]
enum PrinterCmd {
    /// Reachability of every printer, or online/offline for one.
    Status { id: Option<String> },
    /// Whether a printer accepts a connection.
    Test { id: String },
    /// Send the built-in test label.
    TestPrint { id: String },
    /// Send a raw command and show the reply line.
    Send { id: String, command: String },
    /// List the command catalogue.
    Commands,
    /// Read identity, status, and settings.
    Info { id: String },
}

#[derive(Subcommand, Debug)]
enum SqlCmd {
    /// Connect and run a trivial query.
    Test { alias: String },
    /// Run a query; rows are printed as arrays.
    Query {
        #[arg(long)]
        database: String,
        query: String,
    },
    /// List base tables.
    Tables { alias: String },
}

// ── Main ────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());
    logging::init(cli.log_json);

    match run(cli, format).await {
        Ok(code) => code,
        Err(e) => {
            error_envelope(format, &format!("{e:#}"));
            let request_error = e
                .downcast_ref::<ConsoleError>()
                .is_some_and(ConsoleError::is_client_error);
            if request_error {
                ExitCode::from(EXIT_REQUEST_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli, format: Format) -> Result<ExitCode> {
    let config = cli.config;
    match cli.cmd {
        Cmd::Preview { file, sample, html } => cmd_preview(file, sample, html, format),
        Cmd::Samples => Ok(cmd_samples(format)),
        Cmd::Emulate { name, model, bind } => cmd_emulate(name, model, &bind, format).await,
        Cmd::Health { detailed } => {
            Ok(cmd_health(&open_console(config.as_deref())?, detailed, format).await)
        }
        Cmd::Diagnose { full } => {
            Ok(cmd_diagnose(&open_console(config.as_deref())?, full, format).await)
        }
        Cmd::Preflight => Ok(cmd_preflight(&open_console(config.as_deref())?, format).await),
        Cmd::Printers(sub) => cmd_printers(&open_console(config.as_deref())?, sub, format).await,
        Cmd::Sql(sub) => cmd_sql(&open_console(config.as_deref())?, sub, format).await,
    }
}

fn open_console(path: Option<&Path>) -> Result<Console> {
    let config = ConsoleConfig::load(path).context("failed to load configuration")?;
    Ok(Console::new(config))
}

fn success_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ── Preview ─────────────────────────────────────────────────────────────

fn read_markup(file: Option<&str>) -> Result<String> {
    match file {
        None | Some("-") => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {path}")),
    }
}

fn cmd_preview(
    file: Option<String>,
    sample_name: Option<String>,
    html: bool,
    format: Format,
) -> Result<ExitCode> {
    let markup = match sample_name {
        Some(name) => sample(&name)
            .map(|s| s.markup.to_string())
            .ok_or_else(|| ConsoleError::BadRequest(format!("Unknown sample: {name}")))?,
        None => read_markup(file.as_deref())?,
    };
    let result = preview(&markup, &InterpretOptions::default());

    if html {
        let out = match &result {
            Preview::Label(rendered) => to_html_document(rendered),
            Preview::ControlCommand { command } => to_html(&VisualTree::Placeholder {
                message: format!("Control command: {command}"),
            }),
            Preview::Blank => to_html(&VisualTree::Placeholder {
                message: NO_CONTENT_MESSAGE.to_string(),
            }),
        };
        println!("{out}");
        return Ok(ExitCode::SUCCESS);
    }

    match format {
        Format::Json => println!("{}", to_pretty_json(&result)),
        Format::Pretty => match &result {
            Preview::Blank => eprintln!("nothing to preview"),
            Preview::ControlCommand { command } => {
                eprintln!("{}: {command}", "control command".fg(Color::Cyan));
            }
            Preview::Label(rendered) => {
                // Tree to stdout, summary to stderr.
                println!("{}", to_pretty_json(&rendered.tree));
                let types: Vec<String> = rendered
                    .info
                    .types
                    .iter()
                    .map(|(kind, n)| format!("{kind}: {n}"))
                    .collect();
                eprintln!(
                    "{} element(s) ({})",
                    rendered.info.element_count.fg(Color::Cyan),
                    types.join(", ")
                );
            }
        },
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_samples(format: Format) -> ExitCode {
    let samples: Vec<_> = SAMPLE_LABELS
        .iter()
        .map(|s| serde_json::json!({ "name": s.name, "markup": s.markup }))
        .collect();
    emit(format, &samples, |_| {
        for s in SAMPLE_LABELS {
            let elements = match preview(s.markup, &InterpretOptions::default()) {
                Preview::Label(rendered) => rendered.info.element_count,
                _ => 0,
            };
            println!("{:<12} {elements} element(s)", s.name.fg(Color::Cyan));
        }
    });
    ExitCode::SUCCESS
}

// ── Health ──────────────────────────────────────────────────────────────

fn exit_for(status: Classification) -> ExitCode {
    success_code(status == Classification::Healthy)
}

fn snapshot_lines(snapshot: &HealthSnapshot) -> Vec<CheckLine> {
    snapshot
        .results
        .iter()
        .map(|r| CheckLine {
            kind: match r.kind {
                TargetKind::Database => "database",
                TargetKind::Printer => "printer",
            },
            target: r.target.clone(),
            ok: r.success,
            detail: Some(match &r.error {
                Some(e) => e.clone(),
                None => format!("{} ms", r.latency_ms),
            }),
        })
        .collect()
}

fn bool_lines<'a>(
    kind: &'static str,
    entries: impl IntoIterator<Item = (&'a String, bool)>,
) -> impl Iterator<Item = CheckLine> {
    entries.into_iter().map(move |(target, ok)| CheckLine {
        kind,
        target: target.clone(),
        ok,
        detail: None,
    })
}

async fn cmd_health(console: &Console, detailed: bool, format: Format) -> ExitCode {
    if detailed {
        let health = console.detailed_health().await;
        emit(format, &health, |h| {
            let db = bool_lines("database", h.database.iter().map(|(k, c)| (k, c.success)));
            let printers = bool_lines("printer", h.printers.iter().map(|(k, c)| (k, c.success)));
            print_checklist(h.summary.overall_status, db.chain(printers));
        });
        return exit_for(health.summary.overall_status);
    }

    let live = console.live_health().await;
    emit(format, &live, |l| {
        let grade = match l.network.status {
            LatencyGrade::Good => "good".fg(Color::Green),
            LatencyGrade::Warning => "warning".fg(Color::Yellow),
            LatencyGrade::Poor => "poor".fg(Color::Red),
        };
        println!("{}", verdict(l.status));
        println!("  uptime   {:.1} s", l.uptime);
        println!("  memory   {} resident", mebibytes(l.memory.rss_bytes));
        println!("  latency  {} ms ({grade})", l.network.latency_ms);
        println!("  at       {}", l.timestamp);
    });
    exit_for(live.status)
}

async fn cmd_diagnose(console: &Console, full: bool, format: Format) -> ExitCode {
    if full {
        let diag = console.full_diagnostics().await;
        emit(format, &diag, |d| {
            let db = bool_lines("database", d.database.iter().map(|(k, v)| (k, *v)));
            let printers = bool_lines("printer", d.printers.iter().map(|(k, v)| (k, *v)));
            print_checklist(d.status, db.chain(printers));
            println!("  latency  {} ms", d.network.latency_ms);
        });
        return exit_for(diag.status);
    }

    let report = console.diagnostic_report().await;
    emit(format, &report, |r| {
        let db = bool_lines(
            "database",
            r.details.database.iter().map(|(k, c)| (k, c.success)),
        );
        let printers = bool_lines(
            "printer",
            r.details
                .printers
                .iter()
                .map(|(k, p)| (k, p.connection.success)),
        );
        print_checklist(r.summary.overall_status, db.chain(printers));
        println!(
            "  {}/{} checks passed, generated {}",
            r.summary.passed_checks, r.summary.total_checks, r.generated
        );
    });
    exit_for(report.summary.overall_status)
}

async fn cmd_preflight(console: &Console, format: Format) -> ExitCode {
    let snapshot = console.preflight().await;
    emit(format, &snapshot, |s| {
        print_checklist(s.classification(), snapshot_lines(s));
    });
    ExitCode::SUCCESS
}

// ── Printers ────────────────────────────────────────────────────────────

async fn cmd_printers(console: &Console, cmd: PrinterCmd, format: Format) -> Result<ExitCode> {
    let printers = console.printers();
    match cmd {
        PrinterCmd::Status { id: None } => {
            let all = printers.status_all().await;
            emit(format, &all, |all| {
                for (id, p) in all {
                    println!(
                        "{} {id:<10} {} ({}) {}:{}",
                        mark(p.connection.success),
                        p.target.display_name,
                        p.target.model,
                        p.target.host,
                        p.target.port
                    );
                }
            });
            Ok(ExitCode::SUCCESS)
        }
        PrinterCmd::Status { id: Some(id) } => {
            let report = printers.status(&id).await?;
            emit(format, &report, |r| {
                let word = match r.status {
                    Presence::Online => "online".fg(Color::Green),
                    Presence::Offline => "offline".fg(Color::Red),
                };
                println!("{id}: {word}");
            });
            Ok(ExitCode::SUCCESS)
        }
        PrinterCmd::Test { id } => {
            let check = printers.test(&id).await?;
            emit(format, &check, |c| println!("{} {id}", mark(c.success)));
            Ok(success_code(check.success))
        }
        PrinterCmd::TestPrint { id } => {
            let check = printers.test_print(&id).await?;
            emit(format, &check, |c| {
                println!("{} test label sent to {id}", mark(c.success));
            });
            Ok(success_code(check.success))
        }
        PrinterCmd::Send { id, command } => {
            let outcome = printers.send_command(&id, &command).await?;
            emit(format, &outcome, |o| {
                println!("{} {command}", mark(o.success));
                if let Some(reply) = &o.response {
                    println!("{reply}");
                }
            });
            Ok(success_code(outcome.success))
        }
        PrinterCmd::Commands => {
            let catalogue = printers.commands();
            emit(format, &catalogue, |c| {
                println!("host identification  {}", c.host_identification);
                println!("host status          {}", c.host_status);
                println!("ping                 {}", c.ping);
                println!("config dump          {}", c.config_dump);
            });
            Ok(ExitCode::SUCCESS)
        }
        PrinterCmd::Info { id } => {
            let info = printers.info(&id).await?;
            emit(format, &info, |i| {
                println!(
                    "{} {} firmware {} serial {}",
                    i.identity.name.as_str().fg(Color::Cyan),
                    i.identity.model,
                    i.identity.firmware,
                    i.identity.serial
                );
                println!("  state {} jobs {}", i.status.state, i.status.jobs_printed);
                println!(
                    "  {} dpi, {}x{} in, darkness {}, speed {}",
                    i.settings.dpi,
                    i.settings.width_in,
                    i.settings.length_in,
                    i.settings.darkness,
                    i.settings.speed
                );
            });
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ── SQL ─────────────────────────────────────────────────────────────────

async fn cmd_sql(console: &Console, cmd: SqlCmd, format: Format) -> Result<ExitCode> {
    let sql = console.sql();
    let outcome = match cmd {
        SqlCmd::Test { alias } => sql.test_connection(&alias).await,
        SqlCmd::Query { database, query } => sql.execute(&database, &query).await?,
        SqlCmd::Tables { alias } => sql.list_tables(&alias).await,
    };
    emit(format, &outcome, print_sql_outcome);
    Ok(success_code(outcome.success))
}

fn print_sql_outcome(outcome: &SqlOutcome) {
    if let Some(error) = &outcome.error {
        eprintln!("{}: {error}", "error".fg(Color::Red));
        return;
    }
    if let Some(message) = &outcome.message {
        println!("{} {message}", mark(true));
    }
    if let Some(serde_json::Value::Array(rows)) = &outcome.recordset {
        for row in rows {
            println!("{row}");
        }
        eprintln!("{} row(s)", rows.len());
    }
}

// ── Emulator ────────────────────────────────────────────────────────────

async fn cmd_emulate(name: String, model: String, bind: &str, format: Format) -> Result<ExitCode> {
    let running = PrinterEmulator::new(name, model)
        .spawn(bind)
        .await
        .context("failed to start emulator")?;
    let state = running.emulator().snapshot();
    let listening = serde_json::json!({
        "listening": running.local_addr().to_string(),
        "name": state.name,
        "model": state.model,
    });
    emit(format, &listening, |_| {
        println!(
            "{} ({}) listening on {}",
            state.name.as_str().fg(Color::Cyan),
            state.model,
            running.local_addr()
        );
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for interrupt")?;
    info!(
        jobs_printed = running.emulator().snapshot().jobs_printed,
        "emulator stopped"
    );
    running.shutdown();
    Ok(ExitCode::SUCCESS)
}
