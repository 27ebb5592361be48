// # cfaname - Cloudflare ALIAS/ANAME synchronizer
//
// Runs one reconciliation pass: resolves the configured target hostname and
// makes the A/AAAA records under the alias name match its addresses.
// Recurring execution is left to a timer or cron job.
//
// This binary is a thin integration layer: it parses flags, loads the YAML
// configuration, sets up logging and hands off to `aname_core::AliasEngine`.
//
// ## Configuration
//
// ```yaml
// cloudflare:
//   api-token: "..."        # or set CFANAME_API_TOKEN
//   zone-id: "..."
// record:
//   name: example.com
//   target: lb.example.net
//   ttl: 60                 # optional, 0 or unset means 60
// ```
//
// ## Example
//
// ```bash
// cfaname --conf /etc/cfaname/config.yaml
// ```

use aname_core::{AliasEngine, AppConfig, CancellationToken, ReconcileReport, SystemResolver};
use aname_provider_cloudflare::CloudflareProvider;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Environment variable overriding `cloudflare.api-token`
const API_TOKEN_ENV: &str = "CFANAME_API_TOKEN";

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum AnameExitCode {
    /// Pass completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Resolution, provider or cancellation failure during the pass
    RuntimeError = 2,
}

impl From<AnameExitCode> for ExitCode {
    fn from(code: AnameExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep A/AAAA records of a name in sync with the addresses of another name.
#[derive(Parser, Debug)]
#[command(name = "cfaname")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.yaml")]
    conf: PathBuf,

    /// Show changes without applying them
    #[arg(long)]
    dry_run: bool,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Rewrite the single-dash `-conf` spelling accepted by earlier releases
///
/// clap would read `-conf` as `-c onf`.
fn normalize_legacy_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let rewritten = match arg.to_str() {
                Some("-conf") => Some(OsString::from("--conf")),
                Some(s) if s.starts_with("-conf=") => Some(OsString::from(format!("-{}", s))),
                _ => None,
            };
            rewritten.unwrap_or(arg)
        })
        .collect()
}

fn main() -> ExitCode {
    let args = Args::parse_from(normalize_legacy_args(env::args_os()));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(args.log_level))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AnameExitCode::ConfigError.into();
    }

    let config = match load_config(&args.conf, env::var(API_TOKEN_ENV).ok()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return AnameExitCode::ConfigError.into();
        }
    };

    info!(
        alias = %config.record.name,
        target = %config.record.target,
        zone = %config.cloudflare.zone_id,
        "Starting cfaname"
    );

    // One pass is strictly sequential; no worker threads needed
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AnameExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(run(config, args.dry_run));

    match result {
        Ok(report) => {
            log_report(&report);
            AnameExitCode::Success.into()
        }
        Err(e) => {
            error!("Reconciliation failed: {:#}", e);
            AnameExitCode::RuntimeError.into()
        }
    }
}

/// Load, override and validate the configuration file
fn load_config(path: &Path, token_override: Option<String>) -> Result<AppConfig> {
    let config = AppConfig::load(path)?.with_api_token_override(token_override);
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Run one reconciliation pass, cancelled by SIGINT/SIGTERM
async fn run(config: AppConfig, dry_run: bool) -> Result<ReconcileReport> {
    let provider = CloudflareProvider::new(config.cloudflare.api_token.clone(), dry_run)?;
    if provider.is_dry_run() {
        warn!("Running in DRY-RUN mode - no records will be changed");
    }

    let engine = AliasEngine::new(
        Box::new(SystemResolver::new()),
        Box::new(provider),
        config.cloudflare.zone_id.clone(),
        config.alias_spec(),
    )?;

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match shutdown_signal().await {
                Ok(signal) => {
                    warn!("Received {}, aborting reconciliation", signal);
                    cancel.cancel();
                }
                Err(e) => warn!("Signal handling unavailable: {}", e),
            }
        })
    };

    let result = engine.run(&cancel).await;
    watcher.abort();

    Ok(result?)
}

fn log_report(report: &ReconcileReport) {
    if report.is_noop() {
        info!(
            resolved = report.resolved.len(),
            unchanged = report.unchanged,
            "Records already in sync"
        );
        return;
    }

    info!(
        resolved = report.resolved.len(),
        created = report.created.len(),
        deleted = report.deleted.len(),
        unchanged = report.unchanged,
        "Records synchronized"
    );
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn shutdown_signal() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for Ctrl-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
