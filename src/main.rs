use std::process::ExitCode;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use releasewarden::exclude::{ExclusionPolicy, GlobExclusionPolicy};
use releasewarden::scanner::{ScanOutcome, Scanner};
use releasewarden::{config, rules};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .init();
    // Keep the guard alive so the non-blocking writer flushes on exit
    let _log_guard = stdout_guard;

    // Load configuration (embedded defaults -> releasewarden.toml -> env/.env)
    let app_cfg = config::load()?;

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: releasewarden <path> [path ...]");
    }

    let policy: Arc<dyn ExclusionPolicy> =
        Arc::new(GlobExclusionPolicy::new(&app_cfg.exclusion.patterns)?);
    let validators = rules::from_config(&app_cfg.rules);
    let scanner = Scanner::new(validators, policy, app_cfg.scan_options());

    if paths.len() == 1 {
        info!("Scanning the path {}...", paths[0]);
    } else {
        info!("Scanning {} paths...", paths.len());
    }

    let result = scanner.scan_paths(&paths).await?;
    info!("Scan completed: {}", result.stats.summary());

    match result.outcome() {
        ScanOutcome::Accepted => {
            info!("Scan completed, no problems were found");
            Ok(ExitCode::SUCCESS)
        }
        ScanOutcome::Rejected { id, message } => {
            warn!(
                "Scan completed and the following problems were found: {}",
                result.errors.format()
            );
            warn!(code = %id, "bundle rejected: {}", message);
            // Returning the code (rather than exiting) lets the
            // non-blocking log writer flush the diagnostics above.
            Ok(ExitCode::FAILURE)
        }
    }
}
