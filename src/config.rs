use serde::Deserialize;

use crate::types::ScanOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    pub concurrency: Option<usize>,
    pub policy_timeout_ms: u64,
    pub check_excluded: bool,
    pub skip_queue_check: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExclusionConfig {
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    pub forbidden_extensions: Vec<String>,
    pub flag_empty_files: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub scanner: ScannerConfig,
    pub exclusion: ExclusionConfig,
    pub rules: RulesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

impl AppConfig {
    /// Scanner options derived from the loaded configuration.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            concurrency: self.scanner.concurrency,
            policy_timeout_ms: self.scanner.policy_timeout_ms,
            check_excluded: self.scanner.check_excluded,
            skip_queue_check: self.scanner.skip_queue_check,
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: releasewarden.toml (in CWD)
        .add_source(::config::File::with_name("releasewarden").required(false));

    if let Ok(custom_path) = std::env::var("RELEASEWARDEN_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("RELEASEWARDEN").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if let Some(c) = cfg.scanner.concurrency {
        if c == 0 || c > 256 {
            return Err(anyhow::anyhow!("scanner.concurrency must be in 1..=256"));
        }
    }
    if cfg.scanner.policy_timeout_ms == 0 {
        return Err(anyhow::anyhow!("scanner.policy_timeout_ms must be > 0"));
    }
    for pattern in &cfg.exclusion.patterns {
        if pattern.trim().is_empty() {
            return Err(anyhow::anyhow!("exclusion.patterns must not contain empty entries"));
        }
    }
    Ok(())
}
