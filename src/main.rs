use clap::error::ErrorKind;
use clap::Parser;
use pref_origin::utils::error::USAGE_EXIT_CODE;
use pref_origin::utils::{logger, validation::Validate};
use pref_origin::{format_report, ActiveBackend, CliConfig, Inspector, OutputMode, PrefError, Settings};
use std::path::{Path, PathBuf};

fn main() {
    let config = match CliConfig::try_parse() {
        Ok(config) => config,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // 參數錯誤時不查詢任何設定
            let _ = e.print();
            std::process::exit(USAGE_EXIT_CODE);
        }
    };

    if let Err(e) = config.validate() {
        let usage = PrefError::UsageError {
            message: e.to_string(),
        };
        eprintln!("❌ {}", usage.user_friendly_message());
        eprintln!("Usage: pref-origin <DOMAIN> <KEY> [MODE]");
        std::process::exit(usage.exit_code());
    }

    let config_path = Settings::resolve_path(config.config.as_deref());
    let settings = match load_settings(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };

    // 初始化日誌
    logger::init_cli_logger(config.verbose, settings.log_format());
    match &config_path {
        Some(path) => tracing::debug!(path = %path.display(), "loaded config"),
        None => tracing::debug!("no config file, using built-in settings"),
    }
    tracing::debug!("CLI config: {:?}", config);

    match run(&config, &settings) {
        Ok(report) => println!("{}", report),
        Err(e) => {
            tracing::error!("inspection failed: {}", e);
            fail(&e)
        }
    }
}

fn load_settings(path: Option<&Path>) -> pref_origin::Result<Settings> {
    let settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

fn run(config: &CliConfig, settings: &Settings) -> pref_origin::Result<String> {
    let snapshot = config.snapshot.as_deref().or(settings.snapshot.as_deref());
    let store = ActiveBackend::select(snapshot)?.open()?;

    let home = dirs::home_dir().unwrap_or_else(|| {
        tracing::warn!("home directory unknown, reporting paths relative to ~");
        PathBuf::from("~")
    });

    let inspector = Inspector::new(store, settings.defaults_table()?, home, settings.host_id());
    let result = inspector.inspect(&config.domain, &config.key)?;

    format_report(&result, OutputMode::from_args(config.mode.as_deref(), config.json))
}

fn fail(e: &PrefError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code())
}
