use clap::Parser;
use q47_verify::core::ConfigProvider;
use q47_verify::utils::error::ErrorSeverity;
use q47_verify::utils::{logger, validation::Validate};
use q47_verify::{run_verification, CliConfig, LocalStorage, RunOutcome, TomlConfig, VerifyError};

fn run(cli: &CliConfig) -> Result<RunOutcome, VerifyError> {
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            let mut config = TomlConfig::from_file(path)?;
            if cli.task.is_some() {
                config.run.task = cli.task;
            }
            config.output.archive |= cli.archive;
            config.validate()?;
            if let Some(name) = &config.run.name {
                tracing::info!("Run: {}", name);
            }

            let monitor_enabled = cli.monitor || config.monitoring_enabled();
            let storage = LocalStorage::new(config.output_path());
            tracing::info!("Writing output to {}", storage.base_path().display());
            run_verification(&config, &storage, monitor_enabled)
        }
        None => {
            cli.validate()?;
            let storage = LocalStorage::new(cli.output_path());
            tracing::info!("Writing output to {}", storage.base_path().display());
            run_verification(cli, &storage, cli.monitor)
        }
    }
}

fn exit_code(e: &VerifyError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting q47-verify");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }
    if cli.monitor {
        tracing::info!("System monitoring enabled");
    }

    let result = run(&cli).and_then(|outcome| {
        println!("Summary written to: {}", outcome.summary_path);
        if let Some(archive_path) = &outcome.archive_path {
            println!("Archive written to: {}", archive_path);
        }

        if outcome.manifest.all_passed() {
            tracing::info!("All verifications passed");
            println!("All verifications passed");
            Ok(())
        } else {
            let failed: Vec<&str> = outcome
                .manifest
                .tasks
                .iter()
                .filter(|t| !t.passed())
                .map(|t| t.task.as_str())
                .collect();
            Err(VerifyError::VerificationFailed {
                check: failed.join(", "),
                failures: outcome.manifest.failures(),
            })
        }
    });

    if let Err(e) = result {
        tracing::error!(
            "Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());

        let code = exit_code(&e);
        if code > 0 {
            std::process::exit(code);
        }
    }
}
