use clap::Parser;
use kernel_boot::utils::validation::Validate;
use kernel_boot::{build_delegate, CliConfig, LaunchConfig, LaunchError, Launcher, LogContext, Runnable};

fn main() {
    let cli = CliConfig::parse();

    // 日誌設定完成前不寫日誌，啟動錯誤直接輸出到 stderr
    let (config, log, delegate) = match bootstrap(&cli) {
        Ok(parts) => parts,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    };

    Launcher::new_with_monitoring(delegate, log, config.monitoring_enabled()).run();
}

fn bootstrap(cli: &CliConfig) -> Result<(LaunchConfig, LogContext, Box<dyn Runnable>), LaunchError> {
    let config = cli.resolve()?;
    config.validate()?;
    let log = LogContext::new(&config.logging)?;
    let delegate = build_delegate(&config.delegate)?;
    Ok((config, log, delegate))
}
