//! Voice Notes CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_notes::cli::{
    app::{init_tracing, load_merged_config, run},
    args::Cli,
    presenter::Presenter,
};
use voice_notes::domain::config::AppConfig;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let cli_config = AppConfig {
        data_dir: cli.data_dir.clone(),
        log_level: None,
    };
    let config = load_merged_config(cli_config).await;
    init_tracing(&config, cli.verbose);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Presenter::new().error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}
