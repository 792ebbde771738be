//! kenbot-action binary
//!
//! Runs once per workflow step. Failures are reported to the runner as an
//! `::error::` workflow command and exit code 1.

use clap::Parser;
use kenbot_action::cli::{self, Cli, EXIT_FAILURE, EXIT_OK};
use kenbot_action::tracing::init_tracing;
use kenbot_action_github::commands;

fn main() {
    // Tracing may not be usable during a panic.
    #[allow(clippy::print_stderr)]
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("kenbot-action panicked: {panic_info}");
        eprintln!("Run with RUST_LOG=debug for more information.");
    }));

    let cli = Cli::parse();

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            commands::error(&format!("Failed to create tokio runtime: {e}"));
            std::process::exit(EXIT_FAILURE);
        }
    };

    std::process::exit(rt.block_on(run(&cli)));
}

async fn run(cli: &Cli) -> i32 {
    if let Err(e) = init_tracing(cli.tracing_config(cli::runner_debug_enabled())) {
        commands::debug(&e.to_string());
    }

    commands::start_group("Kenbot");
    let code = match kenbot_action::run(cli).await {
        Ok(()) => EXIT_OK,
        Err(report) => {
            commands::error(&report.to_string());
            EXIT_FAILURE
        }
    };
    commands::end_group();
    code
}
