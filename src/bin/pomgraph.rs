use clap::Parser;
use colored::Colorize;
use pomgraph_core::cli::{self, Cli};
use pomgraph_core::config::Config;
use pomgraph_core::exit::PomGraphExit;
use pomgraph_core::logging;

fn main() -> PomGraphExit {
    let cli = Cli::parse();
    let loaded = Config::load();
    let verbose = cli.verbose || loaded.as_ref().is_ok_and(|c| c.verbose);
    logging::init(verbose);
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("ignoring configuration: {e:#}");
        Config::new()
    });
    config.verbose = verbose;

    let result = if let Some(cmd) = cli.command {
        cli::dispatch::execute(cmd, config)
    } else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        Ok(PomGraphExit::Success)
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            PomGraphExit::from_error(&e)
        }
    }
}
