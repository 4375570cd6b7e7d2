use clap::Parser;

use materials_cli::{commands, output, Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate(args) => commands::simulate::execute(&args),
        Commands::Version => {
            output::print_info(&format!("materials-cli {}", materials_cli::VERSION));
            Ok(())
        }
    };

    if let Err(err) = result {
        output::print_error(&err.to_string());
        std::process::exit(1);
    }
}
