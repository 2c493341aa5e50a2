use clap::{CommandFactory, Parser};

use finview::cli::{self, Cli, Commands};
use finview::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, matches!(cli.command, Commands::Browse { .. }));

    let result = match cli.command {
        Commands::Init { data_dir, rows } => cli::init::run(data_dir, rows),
        Commands::List { view, args } => cli::list::run(view, &args),
        Commands::Browse { view, args } => cli::browse::run(view, &args),
        Commands::Export { view, output, args } => cli::export::run(view, &output, &args),
        Commands::Summary { file } => cli::summary::run(file.as_deref()),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "finview", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
