use clap::Parser;
use miette::Result;
use tilebake::cli::{Cli, Commands};
use tilebake::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new(cli.verbose);

    match cli.command {
        Commands::Build(args) => tilebake::cli::build::run(args, &printer)?,
        Commands::Validate(args) => tilebake::cli::validate::run(args, &printer)?,
        Commands::List(args) => tilebake::cli::list::run(args, &printer)?,
        Commands::Usage(args) => tilebake::cli::usage::run(args, &printer)?,
        Commands::Init(args) => tilebake::cli::init::run(args, &printer)?,
        Commands::Completions(args) => tilebake::cli::completions::run(args)?,
    }

    Ok(())
}
