use clap::Parser;
use insite::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{calibrate, locate},
    utils::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    let subcommand_name = match cli.command {
        Command::Locate(_) => "locate",
        Command::Calibrate(_) => "calibrate",
    };

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        *FULL_VERSION,
        subcommand_name
    );
    match cli.command {
        Command::Locate(args) => {
            let summary = locate::locate(args)?;
            eprintln!(
                "Mapped hits in {} reads. Wrote {} reads in {:.2} minutes.",
                summary.below_cutoff,
                summary.written,
                summary.elapsed.as_secs_f64() / 60.0
            );
        }
        Command::Calibrate(args) => {
            calibrate::calibrate(args)?;
        }
    }
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}
