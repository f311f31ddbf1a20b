#[cfg(not(feature = "cli"))]
compile_error!("The `drill` binary requires the `cli` feature. Build with `--features cli`.");

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process;

use driller::cli;
use driller::cli::app::{Cli, ColorMode, Commands};
use driller::table::region::LoadStrategy;
use driller::DrillError;

/// Set up `env_logger`.
///
/// `-q` limits logging to errors; otherwise repeated `-v` raises the level
/// from the default `warn` to `info`, `debug`, and `trace`. Without either
/// flag, `RUST_LOG` decides when it is set.
fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = env_logger::Builder::new();
    builder.parse_default_env();
    if quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if verbose > 0 || std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {} // colored auto-detects tty
    }

    let writer_result: Result<Box<dyn Write>, DrillError> = match &cli.output {
        Some(path) => File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| DrillError::Io(format!("Cannot create {}: {}", path, e))),
        None => Ok(Box::new(std::io::stdout()) as Box<dyn Write>),
    };

    let mut writer = match writer_result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let load: LoadStrategy = cli.load.into();

    let result = match cli.command {
        Commands::Tables { schema, json } => {
            cli::tables::execute(&cli::tables::TablesOptions { schema, json }, &mut writer)
        }

        Commands::Columns {
            schema,
            table,
            json,
        } => cli::columns::execute(
            &cli::columns::ColumnsOptions {
                schema,
                table,
                json,
            },
            &mut writer,
        ),

        Commands::Extract {
            schema,
            table,
            all,
            limit,
            format,
        } => cli::extract::execute(
            &cli::extract::ExtractOptions {
                schema,
                table,
                all,
                limit,
                format,
                data_dir: cli.data_dir,
                load,
            },
            &mut writer,
        ),

        Commands::Rows {
            schema,
            table,
            limit,
            dump,
            json,
        } => cli::rows::execute(
            &cli::rows::RowsOptions {
                schema,
                table,
                limit,
                dump,
                json,
                data_dir: cli.data_dir,
                load,
            },
            &mut writer,
        ),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "drill", &mut writer);
            Ok(())
        }
    };

    if let Err(e) = result.and_then(|_| writer.flush().map_err(|e| DrillError::Io(e.to_string()))) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
