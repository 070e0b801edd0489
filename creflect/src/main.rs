mod cli;

use clap::Parser;
use cli::Cli;
use creflect_core::{
    Generator,
    config::CreflectConfig,
    error::{CreflectError, Result},
};
use std::{fs, io, path::PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v/-q. Logs go to stderr; stdout carries the generated code.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{}", e);
            Err(e)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = CreflectConfig::load(cli.config.as_deref())?;
    if let Some(annotation) = &cli.annotation {
        config.scan.annotation = annotation.clone();
    }
    if let Some(format) = cli.format {
        config.emit.format = format.into();
    }
    config.validate()?;

    let output = cli
        .output
        .clone()
        .or_else(|| config.emit.output.as_ref().map(PathBuf::from));

    info!("Scanning {:?} for {} annotations", cli.input, config.scan.annotation);
    let source = fs::read_to_string(&cli.input)
        .map_err(|e| CreflectError::read_input(&cli.input, e))?;
    debug!("Read {} bytes", source.len());

    let generator = Generator::new(config);
    match output {
        Some(path) => {
            // Nothing is written to a file unless the whole pass succeeds.
            let generated = generator.generate(&source)?;
            fs::write(&path, generated)?;
            info!("Generated output written to {:?}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            let summary = generator.write_to(&source, &mut stdout)?;
            debug!(?summary, "Generated output written to stdout");
        }
    }

    Ok(())
}
