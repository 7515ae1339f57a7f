mod cli;
mod dump;
mod error;
mod host;
mod render;

use std::io::{self, Write};
use std::path::Path;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use env_logger::Env;

use error::GenerateError;
use host::{HostProcess, SchemaSource};
use render::{FormatterCommand, RenderConfig, Renderer};

fn generate(source: &dyn SchemaSource, cli: &cli::Cli, output: &Path) -> Result<(), GenerateError> {
    let api = source.fetch()?;
    log::info!("Writing auto generated bindings to {}", output.display());

    let model = nvim_api::assemble(&api)?;
    for skipped in &model.skipped {
        log::warn!(
            "Found unsupported type({}) when adding function {}(), skipping",
            skipped.reason.descriptor(),
            skipped.name
        );
    }
    for function in &model.filtered {
        log::debug!("{}() is not generated", function.name());
    }

    let formatter = if cli.no_format {
        None
    } else {
        FormatterCommand::parse(&cli.formatter)
    };
    let mut renderer = Renderer::new(RenderConfig {
        template_dir: cli.templates.clone(),
        output_dir: output.to_owned(),
        formatter,
    });
    renderer.render_all(&model.context)?;
    Ok(())
}

/// Without an output directory the API info is dumped to `out` instead.
fn run(source: &dyn SchemaSource, cli: &cli::Cli, out: &mut dyn Write) -> Result<(), GenerateError> {
    match &cli.output {
        Some(output) => generate(source, cli, output),
        None => {
            let api = source.fetch()?;
            dump::write_api(out, &api).map_err(|err| GenerateError::Io {
                path: "<stdout>".into(),
                source: err,
            })
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            process::exit(-1);
        }
    };

    let source = HostProcess::new(&cli.nvim);
    if let Err(err) = run(&source, &cli, &mut io::stdout().lock()) {
        log::error!("{}", error::report(&err));
        process::exit(-1);
    }
}
