use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use nvim_api::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} --api-info exited with {status}")]
    HostFailed { program: String, status: ExitStatus },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("could not fetch the API info")]
    Fetch(#[from] FetchError),
    #[error("the API info is malformed")]
    Schema(#[from] SchemaError),
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to load a template")]
    Template(#[from] handlebars::TemplateError),
    #[error("failed to render a template")]
    Render(#[from] handlebars::RenderError),
    #[error("failed to run the formatter {program}")]
    Formatter {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// The error and all of its sources, outermost first
pub fn report(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
