use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");
pub const DEFAULT_FORMATTER: &str = "dart format";

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    #[clap(value_parser, help = "The nvim binary to read the API info from")]
    pub nvim: PathBuf,

    #[clap(
        value_parser,
        help = "Where to write the bindings; without it the API info is printed instead"
    )]
    pub output: Option<PathBuf>,

    #[clap(value_parser, default_value = DEFAULT_TEMPLATE_DIR, help = "The template directory")]
    pub templates: PathBuf,

    #[clap(
        long,
        default_value = DEFAULT_FORMATTER,
        help = "Command run on every written file, with its path appended. It is split on \
                whitespace, so neither the program nor its arguments may contain spaces"
    )]
    pub formatter: String,

    #[clap(long, help = "Do not run the formatter")]
    pub no_format: bool,
}
