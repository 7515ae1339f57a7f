use std::io::{self, Write};

use nvim_api::function::API_NAMESPACE_PREFIX;
use nvim_api::ApiInfo;

/// Prints the API info in a human readable form, section by section in wire
/// order. Keys it has no section for are listed last.
pub fn write_api(out: &mut dyn Write, api: &ApiInfo) -> io::Result<()> {
    writeln!(out, "Neovim api info:")?;
    writeln!(out, "Keys: {}", api.keys.join(", "))?;
    for key in &api.keys {
        match key.as_str() {
            "functions" => {
                writeln!(out, "Functions")?;
                for function in api
                    .functions
                    .iter()
                    .filter(|f| f.name.starts_with(API_NAMESPACE_PREFIX))
                {
                    let parameters = function
                        .parameters
                        .iter()
                        .map(|p| format!("{} {}", p.type_name, p.name))
                        .collect::<Vec<_>>()
                        .join(", ");
                    writeln!(
                        out,
                        "\t{} {}({}) since {}",
                        function.return_type, function.name, parameters, function.since
                    )?;
                }
            }
            "types" => {
                writeln!(out, "Data Types")?;
                for (name, info) in &api.types {
                    writeln!(out, "\t{name} (id {}, prefix {})", info.id, info.prefix)?;
                }
            }
            "ui_events" => {
                writeln!(out, "UI Events")?;
                for event in &api.ui_events {
                    writeln!(out, "\t{} since {}", event.name, event.since)?;
                }
            }
            "error_types" => {
                writeln!(out, "Error Types")?;
                for (name, info) in &api.error_types {
                    writeln!(out, "\t{name}:{}", info.id)?;
                }
            }
            "version" => {
                writeln!(out, "Version")?;
                if let Some(version) = &api.version {
                    writeln!(out, "{version}")?;
                }
            }
            _ => continue,
        }
        writeln!(out)?;
    }
    for key in api.unknown_keys() {
        writeln!(out, "Unknown API info attribute: {key}")?;
    }
    Ok(())
}
