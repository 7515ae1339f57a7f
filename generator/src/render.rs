use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use handlebars::{
    handlebars_helper, no_escape, Context, Handlebars, Helper, HelperResult, Output,
    RenderContext, RenderErrorReason,
};
use nvim_api::function::{call_arguments, ParameterSpec};
use nvim_api::{naming, types, GenerationContext};

use crate::error::GenerateError;

/// An external command that rewrites a file in place
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatterCommand {
    program: String,
    args: Vec<String>,
}

impl FormatterCommand {
    /// Splits a command line on whitespace, with no quoting. `None` when it is blank.
    pub fn parse(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_owned);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    fn run(&self, path: &Path) -> Result<(), GenerateError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|source| GenerateError::Formatter {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            log::warn!(
                "{} exited with {status} on {}",
                self.program,
                path.display()
            );
        }
        Ok(())
    }
}

pub struct RenderConfig {
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub formatter: Option<FormatterCommand>,
}

handlebars_helper!(to_pascal_case: |name: str| naming::to_pascal_case(name));
handlebars_helper!(to_camel_case: |name: str| naming::to_camel_case(name));
handlebars_helper!(is_list: |native_type: str| types::is_list(native_type));
handlebars_helper!(is_void: |native_type: str| types::is_void(native_type));
handlebars_helper!(remove_wrapping_list: |native_type: str| {
    types::remove_wrapping_list(native_type).to_owned()
});
handlebars_helper!(starts_with: |name: str, prefix: str| name.starts_with(prefix));

/// `{{call_args parameters}}`: call site arguments of a parameter list, comma
/// separated. Anything but a list of parameter records is a render error.
fn call_args(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let parameters = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("call_args", 0))?;
    let parameters: Vec<ParameterSpec> = serde_json::from_value(parameters.value().clone())
        .map_err(RenderErrorReason::SerdeError)?;
    out.write(&call_arguments(&parameters).join(", "))?;
    Ok(())
}

/// Renders every template of a directory against one context.
pub struct Renderer {
    config: RenderConfig,
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_helper("to_pascal_case", Box::new(to_pascal_case));
        registry.register_helper("to_camel_case", Box::new(to_camel_case));
        registry.register_helper("is_list", Box::new(is_list));
        registry.register_helper("is_void", Box::new(is_void));
        registry.register_helper("remove_wrapping_list", Box::new(remove_wrapping_list));
        registry.register_helper("starts_with", Box::new(starts_with));
        registry.register_helper("call_args", Box::new(call_args));
        Self { config, registry }
    }

    /// Template file names, sorted. Dotfiles and directories are skipped.
    pub fn template_names(&self) -> Result<Vec<String>, GenerateError> {
        let dir = &self.config.template_dir;
        let io_error = |source| GenerateError::Io {
            path: dir.clone(),
            source,
        };
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.file_type().map_err(io_error)?.is_file() {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Writes one output file per template and returns their paths.
    pub fn render_all(&mut self, context: &GenerationContext) -> Result<Vec<PathBuf>, GenerateError> {
        let output_dir = self.config.output_dir.clone();
        fs::create_dir_all(&output_dir).map_err(|source| GenerateError::Io {
            path: output_dir.clone(),
            source,
        })?;

        let mut written = Vec::new();
        for name in self.template_names()? {
            self.registry
                .register_template_file(&name, self.config.template_dir.join(&name))?;
            let rendered = self.registry.render(&name, context)?;

            let path = output_dir.join(&name);
            fs::write(&path, rendered).map_err(|source| GenerateError::Io {
                path: path.clone(),
                source,
            })?;
            if let Some(formatter) = &self.config.formatter {
                formatter.run(&path)?;
            }
            log::info!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvim_api::schema::{RawExtType, RawFunction, RawParameter};
    use nvim_api::ApiInfo;

    fn context() -> GenerationContext {
        let api = ApiInfo {
            functions: vec![
                RawFunction {
                    name: "nvim_win_set_buf".to_owned(),
                    since: 5,
                    return_type: "void".to_owned(),
                    parameters: vec![
                        RawParameter::new("Window", "window"),
                        RawParameter::new("Buffer", "buffer"),
                    ],
                },
                RawFunction {
                    name: "nvim_list_bufs".to_owned(),
                    since: 1,
                    return_type: "ArrayOf(Buffer)".to_owned(),
                    parameters: vec![],
                },
            ],
            types: vec![
                (
                    "Buffer".to_owned(),
                    RawExtType {
                        id: 0,
                        prefix: "nvim_buf_".to_owned(),
                    },
                ),
                (
                    "Window".to_owned(),
                    RawExtType {
                        id: 1,
                        prefix: "nvim_win_".to_owned(),
                    },
                ),
            ],
            ui_events: vec![],
            error_types: vec![],
            version: None,
            keys: vec![],
        };
        nvim_api::assemble(&api).unwrap().context
    }

    fn renderer(template_dir: &Path, output_dir: &Path) -> Renderer {
        Renderer::new(RenderConfig {
            template_dir: template_dir.to_owned(),
            output_dir: output_dir.to_owned(),
            formatter: None,
        })
    }

    #[test]
    fn formatter_command_parsing() {
        assert_eq!(
            FormatterCommand::parse("dart format"),
            Some(FormatterCommand {
                program: "dart".to_owned(),
                args: vec!["format".to_owned()],
            })
        );
        assert_eq!(FormatterCommand::parse("  "), None);
    }

    #[test]
    fn formatter_paths_are_not_quoted() {
        assert_eq!(
            FormatterCommand::parse("/opt/dart sdk/bin/dart format"),
            Some(FormatterCommand {
                program: "/opt/dart".to_owned(),
                args: vec!["sdk/bin/dart".to_owned(), "format".to_owned()],
            })
        );
    }

    fn render_call_args(parameters: serde_json::Value) -> Result<String, handlebars::RenderError> {
        let mut registry = Renderer::new(RenderConfig {
            template_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            formatter: None,
        })
        .registry;
        registry.register_template_string("call", "{{call_args this}}").unwrap();
        registry.render("call", &parameters)
    }

    #[test]
    fn call_args_materialize_ext_parameters() {
        let rendered = render_call_args(serde_json::json!([
            {"name": "window", "native_type": "Window", "is_ext": true},
            {"name": "count", "native_type": "int", "is_ext": false},
        ]));
        assert_eq!(rendered.unwrap(), "window.codeData, count");
    }

    #[test]
    fn call_args_rejects_malformed_parameters() {
        for parameters in [
            serde_json::json!([{"native_type": "Window", "name": "window"}]),
            serde_json::json!([{"type": "Buffer"}]),
            serde_json::json!("window"),
        ] {
            assert!(render_call_args(parameters).is_err());
        }
    }

    #[test]
    fn renders_one_file_per_template() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(
            templates.path().join("api.dart"),
            "{{#each functions}}\
             {{return_type}} {{to_camel_case name}}({{argstring}}) => [{{call_args parameters}}];\n\
             {{/each}}",
        )
        .unwrap();
        fs::write(
            templates.path().join("types.dart"),
            "{{#each ext_types}}class {{name}} {} // {{id}}\n{{/each}}",
        )
        .unwrap();
        fs::write(templates.path().join(".api.dart.swp"), "{{broken").unwrap();
        fs::create_dir(templates.path().join("partials")).unwrap();

        let mut renderer = renderer(templates.path(), &output.path().join("lib"));
        let written = renderer.render_all(&context()).unwrap();
        assert_eq!(
            written,
            [
                output.path().join("lib/api.dart"),
                output.path().join("lib/types.dart")
            ]
        );

        let api = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(
            api,
            "void nvimWinSetBuf(Buffer buffer) => [buffer.codeData];\n\
             List<Buffer> nvimListBufs() => [];\n"
        );
        let types = fs::read_to_string(&written[1]).unwrap();
        assert_eq!(types, "class Buffer {} // 0\nclass Window {} // 1\n");
    }

    #[test]
    fn list_helpers_are_available() {
        let templates = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(
            templates.path().join("lists.dart"),
            "{{#each functions}}{{#if (is_list return_type)}}{{remove_wrapping_list return_type}}{{/if}}\
             {{#if (is_void return_type)}}void{{/if}};{{/each}}",
        )
        .unwrap();
        let mut renderer = renderer(templates.path(), output.path());
        let written = renderer.render_all(&context()).unwrap();
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "void;Buffer;");
    }

    #[test]
    fn missing_template_dir_is_an_io_error() {
        let output = tempfile::tempdir().unwrap();
        let mut renderer = renderer(&output.path().join("missing"), output.path());
        assert!(matches!(
            renderer.render_all(&context()),
            Err(GenerateError::Io { .. })
        ));
    }
}
