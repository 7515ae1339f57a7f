use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::SchemaError;
use crate::event::EventSpec;
use crate::function::{FunctionOutcome, FunctionSpec, SkippedFunction};
use crate::schema::ApiInfo;
use crate::types::{ExtRegistry, ExtType};

/// Everything the templates get to see. Built once, never changed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationContext {
    ext_types: Vec<ExtType>,
    functions: Vec<FunctionSpec>,
    ui_events: Vec<EventSpec>,
    date: DateTime<Local>,
}

impl GenerationContext {
    pub fn ext_types(&self) -> &[ExtType] {
        &self.ext_types
    }

    /// Functions that get a generated binding
    pub fn functions(&self) -> &[FunctionSpec] {
        &self.functions
    }

    pub fn ui_events(&self) -> &[EventSpec] {
        &self.ui_events
    }

    pub fn date(&self) -> DateTime<Local> {
        self.date
    }
}

/// The context plus what was left out of it, in schema order.
#[derive(Clone, Debug)]
pub struct Model {
    pub context: GenerationContext,
    /// Functions with a type the table does not know
    pub skipped: Vec<SkippedFunction>,
    /// Functions outside the namespace or implemented by hand
    pub filtered: Vec<FunctionSpec>,
}

pub fn assemble(api: &ApiInfo) -> Result<Model, SchemaError> {
    assemble_at(api, Local::now())
}

pub fn assemble_at(api: &ApiInfo, date: DateTime<Local>) -> Result<Model, SchemaError> {
    let ext_types: Vec<_> = api
        .types
        .iter()
        .map(|(name, info)| ExtType::new(name.clone(), info.id, info.prefix.clone()))
        .collect();
    let registry = ExtRegistry::new(&ext_types);

    let mut functions = Vec::new();
    let mut skipped = Vec::new();
    let mut filtered = Vec::new();
    for raw in &api.functions {
        match FunctionSpec::build(raw, &registry)? {
            FunctionOutcome::Built(function) if function.is_valid() => functions.push(function),
            FunctionOutcome::Built(function) => filtered.push(function),
            FunctionOutcome::Skipped(function) => skipped.push(function),
        }
    }

    let ui_events = api
        .ui_events
        .iter()
        .map(|raw| EventSpec::build(raw, &registry))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "assembled {} functions ({} skipped, {} filtered), {} ui events, {} ext types",
        functions.len(),
        skipped.len(),
        filtered.len(),
        ui_events.len(),
        ext_types.len()
    );

    Ok(Model {
        context: GenerationContext {
            ext_types,
            functions,
            ui_events,
            date,
        },
        skipped,
        filtered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tests::{api_info, function, parameter};
    use rmpv::Value;

    fn with_functions(functions: Vec<Value>) -> ApiInfo {
        let Value::Map(mut entries) = api_info() else {
            unreachable!()
        };
        for (key, value) in entries.iter_mut() {
            if key.as_str() == Some("functions") {
                *value = Value::Array(functions.clone());
            }
        }
        ApiInfo::from_value(Value::Map(entries)).unwrap()
    }

    fn names(functions: &[FunctionSpec]) -> Vec<&str> {
        functions.iter().map(FunctionSpec::name).collect()
    }

    #[test]
    fn ext_types_come_from_the_type_section() {
        let model = assemble(&with_functions(vec![])).unwrap();
        let ext_types: Vec<_> = model
            .context
            .ext_types()
            .iter()
            .map(|t| (t.name(), t.id(), t.prefix()))
            .collect();
        assert_eq!(
            ext_types,
            [("Window", 1, "nvim_win_"), ("Buffer", 0, "nvim_buf_")]
        );
    }

    #[test]
    fn unsupported_functions_do_not_affect_siblings() {
        let api = with_functions(vec![
            function("nvim_command", "void", vec![parameter("String", "command")]),
            function("nvim_exec_lua", "LuaRef", vec![parameter("String", "code")]),
            function(
                "nvim_buf_get_lines",
                "ArrayOf(String)",
                vec![
                    parameter("Buffer", "buffer"),
                    parameter("Integer", "start"),
                    parameter("Integer", "end"),
                    parameter("Boolean", "strict_indexing"),
                ],
            ),
        ]);
        let model = assemble(&api).unwrap();
        assert_eq!(
            names(model.context.functions()),
            ["nvim_command", "nvim_buf_get_lines"]
        );
        let lines = &model.context.functions()[1];
        assert_eq!(lines.return_type().as_str(), "List<String>");
        assert_eq!(lines.argstring(), "int start, int end, bool strict_indexing");
        assert_eq!(model.skipped.len(), 1);
        assert_eq!(model.skipped[0].name, "nvim_exec_lua");
        assert_eq!(model.skipped[0].reason.descriptor(), "LuaRef");
    }

    #[test]
    fn invalid_functions_are_kept_aside() {
        let api = with_functions(vec![
            function("vim_get_buffers", "ArrayOf(Buffer)", vec![]),
            function("nvim_ui_attach", "void", vec![parameter("Integer", "width")]),
            function("nvim_get_mode", "Dictionary", vec![]),
        ]);
        let model = assemble(&api).unwrap();
        assert_eq!(names(model.context.functions()), ["nvim_get_mode"]);
        assert_eq!(names(&model.filtered), ["vim_get_buffers", "nvim_ui_attach"]);
    }

    #[test]
    fn event_failures_abort_assembly() {
        let Value::Map(mut entries) = api_info() else {
            unreachable!()
        };
        for (key, value) in entries.iter_mut() {
            if key.as_str() == Some("ui_events") {
                *value = Value::Array(vec![Value::Map(vec![
                    (Value::from("name"), Value::from("msg_show")),
                    (Value::from("since"), Value::from(6)),
                    (
                        Value::from("parameters"),
                        Value::Array(vec![parameter("LuaRef", "callback")]),
                    ),
                ])]);
            }
        }
        let api = ApiInfo::from_value(Value::Map(entries)).unwrap();
        assert!(matches!(
            assemble(&api),
            Err(SchemaError::UnsupportedEventType { .. })
        ));
    }

    #[test]
    fn missing_receivers_abort_assembly() {
        let api = with_functions(vec![function("nvim_buf_detach", "Boolean", vec![])]);
        assert!(matches!(
            assemble(&api),
            Err(SchemaError::MissingReceiver { .. })
        ));
    }

    #[test]
    fn assembly_is_deterministic() {
        let api = ApiInfo::from_value(api_info()).unwrap();
        let date = Local::now();
        let first = assemble_at(&api, date).unwrap();
        let second = assemble_at(&api, date).unwrap();
        assert_eq!(first.context, second.context);

        let later = assemble(&api).unwrap();
        assert_eq!(later.context.ext_types(), first.context.ext_types());
        assert_eq!(later.context.functions(), first.context.functions());
        assert_eq!(later.context.ui_events(), first.context.ui_events());
    }
}
