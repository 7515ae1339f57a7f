use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, UnsupportedType};
use crate::schema::{RawFunction, RawParameter};
use crate::types::{ApiType, ExtRegistry, NativeType};

/// Functions outside this namespace are never generated.
pub const API_NAMESPACE_PREFIX: &str = "nvim";

/// Functions the client library implements by hand.
pub const HAND_WRITTEN_FUNCTIONS: &[&str] = &["nvim_ui_attach"];

/// Accessor of the wire representation of an ext type handle.
pub const EXT_ACCESSOR: &str = "codeData";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    name: String,
    native_type: NativeType,
    is_ext: bool,
}

impl ParameterSpec {
    fn resolve(raw: &RawParameter, registry: &ExtRegistry) -> Result<Self, UnsupportedType> {
        let parsed = ApiType::parse(&raw.type_name, registry)?;
        Ok(Self {
            name: raw.name.clone(),
            native_type: parsed.native(),
            is_ext: parsed.is_ext(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn native_type(&self) -> &NativeType {
        &self.native_type
    }

    pub fn is_ext(&self) -> bool {
        self.is_ext
    }

    /// How this parameter is referenced at a call site. The encoder cannot
    /// serialize handle types, so ext typed arguments are passed by their wire
    /// representation.
    pub fn call_argument(&self) -> String {
        if self.is_ext {
            format!("{}.{EXT_ACCESSOR}", self.name)
        } else {
            self.name.clone()
        }
    }
}

pub fn call_arguments(parameters: &[ParameterSpec]) -> Vec<String> {
    parameters.iter().map(ParameterSpec::call_argument).collect()
}

/// Whether a function with this name gets a generated binding
pub fn is_generated(name: &str) -> bool {
    name.starts_with(API_NAMESPACE_PREFIX) && !HAND_WRITTEN_FUNCTIONS.contains(&name)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionSpec {
    name: String,
    since: u64,
    return_type: NativeType,
    parameters: Vec<ParameterSpec>,
    valid: bool,
    ext: bool,
    argstring: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFunction {
    pub name: String,
    pub reason: UnsupportedType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FunctionOutcome {
    Built(FunctionSpec),
    Skipped(SkippedFunction),
}

impl FunctionSpec {
    /// Builds the model of one API function.
    ///
    /// An unsupported type only skips this function. A method of an ext type
    /// without its receiver parameter is a malformed schema.
    pub fn build(raw: &RawFunction, registry: &ExtRegistry) -> Result<FunctionOutcome, SchemaError> {
        let ext = registry.binds(&raw.name);
        let raw_parameters = if ext {
            match raw.parameters.split_first() {
                Some((_receiver, rest)) => rest,
                None => {
                    return Err(SchemaError::MissingReceiver {
                        function: raw.name.clone(),
                    })
                }
            }
        } else {
            &raw.parameters[..]
        };

        let resolved = ApiType::parse(&raw.return_type, registry).and_then(|return_type| {
            let parameters = raw_parameters
                .iter()
                .map(|p| ParameterSpec::resolve(p, registry))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((return_type.native(), parameters))
        });
        let (return_type, parameters) = match resolved {
            Ok(resolved) => resolved,
            Err(reason) => {
                return Ok(FunctionOutcome::Skipped(SkippedFunction {
                    name: raw.name.clone(),
                    reason,
                }))
            }
        };

        let argstring = parameters
            .iter()
            .map(|p| format!("{} {}", p.native_type, p.name))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(FunctionOutcome::Built(Self {
            name: raw.name.clone(),
            since: raw.since,
            return_type,
            parameters,
            valid: is_generated(&raw.name),
            ext,
            argstring,
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn since(&self) -> u64 {
        self.since
    }

    pub fn return_type(&self) -> &NativeType {
        &self.return_type
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether this is a method of an ext type
    pub fn is_ext(&self) -> bool {
        self.ext
    }

    /// `<type> <name>` for every parameter, comma separated
    pub fn argstring(&self) -> &str {
        &self.argstring
    }
}
