//! Typed model of the Neovim RPC API, built from `nvim --api-info`.

pub mod context;
pub mod error;
pub mod event;
pub mod function;
pub mod naming;
pub mod schema;
pub mod types;

pub use context::{assemble, assemble_at, GenerationContext, Model};
pub use error::{SchemaError, UnsupportedType};
pub use event::{EventParameter, EventSpec};
pub use function::{FunctionOutcome, FunctionSpec, ParameterSpec, SkippedFunction};
pub use schema::ApiInfo;
pub use types::{resolve, ApiType, ExtRegistry, ExtType, NativeType, Primitive};
