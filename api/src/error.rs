use thiserror::Error;

/// A type descriptor that matches no primitive, no registered ext type and
/// no `ArrayOf(..)` form.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unsupported type {0:?}")]
pub struct UnsupportedType(pub String);

impl UnsupportedType {
    pub fn descriptor(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("the API info is not valid MessagePack")]
    Decode(#[from] rmpv::decode::Error),
    #[error("the API info is not a map")]
    NotAMap,
    #[error("the API info has no {0:?} entry")]
    MissingKey(&'static str),
    #[error("the API info contains a string that is not valid UTF-8")]
    InvalidUtf8,
    #[error("malformed {kind} entry in the API info")]
    Entry {
        kind: &'static str,
        #[source]
        source: rmpv::ext::Error,
    },
    #[error("event {event} uses a type the type table does not know")]
    UnsupportedEventType {
        event: String,
        #[source]
        source: UnsupportedType,
    },
    #[error("function {function}() is bound to an ext type but has no receiver parameter")]
    MissingReceiver { function: String },
}
