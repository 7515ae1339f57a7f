use serde::Serialize;

use crate::error::SchemaError;
use crate::schema::RawEvent;
use crate::types::{resolve, ExtRegistry, NativeType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventParameter {
    native_type: NativeType,
    name: String,
}

impl EventParameter {
    pub fn native_type(&self) -> &NativeType {
        &self.native_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A UI event the host sends to attached clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventSpec {
    name: String,
    since: u64,
    parameters: Vec<EventParameter>,
}

impl EventSpec {
    /// Events are not filtered: a type the table does not know fails the whole run.
    pub fn build(raw: &RawEvent, registry: &ExtRegistry) -> Result<Self, SchemaError> {
        let parameters = raw
            .parameters
            .iter()
            .map(|p| {
                resolve(&p.type_name, registry)
                    .map(|native_type| EventParameter {
                        native_type,
                        name: p.name.clone(),
                    })
                    .map_err(|source| SchemaError::UnsupportedEventType {
                        event: raw.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: raw.name.clone(),
            since: raw.since,
            parameters,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn since(&self) -> u64 {
        self.since
    }

    pub fn parameters(&self) -> &[EventParameter] {
        &self.parameters
    }
}
