// Copyright 2021-Present Datadog, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde_json::Value as JsonValue;

use crate::MappingError;

/// Insertion-ordered JSON object, the storage of every mapping node.
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Key holding the ordinary sub-fields of an object field.
pub const PROPERTIES_KEY: &str = "properties";

/// Key holding the multi-fields of a field.
pub const FIELDS_KEY: &str = "fields";

/// Key holding the declared type of a field.
pub const TYPE_KEY: &str = "type";

/// Read-only view over one field definition (or a mapping root).
///
/// JSON `null` values are treated as if the key was absent.
#[derive(Clone, Copy, Debug)]
pub struct MappingNode<'a> {
    definition: &'a JsonObject,
}

impl<'a> MappingNode<'a> {
    pub fn new(definition: &'a JsonObject) -> Self {
        MappingNode { definition }
    }

    pub fn as_object(&self) -> &'a JsonObject {
        self.definition
    }

    pub fn get(&self, key: &str) -> Option<&'a JsonValue> {
        self.definition.get(key).filter(|value| !value.is_null())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the declared `type`, whatever its JSON kind.
    pub fn raw_field_type(&self) -> Option<&'a JsonValue> {
        self.get(TYPE_KEY)
    }

    /// Returns the declared `type` if it is a string.
    pub fn field_type(&self) -> Option<&'a str> {
        self.raw_field_type().and_then(JsonValue::as_str)
    }

    pub fn has_properties(&self) -> bool {
        self.contains_key(PROPERTIES_KEY)
    }

    pub fn has_multi_fields(&self) -> bool {
        self.contains_key(FIELDS_KEY)
    }

    /// Iterates over the multi-field definitions that are JSON objects, in declaration order.
    pub fn multi_field_nodes(&self) -> impl Iterator<Item = (&'a str, MappingNode<'a>)> + 'a {
        self.get(FIELDS_KEY)
            .and_then(JsonValue::as_object)
            .into_iter()
            .flat_map(|multi_fields| multi_fields.iter())
            .filter_map(|(name, value)| {
                value
                    .as_object()
                    .map(|definition| (name.as_str(), MappingNode::new(definition)))
            })
    }
}

/// A named field definition: the key of a `properties` or `fields` entry and its value.
#[derive(Clone, Copy, Debug)]
pub struct FieldEntry<'a> {
    pub name: &'a str,
    pub node: MappingNode<'a>,
}

impl<'a> FieldEntry<'a> {
    pub fn new(name: &'a str, node: MappingNode<'a>) -> Self {
        FieldEntry { name, node }
    }

    /// Builds the entry for the child `name` found under the `container_key` of this entry.
    pub(crate) fn child(
        &self,
        container_key: &str,
        name: &'a str,
        value: &'a JsonValue,
    ) -> Result<FieldEntry<'a>, MappingError> {
        match value {
            JsonValue::Object(definition) => Ok(FieldEntry::new(name, MappingNode::new(definition))),
            other => Err(MappingError::StructuralMismatch {
                field: self.name.to_string(),
                key: format!("{container_key}.{name}"),
                found: json_kind(other),
            }),
        }
    }

    /// Returns the `properties` of this field, `None` if it declares none.
    pub fn properties(&self) -> Result<Option<&'a JsonObject>, MappingError> {
        self.object_under(PROPERTIES_KEY)
    }

    /// Returns the multi-fields of this field, `None` if it declares none.
    pub fn multi_fields(&self) -> Result<Option<&'a JsonObject>, MappingError> {
        self.object_under(FIELDS_KEY)
    }

    fn object_under(&self, key: &str) -> Result<Option<&'a JsonObject>, MappingError> {
        match self.node.get(key) {
            None => Ok(None),
            Some(JsonValue::Object(object)) => Ok(Some(object)),
            Some(other) => Err(MappingError::StructuralMismatch {
                field: self.name.to_string(),
                key: key.to_string(),
                found: json_kind(other),
            }),
        }
    }
}

pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
