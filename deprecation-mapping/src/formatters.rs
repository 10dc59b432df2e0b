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

use itertools::Itertools;
use serde_json::Value as JsonValue;

use crate::date_patterns::format_suggestion;
use crate::predicates::DEPRECATED_GEO_SHAPE_PARAMETERS;
use crate::FieldEntry;

/// `type: <doc type>, field: <name>`
pub fn format_field(doc_type: &str, entry: &FieldEntry) -> String {
    format!("type: {doc_type}, field: {}", entry.name)
}

/// Same as [`format_field`], followed by the field's date format and how to rewrite it.
pub fn format_date_field(doc_type: &str, entry: &FieldEntry) -> String {
    let (format, suggestion) = match entry.node.get("format") {
        Some(JsonValue::String(format)) => (format.clone(), format_suggestion(format)),
        Some(other) => (other.to_string(), String::new()),
        None => ("null".to_string(), String::new()),
    };
    format!(
        "type: {doc_type}, field: {}, format: {format}, suggestion: {suggestion}",
        entry.name
    )
}

/// Lists the deprecated `geo_shape` parameters set on the field, separated by `; `.
pub fn format_deprecated_geo_shape_params(_doc_type: &str, entry: &FieldEntry) -> String {
    DEPRECATED_GEO_SHAPE_PARAMETERS
        .iter()
        .filter(|parameter| entry.node.contains_key(parameter))
        .map(|parameter| format!("parameter [{parameter}] in field [{}]", entry.name))
        .join("; ")
}
