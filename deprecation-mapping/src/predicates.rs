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

//! Field-level conditions shared by the mapping-based checks.

use serde_json::Value as JsonValue;

use crate::date_patterns::is_deprecated_pattern;
use crate::mapping_node::{json_kind, FIELDS_KEY};
use crate::{JsonObject, MappingError, MappingNode};

/// Type name of geo shape fields.
pub const GEO_SHAPE_TYPE: &str = "geo_shape";

/// Parameters of the legacy prefix-tree `geo_shape` implementation.
pub const DEPRECATED_GEO_SHAPE_PARAMETERS: &[&str] = &[
    "strategy",
    "tree",
    "tree_levels",
    "precision",
    "distance_error_pct",
    "points_only",
];

/// Name of the metadata field controlling `_field_names`.
pub const FIELD_NAMES_FIELD_NAME: &str = "_field_names";

pub fn is_date_field_with_deprecated_pattern(node: &MappingNode) -> bool {
    node.field_type() == Some("date")
        && node
            .get("format")
            .and_then(JsonValue::as_str)
            .is_some_and(is_deprecated_pattern)
}

/// Returns true if one of the field's multi-fields declares multi-fields of its own.
pub fn contains_chained_multi_fields(node: &MappingNode) -> bool {
    node.multi_field_nodes()
        .any(|(_, multi_field)| multi_field.contains_key(FIELDS_KEY))
}

pub fn is_geo_shape_field_with_deprecated_param(node: &MappingNode) -> bool {
    node.field_type() == Some(GEO_SHAPE_TYPE)
        && DEPRECATED_GEO_SHAPE_PARAMETERS
            .iter()
            .any(|parameter| node.contains_key(parameter))
}

/// Returns true if the mapping root explicitly sets `_field_names.enabled`.
pub fn contains_field_names_disabled(root: &JsonObject) -> Result<bool, MappingError> {
    match root.get(FIELD_NAMES_FIELD_NAME) {
        None | Some(JsonValue::Null) => Ok(false),
        Some(JsonValue::Object(field_names)) => Ok(field_names.contains_key("enabled")),
        Some(other) => Err(MappingError::StructuralMismatch {
            field: "_root".to_string(),
            key: FIELD_NAMES_FIELD_NAME.to_string(),
            found: json_kind(other),
        }),
    }
}
