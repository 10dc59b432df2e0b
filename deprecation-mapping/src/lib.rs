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

//! Walks the field mappings of an index to find constructs that will not survive the next
//! major version, and counts fields the way the query-time field expansion limit does.
//!
//! Every operation reads an immutable JSON snapshot of the mapping and allocates only local
//! state, so it can be called concurrently on any number of mappings.

pub mod date_patterns;
mod error;
mod field_visitor;
mod formatters;
mod mapping_node;
pub mod predicates;

pub use error::MappingError;
pub use field_visitor::{
    count_fields, find_in_properties, FieldVisit, FieldVisitor, FieldWalker,
    DEFAULT_MAX_MAPPING_DEPTH, TYPES_THAT_DONT_COUNT,
};
pub use formatters::{format_date_field, format_deprecated_geo_shape_params, format_field};
pub use mapping_node::{FieldEntry, JsonObject, MappingNode, FIELDS_KEY, PROPERTIES_KEY, TYPE_KEY};
