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

use thiserror::Error;

/// Failure to walk a field mapping.
///
/// Absent `properties` or `fields` are not errors: they simply end the walk
/// for the node that lacks them.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MappingError {
    /// A field definition, or its `properties`/`fields` container, is not a JSON object.
    #[error("field `{field}`: expected `{key}` to be an object, found {found}")]
    StructuralMismatch {
        field: String,
        key: String,
        found: &'static str,
    },
    /// The mapping nests `properties` deeper than the walker accepts.
    #[error(
        "field `{field}` is nested more than {max_depth} levels deep, the mapping could not be \
         fully analyzed"
    )]
    DepthLimitExceeded { field: String, max_depth: usize },
}
