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

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::mapping_node::{FIELDS_KEY, PROPERTIES_KEY, TYPE_KEY};
use crate::{FieldEntry, JsonObject, MappingError, MappingNode};

/// Maximum number of nested `properties` levels walked by default.
pub const DEFAULT_MAX_MAPPING_DEPTH: usize = 10_000;

/// Field types that never count toward the field expansion limit.
pub static TYPES_THAT_DONT_COUNT: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from_iter(["binary", "geo_point", "geo_shape"]));

/// A field reached while walking a mapping.
#[derive(Clone, Copy, Debug)]
pub enum FieldVisit<'a> {
    /// An entry of some `properties` object.
    Field(FieldEntry<'a>),
    /// An entry of the `fields` object of `parent`.
    MultiField {
        parent: FieldEntry<'a>,
        multi_field: FieldEntry<'a>,
    },
}

enum Pending<'a> {
    Properties {
        owner: FieldEntry<'a>,
        depth: usize,
    },
    Field {
        entry: FieldEntry<'a>,
        depth: usize,
    },
    MultiField {
        parent: FieldEntry<'a>,
        multi_field: FieldEntry<'a>,
        depth: usize,
    },
}

/// Depth-first iterator over the fields of a mapping.
///
/// For every entry of a `properties` object, in declaration order, it yields the entry,
/// then each of its multi-fields (each one followed by the fields nested in that
/// multi-field's own `properties`), then the fields nested in the entry's `properties`.
///
/// The walk keeps its own stack so that deeply nested mappings cannot exhaust the
/// thread stack. The iterator stops after yielding the first error.
pub struct FieldWalker<'a> {
    pending: Vec<Pending<'a>>,
    max_depth: usize,
}

impl<'a> FieldWalker<'a> {
    fn new(doc_type: &'a str, root: &'a JsonObject, max_depth: usize) -> Self {
        let owner = FieldEntry::new(doc_type, MappingNode::new(root));
        FieldWalker {
            pending: vec![Pending::Properties { owner, depth: 1 }],
            max_depth,
        }
    }

    fn push_properties(&mut self, owner: FieldEntry<'a>, depth: usize) -> Result<(), MappingError> {
        let Some(properties) = owner.properties()? else {
            return Ok(());
        };
        if depth > self.max_depth {
            debug!(field=%owner.name, max_depth=self.max_depth, "mapping depth limit exceeded");
            return Err(MappingError::DepthLimitExceeded {
                field: owner.name.to_string(),
                max_depth: self.max_depth,
            });
        }
        for (name, value) in properties.iter().rev() {
            let entry = owner.child(PROPERTIES_KEY, name, value)?;
            self.pending.push(Pending::Field { entry, depth });
        }
        Ok(())
    }

    fn push_field_children(&mut self, entry: FieldEntry<'a>, depth: usize) -> Result<(), MappingError> {
        if entry.node.has_properties() {
            self.pending.push(Pending::Properties {
                owner: entry,
                depth: depth + 1,
            });
        }
        if let Some(multi_fields) = entry.multi_fields()? {
            for (name, value) in multi_fields.iter().rev() {
                let multi_field = entry.child(FIELDS_KEY, name, value)?;
                self.pending.push(Pending::MultiField {
                    parent: entry,
                    multi_field,
                    depth,
                });
            }
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<FieldVisit<'a>>, MappingError> {
        while let Some(pending) = self.pending.pop() {
            match pending {
                Pending::Properties { owner, depth } => self.push_properties(owner, depth)?,
                Pending::Field { entry, depth } => {
                    self.push_field_children(entry, depth)?;
                    return Ok(Some(FieldVisit::Field(entry)));
                }
                Pending::MultiField {
                    parent,
                    multi_field,
                    depth,
                } => {
                    // Only the nested properties of a multi-field are walked, not its own
                    // multi-fields.
                    if multi_field.node.has_properties() {
                        self.pending.push(Pending::Properties {
                            owner: multi_field,
                            depth: depth + 1,
                        });
                    }
                    return Ok(Some(FieldVisit::MultiField {
                        parent,
                        multi_field,
                    }));
                }
            }
        }
        Ok(None)
    }
}

impl<'a> Iterator for FieldWalker<'a> {
    type Item = Result<FieldVisit<'a>, MappingError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(visit_opt) => visit_opt.map(Ok),
            Err(error) => {
                self.pending.clear();
                Some(Err(error))
            }
        }
    }
}

/// Walks field mappings on behalf of the mapping-based checks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldVisitor {
    max_depth: usize,
}

impl Default for FieldVisitor {
    fn default() -> Self {
        FieldVisitor {
            max_depth: DEFAULT_MAX_MAPPING_DEPTH,
        }
    }
}

impl FieldVisitor {
    pub fn with_max_depth(max_depth: usize) -> Self {
        FieldVisitor { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn walk<'a>(&self, doc_type: &'a str, root: &'a JsonObject) -> FieldWalker<'a> {
        FieldWalker::new(doc_type, root, self.max_depth)
    }

    /// Returns one locator per field whose definition matches `predicate`, in traversal order.
    ///
    /// A matching field is reported as `[<formatted entry>]`, a matching multi-field as
    /// `[<formatted parent entry>, multifield: <name>]`.
    pub fn find_matches<'a, P, F>(
        &self,
        doc_type: &'a str,
        root: &'a JsonObject,
        predicate: P,
        formatter: F,
    ) -> Result<Vec<String>, MappingError>
    where
        P: Fn(&MappingNode<'a>) -> bool,
        F: Fn(&str, &FieldEntry<'a>) -> String,
    {
        let mut matches = Vec::new();
        for visit_res in self.walk(doc_type, root) {
            match visit_res? {
                FieldVisit::Field(entry) => {
                    if predicate(&entry.node) {
                        matches.push(format!("[{}]", formatter(doc_type, &entry)));
                    }
                }
                FieldVisit::MultiField {
                    parent,
                    multi_field,
                } => {
                    if predicate(&multi_field.node) {
                        matches.push(format!(
                            "[{}, multifield: {}]",
                            formatter(doc_type, &parent),
                            multi_field.name
                        ));
                    }
                }
            }
        }
        Ok(matches)
    }

    /// Counts the fields of a mapping the way the query-time field expansion limit does.
    ///
    /// Multi-fields are excluded based on the type of their parent field, not their own.
    pub fn count_fields(&self, doc_type: &str, root: &JsonObject) -> Result<usize, MappingError> {
        let mut num_fields = 0;
        for visit_res in self.walk(doc_type, root) {
            let counts = match visit_res? {
                FieldVisit::Field(entry) => field_counts(&entry.node),
                FieldVisit::MultiField {
                    parent,
                    multi_field,
                } => {
                    multi_field.node.contains_key(TYPE_KEY)
                        && !is_type_that_doesnt_count(parent.node.raw_field_type())
                }
            };
            if counts {
                num_fields += 1;
            }
        }
        Ok(num_fields)
    }
}

fn is_type_that_doesnt_count(field_type_opt: Option<&JsonValue>) -> bool {
    matches!(
        field_type_opt,
        Some(JsonValue::String(field_type)) if TYPES_THAT_DONT_COUNT.contains(field_type.as_str())
    )
}

fn field_counts(node: &MappingNode) -> bool {
    let Some(field_type) = node.raw_field_type() else {
        return false;
    };
    if field_type.as_str() == Some("object") && !node.contains_key(PROPERTIES_KEY) {
        return false;
    }
    !is_type_that_doesnt_count(Some(field_type))
}

/// [`FieldVisitor::find_matches`] with the default depth limit.
pub fn find_in_properties<'a, P, F>(
    doc_type: &'a str,
    root: &'a JsonObject,
    predicate: P,
    formatter: F,
) -> Result<Vec<String>, MappingError>
where
    P: Fn(&MappingNode<'a>) -> bool,
    F: Fn(&str, &FieldEntry<'a>) -> String,
{
    FieldVisitor::default().find_matches(doc_type, root, predicate, formatter)
}

/// [`FieldVisitor::count_fields`] with the default depth limit.
pub fn count_fields(doc_type: &str, root: &JsonObject) -> Result<usize, MappingError> {
    FieldVisitor::default().count_fields(doc_type, root)
}
