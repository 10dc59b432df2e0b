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

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use deprecation_mapping::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{CheckError, IndexSettings};

/// Default document type label of single-type indices.
pub const DEFAULT_DOC_TYPE: &str = "_doc";

/// Version of the engine an index was created with, e.g. `6.8.23` or `7.0.0-beta1`.
///
/// A pre-release sorts before the release it precedes.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndexVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub pre_release: Option<String>,
}

impl IndexVersion {
    pub const V_7_0_0: IndexVersion = IndexVersion::new(7, 0, 0);

    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        IndexVersion {
            major,
            minor,
            patch,
            pre_release: None,
        }
    }

    pub fn before(&self, other: &IndexVersion) -> bool {
        self < other
    }
}

impl Ord for IndexVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre_release, &other.pre_release) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(left), Some(right)) => left.cmp(right),
            })
    }
}

impl PartialOrd for IndexVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IndexVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre_release) = &self.pre_release {
            write!(formatter, "-{pre_release}")?;
        }
        Ok(())
    }
}

impl FromStr for IndexVersion {
    type Err = CheckError;

    fn from_str(version_str: &str) -> Result<Self, Self::Err> {
        let invalid_version = || CheckError::InvalidIndexVersion(version_str.to_string());
        let (release_str, pre_release) = match version_str.trim().split_once('-') {
            Some((_, "")) => return Err(invalid_version()),
            Some((release_str, pre_release)) => (release_str, Some(pre_release.to_string())),
            None => (version_str.trim(), None),
        };
        let mut parts = release_str.splitn(3, '.');
        let mut next_part = || -> Result<u8, CheckError> {
            parts
                .next()
                .and_then(|part| part.parse().ok())
                .ok_or_else(invalid_version)
        };
        let major = next_part()?;
        let minor = next_part()?;
        let patch = next_part()?;
        Ok(IndexVersion {
            major,
            minor,
            patch,
            pre_release,
        })
    }
}

impl TryFrom<String> for IndexVersion {
    type Error = CheckError;

    fn try_from(version_str: String) -> Result<Self, Self::Error> {
        version_str.parse()
    }
}

impl From<IndexVersion> for String {
    fn from(version: IndexVersion) -> Self {
        version.to_string()
    }
}

/// A named mapping document attached to an index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "IndexMappingSerde")]
pub struct IndexMapping {
    doc_type: String,
    source: JsonObject,
}

#[derive(Deserialize)]
struct IndexMappingSerde {
    doc_type: String,
    source: JsonObject,
}

impl From<IndexMappingSerde> for IndexMapping {
    fn from(mapping: IndexMappingSerde) -> Self {
        IndexMapping::new(mapping.doc_type, mapping.source)
    }
}

impl IndexMapping {
    /// Builds a mapping from its source. A source wrapped in a single key equal to the doc type,
    /// as in `{"_doc": {"properties": {..}}}`, is unwrapped. Any other source is kept as is.
    pub fn new(doc_type: impl Into<String>, mut source: JsonObject) -> Self {
        let doc_type = doc_type.into();
        let is_wrapped =
            source.len() == 1 && matches!(source.get(&doc_type), Some(JsonValue::Object(_)));
        if is_wrapped {
            if let Some(JsonValue::Object(inner)) = source.remove(&doc_type) {
                source = inner;
            }
        }
        IndexMapping { doc_type, source }
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn source_as_map(&self) -> &JsonObject {
        &self.source
    }
}

/// Point-in-time snapshot of the metadata of one index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub index_name: String,
    pub creation_version: IndexVersion,
    #[serde(default)]
    pub settings: IndexSettings,
    #[serde(default)]
    pub mappings: Vec<IndexMapping>,
}

impl IndexMetadata {
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    /// The mapping of the index, if any. Indices carry at most one mapping.
    pub fn mapping(&self) -> Option<&IndexMapping> {
        self.mappings.first()
    }

    /// All mapping documents, including the extra ones of legacy multi-type indices.
    pub fn mappings(&self) -> &[IndexMapping] {
        &self.mappings
    }

    #[cfg(any(test, feature = "testsuite"))]
    pub fn for_test(index_name: &str, creation_version: &str) -> Self {
        IndexMetadata {
            index_name: index_name.to_string(),
            creation_version: creation_version
                .parse()
                .expect("test version should be valid"),
            settings: IndexSettings::default(),
            mappings: Vec::new(),
        }
    }

    #[cfg(any(test, feature = "testsuite"))]
    pub fn with_settings<K, V>(mut self, settings: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.settings = settings.into_iter().collect();
        self
    }

    #[cfg(any(test, feature = "testsuite"))]
    pub fn with_mapping(mut self, doc_type: &str, source: JsonValue) -> Self {
        let JsonValue::Object(source) = source else {
            panic!("test mapping should be a JSON object");
        };
        self.mappings.push(IndexMapping::new(doc_type, source));
        self
    }
}
