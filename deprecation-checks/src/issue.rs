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

use std::fmt;

use deprecation_mapping::JsonObject;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprecationLevel {
    /// The index keeps working after the upgrade but should be fixed.
    Warning,
    /// The upgrade cannot proceed until the issue is resolved.
    Critical,
}

impl DeprecationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeprecationLevel::Warning => "warning",
            DeprecationLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for DeprecationLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A problem found on an index, as reported to operators before an upgrade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeprecationIssue {
    level: DeprecationLevel,
    message: String,
    url: String,
    details: String,
    #[serde(default)]
    resolve_during_rolling_upgrade: bool,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<JsonObject>,
}

impl DeprecationIssue {
    /// Creates an issue that cannot be resolved automatically and carries no metadata.
    pub fn new(
        level: DeprecationLevel,
        message: impl Into<String>,
        url: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        DeprecationIssue {
            level,
            message: message.into(),
            url: url.into(),
            details: details.into(),
            resolve_during_rolling_upgrade: false,
            meta: None,
        }
    }

    pub fn level(&self) -> DeprecationLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn resolve_during_rolling_upgrade(&self) -> bool {
        self.resolve_during_rolling_upgrade
    }

    pub fn meta(&self) -> Option<&JsonObject> {
        self.meta.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deprecation_level_ordering() {
        assert!(DeprecationLevel::Critical > DeprecationLevel::Warning);
        assert_eq!(DeprecationLevel::Critical.to_string(), "critical");
    }

    #[test]
    fn test_deprecation_issue_serialization() {
        let issue = DeprecationIssue::new(
            DeprecationLevel::Warning,
            "Multi-fields within multi-fields",
            "https://ela.st/es-deprecation-7-chained-multi-fields",
            "The names of fields that contain chained multi-fields: [[type: _doc, field: title]]",
        );
        assert!(!issue.resolve_during_rolling_upgrade());
        assert!(issue.meta().is_none());
        let issue_json = serde_json::to_value(&issue).unwrap();
        assert_eq!(
            issue_json,
            json!({
                "level": "warning",
                "message": "Multi-fields within multi-fields",
                "url": "https://ela.st/es-deprecation-7-chained-multi-fields",
                "details": "The names of fields that contain chained multi-fields: [[type: _doc, field: title]]",
                "resolve_during_rolling_upgrade": false
            })
        );
        let deserialized: DeprecationIssue = serde_json::from_value(issue_json).unwrap();
        assert_eq!(deserialized, issue);
    }
}
