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

use deprecation_mapping::MappingError;
use thiserror::Error;

use crate::DeprecationIssue;

/// Outcome of a single check: an issue, nothing to report, or a failure to analyze the index.
pub type CheckResult = Result<Option<DeprecationIssue>, CheckError>;

/// A typed setting could not be read from the index settings.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum SettingsError {
    #[error("failed to parse value `{value}` of setting `{key}`: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Failure of one check on one index. Other checks and other indices are unaffected.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CheckError {
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("invalid index version `{0}`")]
    InvalidIndexVersion(String),
}
