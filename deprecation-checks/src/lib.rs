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

//! Deprecation checks run against the metadata of every index before a major version upgrade.
//!
//! Each check inspects one index snapshot and reports at most one [`DeprecationIssue`].
//! [`run_index_checks`] runs the whole [`INDEX_CHECKS`] registry and collects issues and
//! failures per index.

mod data_tier;
mod error;
pub mod index_checks;
mod index_metadata;
mod issue;
mod runner;
pub mod settings;

pub use data_tier::{
    parse_tier_list, DiscoveryNode, DiscoveryNodes, DATA_ROLE, DATA_TIERS, TIER_PREFERENCE,
};
pub use error::{CheckError, CheckResult, SettingsError};
pub use index_metadata::{IndexMapping, IndexMetadata, IndexVersion, DEFAULT_DOC_TYPE};
pub use issue::{DeprecationIssue, DeprecationLevel};
pub use runner::{
    run_index_checks, CheckContext, CheckFailure, DeprecationReport, IndexCheck, INDEX_CHECKS,
};
pub use settings::{IndexSettings, Setting, SlowLogLevel};
