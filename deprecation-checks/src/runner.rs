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

use std::collections::{BTreeMap, HashSet};

use deprecation_config::DeprecationCheckConfig;
use deprecation_mapping::FieldVisitor;
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::data_tier::DiscoveryNodes;
use crate::index_checks::*;
use crate::{CheckError, CheckResult, DeprecationIssue, IndexMetadata};

/// Cluster-wide inputs shared by every check run.
#[derive(Clone, Debug, Default)]
pub struct CheckContext {
    pub config: DeprecationCheckConfig,
    pub nodes: DiscoveryNodes,
}

impl CheckContext {
    pub fn new(config: DeprecationCheckConfig, nodes: DiscoveryNodes) -> Self {
        CheckContext { config, nodes }
    }

    pub fn field_visitor(&self) -> FieldVisitor {
        FieldVisitor::with_max_depth(self.config.max_mapping_depth)
    }
}

/// A named index check, as listed in [`INDEX_CHECKS`].
#[derive(Clone, Copy)]
pub struct IndexCheck {
    pub name: &'static str,
    pub check: fn(&CheckContext, &IndexMetadata) -> CheckResult,
}

impl std::fmt::Debug for IndexCheck {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str(self.name)
    }
}

/// Every index check, in the order their issues are reported.
pub static INDEX_CHECKS: &[IndexCheck] = &[
    IndexCheck {
        name: "old_indices",
        check: |_, index_metadata| old_indices_check(index_metadata),
    },
    IndexCheck {
        name: "too_many_fields",
        check: |ctx, index_metadata| {
            too_many_fields_check(
                index_metadata,
                &ctx.field_visitor(),
                ctx.config.field_expansion_limit,
            )
        },
    },
    IndexCheck {
        name: "deprecated_date_time_format",
        check: |ctx, index_metadata| {
            deprecated_date_time_format_check(index_metadata, &ctx.field_visitor())
        },
    },
    IndexCheck {
        name: "chained_multi_fields",
        check: |ctx, index_metadata| chained_multi_fields_check(index_metadata, &ctx.field_visitor()),
    },
    IndexCheck {
        name: "field_names_disabled",
        check: |_, index_metadata| field_names_disabled_check(index_metadata),
    },
    IndexCheck {
        name: "translog_retention_setting",
        check: |_, index_metadata| translog_retention_setting_check(index_metadata),
    },
    IndexCheck {
        name: "index_data_path",
        check: |_, index_metadata| index_data_path_check(index_metadata),
    },
    IndexCheck {
        name: "indexing_slow_log_level_setting",
        check: |_, index_metadata| indexing_slow_log_level_setting_check(index_metadata),
    },
    IndexCheck {
        name: "search_slow_log_level_setting",
        check: |_, index_metadata| search_slow_log_level_setting_check(index_metadata),
    },
    IndexCheck {
        name: "store_type_setting",
        check: |_, index_metadata| store_type_setting_check(index_metadata),
    },
    IndexCheck {
        name: "index_routing_require_setting",
        check: |_, index_metadata| index_routing_require_setting_check(index_metadata),
    },
    IndexCheck {
        name: "index_routing_include_setting",
        check: |_, index_metadata| index_routing_include_setting_check(index_metadata),
    },
    IndexCheck {
        name: "index_routing_exclude_setting",
        check: |_, index_metadata| index_routing_exclude_setting_check(index_metadata),
    },
    IndexCheck {
        name: "index_matrix_filters_setting",
        check: |_, index_metadata| index_matrix_filters_setting_check(index_metadata),
    },
    IndexCheck {
        name: "geo_shape_mappings",
        check: |ctx, index_metadata| geo_shape_mappings_check(index_metadata, &ctx.field_visitor()),
    },
    IndexCheck {
        name: "frozen_index_setting",
        check: |_, index_metadata| frozen_index_setting_check(index_metadata),
    },
    IndexCheck {
        name: "empty_data_tier_preference",
        check: |ctx, index_metadata| empty_data_tier_preference_check(&ctx.nodes, index_metadata),
    },
];

static INDEX_CHECK_NAMES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| INDEX_CHECKS.iter().map(|index_check| index_check.name).collect());

/// A check that could not analyze an index.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckFailure {
    pub index_name: String,
    pub check_name: &'static str,
    #[serde(serialize_with = "serialize_error")]
    pub error: CheckError,
}

fn serialize_error<S: Serializer>(error: &CheckError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Issues found per index, plus the checks that failed.
///
/// Indices without issues do not appear in `index_issues`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DeprecationReport {
    pub index_issues: BTreeMap<String, Vec<DeprecationIssue>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<CheckFailure>,
}

impl DeprecationReport {
    pub fn issues(&self, index_name: &str) -> &[DeprecationIssue] {
        self.index_issues
            .get(index_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn num_issues(&self) -> usize {
        self.index_issues.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index_issues.is_empty() && self.failures.is_empty()
    }
}

/// Runs every check that is not skipped by the config against every index.
///
/// A failing check is logged and recorded in the report. It never hides the issues found by
/// other checks.
pub fn run_index_checks<'a>(
    ctx: &CheckContext,
    indices: impl IntoIterator<Item = &'a IndexMetadata>,
) -> DeprecationReport {
    for skipped_check in &ctx.config.skip_checks {
        if !INDEX_CHECK_NAMES.contains(skipped_check.as_str()) {
            warn!(check_name=%skipped_check, "skipped check does not exist");
        }
    }
    let enabled_checks: Vec<&IndexCheck> = INDEX_CHECKS
        .iter()
        .filter(|check| !ctx.config.is_skipped(check.name))
        .collect();
    let mut report = DeprecationReport::default();
    let mut num_indices = 0;

    for index_metadata in indices {
        num_indices += 1;
        let mut issues = Vec::new();

        for index_check in &enabled_checks {
            match (index_check.check)(ctx, index_metadata) {
                Ok(Some(issue)) => issues.push(issue),
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        index_name=%index_metadata.index_name,
                        check_name=index_check.name,
                        error=%error,
                        "failed to run index deprecation check"
                    );
                    report.failures.push(CheckFailure {
                        index_name: index_metadata.index_name.clone(),
                        check_name: index_check.name,
                        error,
                    });
                }
            }
        }
        if !issues.is_empty() {
            report
                .index_issues
                .entry(index_metadata.index_name.clone())
                .or_default()
                .extend(issues);
        }
    }
    info!(
        num_indices,
        num_checks = enabled_checks.len(),
        num_issues = report.num_issues(),
        num_failures = report.failures.len(),
        "ran index deprecation checks"
    );
    report
}
