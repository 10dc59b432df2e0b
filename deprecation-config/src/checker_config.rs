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

use anyhow::{bail, ensure, Context};
use deprecation_mapping::DEFAULT_MAX_MAPPING_DEPTH;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ConfigFormat;

/// Default of the query-time limit on the number of clauses a query may expand to.
pub const DEFAULT_FIELD_EXPANSION_LIMIT: usize = 1024;

const SUPPORTED_CONFIG_VERSIONS: &[&str] = &["0.1"];

/// Tunes how index deprecation checks are run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeprecationCheckConfig {
    pub version: String,
    /// Number of fields above which indices without `index.query.default_field` are reported.
    #[serde(default = "DeprecationCheckConfig::default_field_expansion_limit")]
    pub field_expansion_limit: usize,
    /// Maximum nesting of `properties` walked before giving up on a mapping.
    #[serde(default = "DeprecationCheckConfig::default_max_mapping_depth")]
    pub max_mapping_depth: usize,
    /// Names of the checks that must not run.
    #[serde(default)]
    pub skip_checks: Vec<String>,
}

impl DeprecationCheckConfig {
    fn default_version() -> String {
        SUPPORTED_CONFIG_VERSIONS[0].to_string()
    }

    fn default_field_expansion_limit() -> usize {
        DEFAULT_FIELD_EXPANSION_LIMIT
    }

    fn default_max_mapping_depth() -> usize {
        DEFAULT_MAX_MAPPING_DEPTH
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !SUPPORTED_CONFIG_VERSIONS.contains(&self.version.as_str()) {
            bail!(
                "unsupported config version `{}`. supported versions are: {:?}",
                self.version,
                SUPPORTED_CONFIG_VERSIONS
            );
        }
        ensure!(
            self.field_expansion_limit > 0,
            "`field_expansion_limit` must be strictly positive"
        );
        ensure!(
            self.max_mapping_depth > 0,
            "`max_mapping_depth` must be strictly positive"
        );
        let mut seen_checks = HashSet::with_capacity(self.skip_checks.len());
        for check_name in &self.skip_checks {
            if !seen_checks.insert(check_name.as_str()) {
                bail!("check `{check_name}` is listed more than once in `skip_checks`");
            }
        }
        Ok(())
    }

    pub fn is_skipped(&self, check_name: &str) -> bool {
        self.skip_checks.iter().any(|skipped| skipped == check_name)
    }

    #[cfg(any(test, feature = "testsuite"))]
    pub fn for_test() -> Self {
        DeprecationCheckConfig {
            max_mapping_depth: 64,
            ..Default::default()
        }
    }
}

impl Default for DeprecationCheckConfig {
    fn default() -> Self {
        DeprecationCheckConfig {
            version: Self::default_version(),
            field_expansion_limit: Self::default_field_expansion_limit(),
            max_mapping_depth: Self::default_max_mapping_depth(),
            skip_checks: Vec::new(),
        }
    }
}

/// Parses and validates a checker config.
pub fn load_deprecation_config(
    config_format: ConfigFormat,
    config_content: &[u8],
) -> anyhow::Result<DeprecationCheckConfig> {
    let config: DeprecationCheckConfig = config_format
        .parse(config_content)
        .context("failed to parse deprecation check config")?;
    config
        .validate()
        .context("invalid deprecation check config")?;
    info!(
        field_expansion_limit = config.field_expansion_limit,
        max_mapping_depth = config.max_mapping_depth,
        num_skipped_checks = config.skip_checks.len(),
        "loaded deprecation check config"
    );
    Ok(config)
}
