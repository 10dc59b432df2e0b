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

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Generic data role, which covers every data tier.
pub const DATA_ROLE: &str = "data";

pub const DATA_TIERS: [&str; 5] = [
    "data_content",
    "data_hot",
    "data_warm",
    "data_cold",
    "data_frozen",
];

/// Name of the tier preference, as shown in messages.
pub const TIER_PREFERENCE: &str = "index.routing.allocation.include._tier_preference";

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryNode {
    pub node_id: String,
    pub roles: BTreeSet<String>,
}

impl DiscoveryNode {
    pub fn new<R: Into<String>>(node_id: impl Into<String>, roles: impl IntoIterator<Item = R>) -> Self {
        DiscoveryNode {
            node_id: node_id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the node holds the generic data role or any data tier role.
    pub fn can_contain_data(&self) -> bool {
        self.roles
            .iter()
            .any(|role| role == DATA_ROLE || role.starts_with("data_"))
    }

    pub fn has_all_data_roles(&self) -> bool {
        self.roles.contains(DATA_ROLE) || DATA_TIERS.iter().all(|tier| self.roles.contains(*tier))
    }
}

/// Nodes of the cluster and their roles.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoveryNodes {
    nodes: Vec<DiscoveryNode>,
}

impl DiscoveryNodes {
    pub fn new(nodes: Vec<DiscoveryNode>) -> Self {
        DiscoveryNodes { nodes }
    }

    pub fn nodes(&self) -> &[DiscoveryNode] {
        &self.nodes
    }

    /// Data nodes that cannot hold every data tier.
    pub fn data_nodes_without_all_data_roles(&self) -> Vec<&DiscoveryNode> {
        self.nodes
            .iter()
            .filter(|node| node.can_contain_data() && !node.has_all_data_roles())
            .collect()
    }
}

/// Splits a comma-separated tier preference, dropping blank entries.
pub fn parse_tier_list(tiers: &str) -> Vec<&str> {
    tiers
        .split(',')
        .map(str::trim)
        .filter(|tier| !tier.is_empty())
        .collect()
}
