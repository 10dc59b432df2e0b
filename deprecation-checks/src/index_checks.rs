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

//! Index-level deprecation checks.
//!
//! Each check reads one immutable [`IndexMetadata`] snapshot and returns at most one issue.
//! Checks share no state and can run in any order.

use std::fmt::Display;

use deprecation_mapping::date_patterns::USE_NEW_FORMAT_SPECIFIERS;
use deprecation_mapping::predicates::{
    contains_chained_multi_fields, contains_field_names_disabled,
    is_date_field_with_deprecated_pattern, is_geo_shape_field_with_deprecated_param,
    GEO_SHAPE_TYPE,
};
use deprecation_mapping::{
    format_date_field, format_deprecated_geo_shape_params, format_field, FieldEntry, FieldVisitor,
    MappingNode,
};
use itertools::Itertools;

use crate::data_tier::{parse_tier_list, DiscoveryNodes, TIER_PREFERENCE};
use crate::settings::{
    Setting, SlowLogLevel, DEFAULT_FIELD_SETTING, INDEX_DATA_PATH_SETTING,
    INDEX_FROZEN_SETTING, INDEX_INDEXING_SLOWLOG_LEVEL_SETTING, INDEX_ROUTING_EXCLUDE_SETTING,
    INDEX_ROUTING_INCLUDE_SETTING, INDEX_ROUTING_REQUIRE_SETTING,
    INDEX_SEARCH_SLOWLOG_LEVEL_SETTING, INDEX_SOFT_DELETES_SETTING, INDEX_STORE_TYPE_SETTING,
    INDEX_TRANSLOG_RETENTION_AGE_SETTING, INDEX_TRANSLOG_RETENTION_SIZE_SETTING,
    INDICES_MAX_CLAUSE_COUNT_KEY, MAX_ADJACENCY_MATRIX_FILTERS_SETTING, TIER_PREFERENCE_SETTING,
};
use crate::{
    CheckError, CheckResult, DeprecationIssue, DeprecationLevel, IndexMetadata, IndexSettings,
    IndexVersion,
};

const TIER_FILTERING_URL: &str = "https://ela.st/es-deprecation-7-tier-filtering-settings";

/// Formats a list of locators the way they appear in issue details: `[a, b]`.
fn format_locators(locators: &[String]) -> String {
    format!("[{}]", locators.iter().join(", "))
}

/// Runs `find_matches` over every mapping of the index and concatenates the matches.
fn find_in_all_mappings<P, F>(
    index_metadata: &IndexMetadata,
    visitor: &FieldVisitor,
    predicate: P,
    formatter: F,
) -> Result<Vec<String>, CheckError>
where
    P: for<'a> Fn(&MappingNode<'a>) -> bool,
    F: for<'a> Fn(&str, &FieldEntry<'a>) -> String,
{
    let mut matches = Vec::new();
    for mapping in index_metadata.mappings() {
        let mapping_matches = visitor.find_matches(
            mapping.doc_type(),
            mapping.source_as_map(),
            &predicate,
            &formatter,
        )?;
        matches.extend(mapping_matches);
    }
    Ok(matches)
}

pub fn old_indices_check(index_metadata: &IndexMetadata) -> CheckResult {
    let created_with = &index_metadata.creation_version;
    if !created_with.before(&IndexVersion::V_7_0_0) {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Critical,
        "Index created before 7.0",
        "https://ela.st/es-deprecation-7-reindex",
        format!("This index was created using version: {created_with}"),
    )))
}

/// Reports indices whose field count exceeds `field_expansion_limit` while relying on automatic
/// field expansion, i.e. without `index.query.default_field`.
pub fn too_many_fields_check(
    index_metadata: &IndexMetadata,
    visitor: &FieldVisitor,
    field_expansion_limit: usize,
) -> CheckResult {
    if DEFAULT_FIELD_SETTING.exists(index_metadata.settings()) {
        return Ok(None);
    }
    let mut num_fields = 0;
    for mapping in index_metadata.mappings() {
        num_fields += visitor.count_fields(mapping.doc_type(), mapping.source_as_map())?;
    }
    if num_fields <= field_expansion_limit {
        return Ok(None);
    }
    let details = format!(
        "This index has [{num_fields}] fields, which exceeds the automatic field expansion limit \
         of {field_expansion_limit} and does not have [{}] set, which may cause queries which use \
         automatic field expansion, such as query_string, simple_query_string, and multi_match to \
         fail if fields are not explicitly specified in the query.",
        DEFAULT_FIELD_SETTING.key()
    );
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Warning,
        "Number of fields exceeds automatic field expansion limit",
        "https://ela.st/es-deprecation-7-number-of-auto-expanded-fields",
        details,
    )))
}

pub fn deprecated_date_time_format_check(
    index_metadata: &IndexMetadata,
    visitor: &FieldVisitor,
) -> CheckResult {
    if !index_metadata
        .creation_version
        .before(&IndexVersion::V_7_0_0)
    {
        return Ok(None);
    }
    let fields = find_in_all_mappings(
        index_metadata,
        visitor,
        is_date_field_with_deprecated_pattern,
        format_date_field,
    )?;
    if fields.is_empty() {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Warning,
        "Date field format uses patterns which has changed meaning in 7.0",
        "https://ela.st/es-deprecation-7-java-time",
        format!(
            "This index has date fields with deprecated formats: {}. {USE_NEW_FORMAT_SPECIFIERS}",
            format_locators(&fields)
        ),
    )))
}

pub fn chained_multi_fields_check(
    index_metadata: &IndexMetadata,
    visitor: &FieldVisitor,
) -> CheckResult {
    let fields = find_in_all_mappings(
        index_metadata,
        visitor,
        contains_chained_multi_fields,
        format_field,
    )?;
    if fields.is_empty() {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Warning,
        "Multi-fields within multi-fields",
        "https://ela.st/es-deprecation-7-chained-multi-fields",
        format!(
            "The names of fields that contain chained multi-fields: {}",
            format_locators(&fields)
        ),
    )))
}

/// Reports an explicit `_field_names.enabled` setting in the index mapping.
pub fn field_names_disabled_check(index_metadata: &IndexMetadata) -> CheckResult {
    let Some(mapping) = index_metadata.mapping() else {
        return Ok(None);
    };
    if !contains_field_names_disabled(mapping.source_as_map())? {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Warning,
        "Index mapping contains explicit `_field_names` enabling settings.",
        "https://ela.st/es-deprecation-7-field_names-settings",
        "The index mapping contains a deprecated `enabled` setting for `_field_names` that should \
         be removed moving foward.",
    )))
}

pub fn translog_retention_setting_check(index_metadata: &IndexMetadata) -> CheckResult {
    let settings = index_metadata.settings();
    if !INDEX_SOFT_DELETES_SETTING.get(settings)? {
        return Ok(None);
    }
    if !INDEX_TRANSLOG_RETENTION_SIZE_SETTING.exists(settings)
        && !INDEX_TRANSLOG_RETENTION_AGE_SETTING.exists(settings)
    {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Warning,
        "translog retention settings are ignored",
        "https://ela.st/es-deprecation-7-translog-settings",
        format!(
            "translog retention settings [{}] and [{}] are ignored because translog is no longer \
             used in peer recoveries with soft-deletes enabled (default in 7.0 or later)",
            INDEX_TRANSLOG_RETENTION_SIZE_SETTING.key(),
            INDEX_TRANSLOG_RETENTION_AGE_SETTING.key()
        ),
    )))
}

pub fn index_data_path_check(index_metadata: &IndexMetadata) -> CheckResult {
    if !INDEX_DATA_PATH_SETTING.exists(index_metadata.settings()) {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Critical,
        format!(
            "setting [{}] is deprecated and will be removed in a future version",
            INDEX_DATA_PATH_SETTING.key()
        ),
        "https://ela.st/es-deprecation-7-shared-path-settings",
        "Found index data path configured. Discontinue use of this setting.",
    )))
}

pub fn indexing_slow_log_level_setting_check(index_metadata: &IndexMetadata) -> CheckResult {
    slow_log_setting_check(index_metadata, &INDEX_INDEXING_SLOWLOG_LEVEL_SETTING)
}

pub fn search_slow_log_level_setting_check(index_metadata: &IndexMetadata) -> CheckResult {
    slow_log_setting_check(index_metadata, &INDEX_SEARCH_SLOWLOG_LEVEL_SETTING)
}

fn slow_log_setting_check(
    index_metadata: &IndexMetadata,
    setting: &Setting<SlowLogLevel>,
) -> CheckResult {
    if !setting.exists(index_metadata.settings()) {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Warning,
        format!(
            "setting [{}] is deprecated and will be removed in a future version",
            setting.key()
        ),
        "https://ela.st/es-deprecation-7-slowlog-settings",
        format!(
            "Found [{}] configured. Discontinue use of this setting. Use thresholds.",
            setting.key()
        ),
    )))
}

pub fn store_type_setting_check(index_metadata: &IndexMetadata) -> CheckResult {
    let store_type = INDEX_STORE_TYPE_SETTING.get(index_metadata.settings())?;
    if store_type != "simplefs" {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Warning,
        "[simplefs] is deprecated and will be removed in future versions",
        "https://ela.st/es-deprecation-7-simplefs-store-type",
        "[simplefs] is deprecated and will be removed in 8.0. Use [niofs] or other file systems \
         instead. Elasticsearch 7.15 or later uses [niofs] for the [simplefs] store type as it \
         offers superior or equivalent performance to [simplefs].",
    )))
}

/// Reports a setting that is removed in the next major version, if it is set.
pub fn check_removed_setting<T: Display>(
    settings: &IndexSettings,
    removed_setting: &Setting<T>,
    url: &str,
    level: DeprecationLevel,
) -> CheckResult {
    check_removed_setting_with_message(settings, removed_setting, url, level, |key| {
        format!("setting [{key}] is deprecated and will be removed in the next major version")
    })
}

/// Same as [`check_removed_setting`], with the issue message built from the setting key by
/// `message_fn`.
pub fn check_removed_setting_with_message<T, M>(
    settings: &IndexSettings,
    removed_setting: &Setting<T>,
    url: &str,
    level: DeprecationLevel,
    message_fn: M,
) -> CheckResult
where
    T: Display,
    M: FnOnce(&str) -> String,
{
    if !removed_setting.exists(settings) {
        return Ok(None);
    }
    let key = removed_setting.key();
    let value = removed_setting.get(settings)?;
    Ok(Some(DeprecationIssue::new(
        level,
        message_fn(key),
        url,
        format!("the setting [{key}] is currently set to [{value}], remove this setting"),
    )))
}

pub fn index_routing_require_setting_check(index_metadata: &IndexMetadata) -> CheckResult {
    check_removed_setting(
        index_metadata.settings(),
        &INDEX_ROUTING_REQUIRE_SETTING,
        TIER_FILTERING_URL,
        DeprecationLevel::Critical,
    )
}

pub fn index_routing_include_setting_check(index_metadata: &IndexMetadata) -> CheckResult {
    check_removed_setting(
        index_metadata.settings(),
        &INDEX_ROUTING_INCLUDE_SETTING,
        TIER_FILTERING_URL,
        DeprecationLevel::Critical,
    )
}

pub fn index_routing_exclude_setting_check(index_metadata: &IndexMetadata) -> CheckResult {
    check_removed_setting(
        index_metadata.settings(),
        &INDEX_ROUTING_EXCLUDE_SETTING,
        TIER_FILTERING_URL,
        DeprecationLevel::Critical,
    )
}

pub fn index_matrix_filters_setting_check(index_metadata: &IndexMetadata) -> CheckResult {
    check_removed_setting_with_message(
        index_metadata.settings(),
        &MAX_ADJACENCY_MATRIX_FILTERS_SETTING,
        "https://ela.st/es-deprecation-7-adjacency-matrix-filters-setting",
        DeprecationLevel::Warning,
        |key| {
            format!(
                "[{key}] setting will be ignored in 8.0. Use [{INDICES_MAX_CLAUSE_COUNT_KEY}] \
                 instead."
            )
        },
    )
}

/// Reports geo_shape fields of the index mapping that still use parameters of the prefix tree
/// indexing strategy.
pub fn geo_shape_mappings_check(
    index_metadata: &IndexMetadata,
    visitor: &FieldVisitor,
) -> CheckResult {
    let Some(mapping) = index_metadata.mapping() else {
        return Ok(None);
    };
    let messages = visitor.find_matches(
        GEO_SHAPE_TYPE,
        mapping.source_as_map(),
        is_geo_shape_field_with_deprecated_param,
        format_deprecated_geo_shape_params,
    )?;
    if messages.is_empty() {
        return Ok(None);
    }
    let index_name = index_metadata.index_name();
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Critical,
        format!(
            "mappings for index {index_name} contains deprecated geo_shape properties that must \
             be removed"
        ),
        "https://ela.st/es-deprecation-7-geo-shape-mappings",
        format!(
            "The following geo_shape parameters must be removed from {index_name}: [{}]",
            messages.iter().join("; ")
        ),
    )))
}

pub fn frozen_index_setting_check(index_metadata: &IndexMetadata) -> CheckResult {
    if !INDEX_FROZEN_SETTING.get(index_metadata.settings())? {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Warning,
        format!(
            "index [{}] is a frozen index. The frozen indices feature is deprecated and will be \
             removed in a future version",
            index_metadata.index_name()
        ),
        "https://www.elastic.co/guide/en/elasticsearch/reference/master/frozen-indices.html",
        "Frozen indices no longer offer any advantages. Consider cold or frozen tiers in place of \
         frozen indices.",
    )))
}

/// Reports indices without a tier preference on clusters where some data nodes do not hold
/// every data tier.
pub fn empty_data_tier_preference_check(
    nodes: &DiscoveryNodes,
    index_metadata: &IndexMetadata,
) -> CheckResult {
    if nodes.data_nodes_without_all_data_roles().is_empty() {
        return Ok(None);
    }
    let tier_preference = TIER_PREFERENCE_SETTING.get(index_metadata.settings())?;
    if !parse_tier_list(&tier_preference).is_empty() {
        return Ok(None);
    }
    Ok(Some(DeprecationIssue::new(
        DeprecationLevel::Critical,
        format!(
            "index [{}] does not have a [{TIER_PREFERENCE}] setting, in 8.0 this setting will be \
             required for all indices and may not be empty or null.",
            index_metadata.index_name()
        ),
        "https://www.elastic.co/guide/en/elasticsearch/reference/current/data-tiers.html",
        "Update the settings for this index to specify an appropriate tier preference.",
    )))
}

#[cfg(test)]
mod tests {
    use deprecation_mapping::MappingError;
    use serde_json::json;

    use super::*;
    use crate::data_tier::DiscoveryNode;
    use crate::SettingsError;

    fn index_7x() -> IndexMetadata {
        IndexMetadata::for_test("my-index", "7.17.0")
    }

    #[test]
    fn test_old_indices_check() {
        let issue = old_indices_check(&IndexMetadata::for_test("old", "6.8.23"))
            .unwrap()
            .unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Critical);
        assert_eq!(issue.message(), "Index created before 7.0");
        assert_eq!(issue.url(), "https://ela.st/es-deprecation-7-reindex");
        assert!(issue.details().contains("6.8.23"));
        assert!(old_indices_check(&index_7x()).unwrap().is_none());
        assert!(old_indices_check(&IndexMetadata::for_test("new", "7.0.0"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_old_indices_check_pre_release() {
        let issue = old_indices_check(&IndexMetadata::for_test("beta", "7.0.0-beta1"))
            .unwrap()
            .unwrap();
        assert_eq!(
            issue.details(),
            "This index was created using version: 7.0.0-beta1"
        );
    }

    #[test]
    fn test_too_many_fields_check() {
        let index_metadata = index_7x().with_mapping(
            "_doc",
            json!({"properties": {
                "a": {"type": "keyword"},
                "b": {"type": "text", "fields": {"raw": {"type": "keyword"}}},
                "c": {"type": "binary"},
            }}),
        );
        let visitor = FieldVisitor::default();
        let issue = too_many_fields_check(&index_metadata, &visitor, 2)
            .unwrap()
            .unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Warning);
        assert!(issue.details().starts_with("This index has [3] fields"));
        assert!(issue.details().contains("limit of 2 "));
        assert!(issue.details().contains("[index.query.default_field]"));
        assert!(too_many_fields_check(&index_metadata, &visitor, 3)
            .unwrap()
            .is_none());

        let index_metadata = index_metadata.with_settings([("index.query.default_field", "a")]);
        assert!(too_many_fields_check(&index_metadata, &visitor, 2)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_too_many_fields_check_sums_all_mappings() {
        let index_metadata = index_7x()
            .with_mapping("doc", json!({"properties": {"a": {"type": "keyword"}}}))
            .with_mapping("other", json!({"properties": {"b": {"type": "long"}}}));
        let issue = too_many_fields_check(&index_metadata, &FieldVisitor::default(), 1)
            .unwrap()
            .unwrap();
        assert!(issue.details().starts_with("This index has [2] fields"));
    }

    #[test]
    fn test_deprecated_date_time_format_check() {
        let mapping = json!({"properties": {
            "created": {"type": "date", "format": "yyyy-MM-dd"},
            "updated": {"type": "date", "format": "strict_date_optional_time"},
        }});
        let visitor = FieldVisitor::default();
        let old_index = IndexMetadata::for_test("old", "6.8.0").with_mapping("_doc", mapping.clone());
        let issue = deprecated_date_time_format_check(&old_index, &visitor)
            .unwrap()
            .unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Warning);
        assert!(issue
            .details()
            .starts_with("This index has date fields with deprecated formats: [[type: _doc, field: created, format: yyyy-MM-dd"));
        assert!(issue.details().ends_with(USE_NEW_FORMAT_SPECIFIERS));
        assert!(!issue.details().contains("updated"));

        let new_index = index_7x().with_mapping("_doc", mapping);
        assert!(deprecated_date_time_format_check(&new_index, &visitor)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_chained_multi_fields_check() {
        let index_metadata = index_7x().with_mapping(
            "_doc",
            json!({"properties": {
                "title": {
                    "type": "text",
                    "fields": {"raw": {"type": "keyword", "fields": {"lower": {"type": "keyword"}}}}
                },
                "body": {"type": "text", "fields": {"raw": {"type": "keyword"}}},
            }}),
        );
        let issue = chained_multi_fields_check(&index_metadata, &FieldVisitor::default())
            .unwrap()
            .unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Warning);
        assert_eq!(issue.message(), "Multi-fields within multi-fields");
        assert_eq!(
            issue.details(),
            "The names of fields that contain chained multi-fields: [[type: _doc, field: title]]"
        );
        assert!(chained_multi_fields_check(&index_7x(), &FieldVisitor::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_chained_multi_fields_check_on_deserialized_wrapped_mapping() {
        let index_metadata: IndexMetadata = serde_json::from_value(json!({
            "index_name": "my-index",
            "creation_version": "7.17.0",
            "mappings": [{
                "doc_type": "_doc",
                "source": {"_doc": {"properties": {
                    "title": {
                        "type": "text",
                        "fields": {"raw": {"type": "keyword", "fields": {"lower": {"type": "keyword"}}}}
                    }
                }}}
            }]
        }))
        .unwrap();
        let issue = chained_multi_fields_check(&index_metadata, &FieldVisitor::default())
            .unwrap()
            .unwrap();
        assert_eq!(
            issue.details(),
            "The names of fields that contain chained multi-fields: [[type: _doc, field: title]]"
        );
    }

    #[test]
    fn test_mapping_checks_over_multiple_mappings() {
        let index_metadata = IndexMetadata::for_test("multi", "6.8.0")
            .with_mapping(
                "doc",
                json!({"properties": {
                    "title": {"type": "text", "fields": {"raw": {"type": "keyword", "fields": {}}}},
                    "created": {"type": "date", "format": "yyyy-MM-dd"},
                }}),
            )
            .with_mapping(
                "legacy",
                json!({
                    "_field_names": {"enabled": false},
                    "properties": {
                        "body": {"type": "text", "fields": {"raw": {"type": "keyword", "fields": {}}}},
                        "updated": {"type": "date", "format": "YYYY"},
                        "area": {"type": "geo_shape", "tree": "quadtree"},
                    }
                }),
            );
        let visitor = FieldVisitor::default();

        let issue = chained_multi_fields_check(&index_metadata, &visitor)
            .unwrap()
            .unwrap();
        assert_eq!(
            issue.details(),
            "The names of fields that contain chained multi-fields: [[type: doc, field: title], \
             [type: legacy, field: body]]"
        );
        let issue = deprecated_date_time_format_check(&index_metadata, &visitor)
            .unwrap()
            .unwrap();
        assert!(issue.details().contains("type: doc, field: created"));
        assert!(issue.details().contains("type: legacy, field: updated"));

        // Only the first mapping is inspected for these two.
        assert!(geo_shape_mappings_check(&index_metadata, &visitor)
            .unwrap()
            .is_none());
        assert!(field_names_disabled_check(&index_metadata)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_mapping_check_fails_on_malformed_properties() {
        let index_metadata =
            index_7x().with_mapping("_doc", json!({"properties": {"title": "text"}}));
        let error = chained_multi_fields_check(&index_metadata, &FieldVisitor::default())
            .unwrap_err();
        assert!(matches!(
            error,
            CheckError::Mapping(MappingError::StructuralMismatch { .. })
        ));
    }

    #[test]
    fn test_mapping_check_fails_on_depth_limit() {
        let index_metadata = index_7x().with_mapping(
            "_doc",
            json!({"properties": {"a": {"properties": {"b": {"properties": {"c": {"type": "long"}}}}}}}),
        );
        let error = chained_multi_fields_check(&index_metadata, &FieldVisitor::with_max_depth(2))
            .unwrap_err();
        assert!(matches!(
            error,
            CheckError::Mapping(MappingError::DepthLimitExceeded { .. })
        ));
        assert!(error
            .to_string()
            .contains("the mapping could not be fully analyzed"));
    }

    #[test]
    fn test_field_names_disabled_check() {
        let index_metadata = index_7x().with_mapping(
            "_doc",
            json!({"_field_names": {"enabled": false}, "properties": {}}),
        );
        let issue = field_names_disabled_check(&index_metadata)
            .unwrap()
            .unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Warning);
        assert_eq!(
            issue.url(),
            "https://ela.st/es-deprecation-7-field_names-settings"
        );
        assert!(field_names_disabled_check(&index_7x()).unwrap().is_none());
        let index_metadata = index_7x().with_mapping("_doc", json!({"properties": {}}));
        assert!(field_names_disabled_check(&index_metadata)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_translog_retention_setting_check() {
        let index_metadata = index_7x().with_settings([("index.translog.retention.size", "1gb")]);
        let issue = translog_retention_setting_check(&index_metadata)
            .unwrap()
            .unwrap();
        assert_eq!(issue.message(), "translog retention settings are ignored");
        assert!(issue
            .details()
            .contains("[index.translog.retention.size] and [index.translog.retention.age]"));

        let index_metadata = index_7x().with_settings([
            ("index.translog.retention.age", "12h"),
            ("index.soft_deletes.enabled", "false"),
        ]);
        assert!(translog_retention_setting_check(&index_metadata)
            .unwrap()
            .is_none());
        assert!(translog_retention_setting_check(&index_7x())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_translog_retention_setting_check_invalid_soft_deletes() {
        let index_metadata = index_7x().with_settings([("index.soft_deletes.enabled", "yes")]);
        let error = translog_retention_setting_check(&index_metadata).unwrap_err();
        assert!(matches!(
            error,
            CheckError::Settings(SettingsError::InvalidValue {
                key: "index.soft_deletes.enabled",
                ..
            })
        ));
    }

    #[test]
    fn test_index_data_path_check() {
        let index_metadata = index_7x().with_settings([("index.data_path", "/mnt/data")]);
        let issue = index_data_path_check(&index_metadata).unwrap().unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Critical);
        assert_eq!(
            issue.message(),
            "setting [index.data_path] is deprecated and will be removed in a future version"
        );
        assert!(index_data_path_check(&index_7x()).unwrap().is_none());
    }

    #[test]
    fn test_slow_log_level_setting_checks() {
        let index_metadata = index_7x().with_settings([("index.indexing.slowlog.level", "info")]);
        let issue = indexing_slow_log_level_setting_check(&index_metadata)
            .unwrap()
            .unwrap();
        assert_eq!(
            issue.details(),
            "Found [index.indexing.slowlog.level] configured. Discontinue use of this setting. \
             Use thresholds."
        );
        assert!(search_slow_log_level_setting_check(&index_metadata)
            .unwrap()
            .is_none());

        let index_metadata = index_7x().with_settings([("index.search.slowlog.level", "DEBUG")]);
        let issue = search_slow_log_level_setting_check(&index_metadata)
            .unwrap()
            .unwrap();
        assert_eq!(
            issue.message(),
            "setting [index.search.slowlog.level] is deprecated and will be removed in a future \
             version"
        );
    }

    #[test]
    fn test_store_type_setting_check() {
        let index_metadata = index_7x().with_settings([("index.store.type", "simplefs")]);
        let issue = store_type_setting_check(&index_metadata).unwrap().unwrap();
        assert_eq!(
            issue.message(),
            "[simplefs] is deprecated and will be removed in future versions"
        );
        let index_metadata = index_7x().with_settings([("index.store.type", "niofs")]);
        assert!(store_type_setting_check(&index_metadata).unwrap().is_none());
        let index_metadata = index_7x().with_settings([("index.store.type", "SimpleFS")]);
        assert!(store_type_setting_check(&index_metadata).unwrap().is_none());
        assert!(store_type_setting_check(&index_7x()).unwrap().is_none());
    }

    #[test]
    fn test_check_removed_setting() {
        let settings: IndexSettings = [("index.max_adjacency_matrix_filters", "5")]
            .into_iter()
            .collect();
        let issue = check_removed_setting(
            &settings,
            &MAX_ADJACENCY_MATRIX_FILTERS_SETTING,
            "https://example.com",
            DeprecationLevel::Warning,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            issue.message(),
            "setting [index.max_adjacency_matrix_filters] is deprecated and will be removed in \
             the next major version"
        );
        assert!(issue.details().contains("index.max_adjacency_matrix_filters"));
        assert!(issue.details().contains("5"));
        assert_eq!(issue.url(), "https://example.com");

        assert!(check_removed_setting(
            &IndexSettings::default(),
            &MAX_ADJACENCY_MATRIX_FILTERS_SETTING,
            "https://example.com",
            DeprecationLevel::Warning,
        )
        .unwrap()
        .is_none());
    }

    #[test]
    fn test_index_routing_setting_checks() {
        let index_metadata = index_7x().with_settings([
            ("index.routing.allocation.require._tier", "hot"),
            ("index.routing.allocation.exclude._tier", "warm"),
        ]);
        let issue = index_routing_require_setting_check(&index_metadata)
            .unwrap()
            .unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Critical);
        assert_eq!(issue.url(), TIER_FILTERING_URL);
        assert_eq!(
            issue.details(),
            "the setting [index.routing.allocation.require._tier] is currently set to [hot], \
             remove this setting"
        );
        assert!(index_routing_include_setting_check(&index_metadata)
            .unwrap()
            .is_none());
        assert!(index_routing_exclude_setting_check(&index_metadata)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_index_matrix_filters_setting_check() {
        let index_metadata =
            index_7x().with_settings([("index.max_adjacency_matrix_filters", "5")]);
        let issue = index_matrix_filters_setting_check(&index_metadata)
            .unwrap()
            .unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Warning);
        assert_eq!(
            issue.message(),
            "[index.max_adjacency_matrix_filters] setting will be ignored in 8.0. Use \
             [indices.query.bool.max_clause_count] instead."
        );
        let index_metadata =
            index_7x().with_settings([("index.max_adjacency_matrix_filters", "lots")]);
        assert!(index_matrix_filters_setting_check(&index_metadata).is_err());
    }

    #[test]
    fn test_geo_shape_mappings_check() {
        let index_metadata = index_7x().with_mapping(
            "_doc",
            json!({"properties": {
                "location": {"type": "geo_shape", "tree": "quadtree", "precision": "1m"},
                "area": {"type": "geo_shape"},
                "name": {"type": "keyword", "tree": "ignored"},
            }}),
        );
        let issue = geo_shape_mappings_check(&index_metadata, &FieldVisitor::default())
            .unwrap()
            .unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Critical);
        assert_eq!(
            issue.message(),
            "mappings for index my-index contains deprecated geo_shape properties that must be \
             removed"
        );
        assert_eq!(
            issue.details(),
            "The following geo_shape parameters must be removed from my-index: [[parameter \
             [tree] in field [location]; parameter [precision] in field [location]]]"
        );
        assert!(geo_shape_mappings_check(&index_7x(), &FieldVisitor::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_frozen_index_setting_check() {
        let index_metadata = index_7x().with_settings([("index.frozen", "true")]);
        let issue = frozen_index_setting_check(&index_metadata)
            .unwrap()
            .unwrap();
        assert!(issue.message().starts_with("index [my-index] is a frozen index."));
        let index_metadata = index_7x().with_settings([("index.frozen", "false")]);
        assert!(frozen_index_setting_check(&index_metadata)
            .unwrap()
            .is_none());
        assert!(frozen_index_setting_check(&index_7x()).unwrap().is_none());
    }

    #[test]
    fn test_empty_data_tier_preference_check() {
        let tiered_nodes = DiscoveryNodes::new(vec![
            DiscoveryNode::new("hot-1", ["data_hot", "data_content"]),
            DiscoveryNode::new("warm-1", ["data_warm"]),
        ]);
        let issue = empty_data_tier_preference_check(&tiered_nodes, &index_7x())
            .unwrap()
            .unwrap();
        assert_eq!(issue.level(), DeprecationLevel::Critical);
        assert!(issue.message().starts_with(
            "index [my-index] does not have a [index.routing.allocation.include._tier_preference] \
             setting"
        ));

        let index_metadata = index_7x().with_settings([(
            "index.routing.allocation.include._tier_preference",
            "data_hot",
        )]);
        assert!(empty_data_tier_preference_check(&tiered_nodes, &index_metadata)
            .unwrap()
            .is_none());
        let index_metadata = index_7x()
            .with_settings([("index.routing.allocation.include._tier_preference", " , ")]);
        assert!(empty_data_tier_preference_check(&tiered_nodes, &index_metadata)
            .unwrap()
            .is_some());

        let legacy_nodes = DiscoveryNodes::new(vec![DiscoveryNode::new("node-1", ["data"])]);
        assert!(empty_data_tier_preference_check(&legacy_nodes, &index_7x())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_checks_are_idempotent() {
        let index_metadata = IndexMetadata::for_test("old", "6.8.0")
            .with_settings([("index.frozen", "true"), ("index.data_path", "/mnt")])
            .with_mapping(
                "_doc",
                json!({"properties": {
                    "title": {"type": "text", "fields": {"raw": {"type": "keyword", "fields": {}}}},
                    "created": {"type": "date", "format": "YYYY"},
                }}),
            );
        let visitor = FieldVisitor::default();
        for _ in 0..2 {
            assert_eq!(
                old_indices_check(&index_metadata),
                old_indices_check(&index_metadata)
            );
            assert_eq!(
                chained_multi_fields_check(&index_metadata, &visitor),
                chained_multi_fields_check(&index_metadata, &visitor)
            );
            assert_eq!(
                deprecated_date_time_format_check(&index_metadata, &visitor),
                deprecated_date_time_format_check(&index_metadata, &visitor)
            );
            assert_eq!(
                frozen_index_setting_check(&index_metadata),
                frozen_index_setting_check(&index_metadata)
            );
        }
        assert!(chained_multi_fields_check(&index_metadata, &visitor)
            .unwrap()
            .is_some());
    }
}
