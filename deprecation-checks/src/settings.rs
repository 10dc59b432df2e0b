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

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use deprecation_mapping::JsonObject;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::SettingsError;

/// Flat view of an index's settings: dotted keys mapped to their string value.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonObject", into = "BTreeMap<String, String>")]
pub struct IndexSettings {
    settings: BTreeMap<String, String>,
}

impl IndexSettings {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.settings
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for IndexSettings
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
        let settings = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        IndexSettings { settings }
    }
}

/// Settings may be given nested (`{"index": {"frozen": "true"}}`) or flat
/// (`{"index.frozen": true}`). Arrays are stored comma-separated and nulls are dropped.
impl From<JsonObject> for IndexSettings {
    fn from(json_obj: JsonObject) -> Self {
        let mut settings = BTreeMap::new();
        let mut pending: Vec<(String, JsonValue)> = json_obj.into_iter().rev().collect();
        while let Some((key, value)) = pending.pop() {
            match value {
                JsonValue::Object(children) => {
                    for (child_key, child_value) in children.into_iter().rev() {
                        pending.push((format!("{key}.{child_key}"), child_value));
                    }
                }
                JsonValue::Null => {}
                JsonValue::Array(values) => {
                    let joined = values.iter().filter_map(scalar_to_string).join(",");
                    settings.insert(key, joined);
                }
                scalar => {
                    if let Some(value_str) = scalar_to_string(&scalar) {
                        settings.insert(key, value_str);
                    }
                }
            }
        }
        IndexSettings { settings }
    }
}

impl From<IndexSettings> for BTreeMap<String, String> {
    fn from(index_settings: IndexSettings) -> Self {
        index_settings.settings
    }
}

fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

type SettingParser<T> = fn(&'static str, &str) -> Result<T, SettingsError>;

/// Typed accessor of one index setting.
pub struct Setting<T> {
    key: &'static str,
    default_value: fn() -> T,
    parser: SettingParser<T>,
}

impl<T> Setting<T> {
    pub const fn new(
        key: &'static str,
        default_value: fn() -> T,
        parser: SettingParser<T>,
    ) -> Self {
        Setting {
            key,
            default_value,
            parser,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns true if the setting is explicitly set, even to its default value.
    pub fn exists(&self, settings: &IndexSettings) -> bool {
        settings.contains_key(self.key)
    }

    pub fn raw_value<'a>(&self, settings: &'a IndexSettings) -> Option<&'a str> {
        settings.get(self.key)
    }

    /// Reads the setting, falling back to its default value when it is not set.
    pub fn get(&self, settings: &IndexSettings) -> Result<T, SettingsError> {
        match settings.get(self.key) {
            Some(value) => (self.parser)(self.key, value),
            None => Ok((self.default_value)()),
        }
    }
}

impl<T> fmt::Debug for Setting<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter
            .debug_struct("Setting")
            .field("key", &self.key)
            .finish()
    }
}

fn invalid_value(key: &'static str, value: &str, reason: impl ToString) -> SettingsError {
    SettingsError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Only `true` and `false` are accepted.
pub fn parse_bool(key: &'static str, value: &str) -> Result<bool, SettingsError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid_value(key, value, "expected `true` or `false`")),
    }
}

pub fn parse_string(_key: &'static str, value: &str) -> Result<String, SettingsError> {
    Ok(value.to_string())
}

pub fn parse_usize(key: &'static str, value: &str) -> Result<usize, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|error| invalid_value(key, value, error))
}

pub fn parse_slow_log_level(key: &'static str, value: &str) -> Result<SlowLogLevel, SettingsError> {
    value
        .parse()
        .map_err(|error| invalid_value(key, value, error))
}

/// Level of the slow logs, superseded by per-level thresholds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlowLogLevel {
    Warn,
    Info,
    Debug,
    Trace,
}

impl SlowLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlowLogLevel::Warn => "WARN",
            SlowLogLevel::Info => "INFO",
            SlowLogLevel::Debug => "DEBUG",
            SlowLogLevel::Trace => "TRACE",
        }
    }
}

impl fmt::Display for SlowLogLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SlowLogLevel {
    type Err = String;

    fn from_str(level_str: &str) -> Result<Self, Self::Err> {
        match level_str.to_ascii_uppercase().as_str() {
            "WARN" => Ok(SlowLogLevel::Warn),
            "INFO" => Ok(SlowLogLevel::Info),
            "DEBUG" => Ok(SlowLogLevel::Debug),
            "TRACE" => Ok(SlowLogLevel::Trace),
            _ => Err(format!(
                "unknown slow log level `{level_str}`, expected one of WARN, INFO, DEBUG, TRACE"
            )),
        }
    }
}

fn true_fn() -> bool {
    true
}

fn false_fn() -> bool {
    false
}

fn trace_level_fn() -> SlowLogLevel {
    SlowLogLevel::Trace
}

fn usize_100_fn() -> usize {
    100
}

/// Node setting named in messages only.
pub const INDICES_MAX_CLAUSE_COUNT_KEY: &str = "indices.query.bool.max_clause_count";

pub static DEFAULT_FIELD_SETTING: Setting<String> =
    Setting::new("index.query.default_field", String::new, parse_string);

pub static INDEX_SOFT_DELETES_SETTING: Setting<bool> =
    Setting::new("index.soft_deletes.enabled", true_fn, parse_bool);

pub static INDEX_TRANSLOG_RETENTION_SIZE_SETTING: Setting<String> =
    Setting::new("index.translog.retention.size", String::new, parse_string);

pub static INDEX_TRANSLOG_RETENTION_AGE_SETTING: Setting<String> =
    Setting::new("index.translog.retention.age", String::new, parse_string);

pub static INDEX_DATA_PATH_SETTING: Setting<String> =
    Setting::new("index.data_path", String::new, parse_string);

pub static INDEX_INDEXING_SLOWLOG_LEVEL_SETTING: Setting<SlowLogLevel> = Setting::new(
    "index.indexing.slowlog.level",
    trace_level_fn,
    parse_slow_log_level,
);

pub static INDEX_SEARCH_SLOWLOG_LEVEL_SETTING: Setting<SlowLogLevel> = Setting::new(
    "index.search.slowlog.level",
    trace_level_fn,
    parse_slow_log_level,
);

pub static INDEX_STORE_TYPE_SETTING: Setting<String> =
    Setting::new("index.store.type", String::new, parse_string);

pub static INDEX_ROUTING_REQUIRE_SETTING: Setting<String> = Setting::new(
    "index.routing.allocation.require._tier",
    String::new,
    parse_string,
);

pub static INDEX_ROUTING_INCLUDE_SETTING: Setting<String> = Setting::new(
    "index.routing.allocation.include._tier",
    String::new,
    parse_string,
);

pub static INDEX_ROUTING_EXCLUDE_SETTING: Setting<String> = Setting::new(
    "index.routing.allocation.exclude._tier",
    String::new,
    parse_string,
);

pub static MAX_ADJACENCY_MATRIX_FILTERS_SETTING: Setting<usize> = Setting::new(
    "index.max_adjacency_matrix_filters",
    usize_100_fn,
    parse_usize,
);

pub static INDEX_FROZEN_SETTING: Setting<bool> = Setting::new("index.frozen", false_fn, parse_bool);

pub static TIER_PREFERENCE_SETTING: Setting<String> = Setting::new(
    "index.routing.allocation.include._tier_preference",
    String::new,
    parse_string,
);
