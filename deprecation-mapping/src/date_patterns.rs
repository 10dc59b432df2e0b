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

//! Detection of date formats written with legacy (Joda) pattern letters whose meaning
//! changed with java.time.

use std::collections::HashSet;

use itertools::Itertools;
use once_cell::sync::Lazy;

/// Closing sentence appended to date format deprecation details.
pub const USE_NEW_FORMAT_SPECIFIERS: &str = "Use new java.time date format specifiers.";

/// Sub-patterns starting with this prefix are already java.time patterns.
const JAVA_TIME_PREFIX: &str = "8";

const COMBINED_PATTERNS_SEPARATOR: &str = "||";

/// Letters whose meaning changed, in the order their advice is reported.
const LEGACY_PATTERN_LETTERS: &[(&str, &str)] = &[
    (
        "Y",
        "'Y' year-of-era should be replaced with 'y'. Use 'Y' for week-based-year.",
    ),
    (
        "y",
        "'y' year should be replaced with 'u'. Use 'y' for year-of-era.",
    ),
    ("C", "'C' century of era is no longer supported."),
    (
        "x",
        "'x' weak-year should be replaced with 'Y'. Use 'x' for zone-offset.",
    ),
    (
        "Z",
        "'Z' time zone offset/id fails when parsing 'Z' for Zulu timezone. Consider using 'X'.",
    ),
];

static BUILT_IN_FORMAT_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from_iter([
        "basic_date",
        "basic_date_time",
        "basic_date_time_no_millis",
        "basic_ordinal_date",
        "basic_ordinal_date_time",
        "basic_ordinal_date_time_no_millis",
        "basic_t_time",
        "basic_t_time_no_millis",
        "basic_time",
        "basic_time_no_millis",
        "basic_week_date",
        "basic_week_date_time",
        "basic_week_date_time_no_millis",
        "date",
        "date_hour",
        "date_hour_minute",
        "date_hour_minute_second",
        "date_hour_minute_second_fraction",
        "date_hour_minute_second_millis",
        "date_optional_time",
        "date_time",
        "date_time_no_millis",
        "epoch_millis",
        "epoch_second",
        "hour",
        "hour_minute",
        "hour_minute_second",
        "hour_minute_second_fraction",
        "hour_minute_second_millis",
        "iso8601",
        "ordinal_date",
        "ordinal_date_time",
        "ordinal_date_time_no_millis",
        "t_time",
        "t_time_no_millis",
        "time",
        "time_no_millis",
        "week_date",
        "week_date_time",
        "week_date_time_no_millis",
        "weekyear",
        "weekyear_week",
        "weekyear_week_day",
        "year",
        "year_month",
        "year_month_day",
        "date_optional_time_nanos",
    ])
});

fn is_built_in_format(pattern: &str) -> bool {
    let name = pattern.strip_prefix("strict_").unwrap_or(pattern);
    BUILT_IN_FORMAT_NAMES.contains(name)
}

fn split_combined_patterns(format: &str) -> impl Iterator<Item = &str> {
    format
        .split(COMBINED_PATTERNS_SEPARATOR)
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
}

fn has_legacy_letters(pattern: &str) -> bool {
    LEGACY_PATTERN_LETTERS
        .iter()
        .any(|(letter, _)| pattern.contains(letter))
}

fn is_deprecated_sub_pattern(pattern: &str) -> bool {
    !pattern.starts_with(JAVA_TIME_PREFIX)
        && !is_built_in_format(pattern)
        && has_legacy_letters(pattern)
}

/// Returns true if any `||`-separated part of `format` uses a legacy pattern letter.
pub fn is_deprecated_pattern(format: &str) -> bool {
    split_combined_patterns(format).any(is_deprecated_sub_pattern)
}

/// Describes how to rewrite the deprecated parts of `format`.
///
/// Returns an empty string if nothing in `format` is deprecated.
pub fn format_suggestion(format: &str) -> String {
    split_combined_patterns(format)
        .filter(|pattern| is_deprecated_sub_pattern(pattern))
        .map(|pattern| {
            LEGACY_PATTERN_LETTERS
                .iter()
                .filter(|(letter, _)| pattern.contains(letter))
                .map(|(_, advice)| *advice)
                .join("; ")
        })
        .unique()
        .join("; ")
}
