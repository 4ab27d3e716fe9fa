// Copyright 2026 The Conseal Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tagging ToS;DR service entries with a site category.
//!
//! The categories come from a CSV dataset which maps a domain to an IAB
//! tier 2 label. A service entry lists its domains in a single
//! comma-separated `url` string; the first listed domain found in the
//! dataset decides the category of the whole entry.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::warn;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::json::{read_json, to_ascii_string_pretty, write_atomically};

pub const DEFAULT_DATASET_FILE: &str = "categorised_dataset.txt";
pub const DEFAULT_DUMP_FILE: &str = "dump.json";
pub const DEFAULT_OUTPUT_FILE: &str = "dump_with_categories.json";

/// Category given to entries without a known domain.
pub const UNKNOWN_CATEGORY: &str = "unknown";

const DOMAIN_COLUMN: &str = "domain";
const CATEGORY_COLUMN: &str = "iab_tier2";
const INDENT: &[u8] = b"  ";

/// Normalized domain to category label.
pub type CategoryMap = HashMap<String, String>;

/// Counts from annotating a dump.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MergeSummary {
    pub entries: usize,
    pub matched: usize,
    pub unknown: usize,
}

/// Lowercase and trim `domain`, then drop a leading `www.`.
pub fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim().to_lowercase();
    match domain.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => domain,
    }
}

/// Build a [`CategoryMap`] from CSV data with `domain` and `iab_tier2`
/// columns.
///
/// When a domain occurs more than once, the last row wins. The `path`
/// is only used for error messages.
pub fn read_category_map<R: Read>(reader: R, path: &Path) -> Result<CategoryMap> {
    let csv_error = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?;
    let column = |column: &'static str| {
        headers
            .iter()
            .position(|header| header == column)
            .ok_or_else(|| Error::MissingColumn {
                path: path.to_path_buf(),
                column,
            })
    };
    let domain_idx = column(DOMAIN_COLUMN)?;
    let category_idx = column(CATEGORY_COLUMN)?;

    let mut categories = CategoryMap::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let domain = normalize_domain(&record[domain_idx]);
        let category = record[category_idx].trim();
        if domain.is_empty() {
            warn!(
                "Empty domain on line {} of {}",
                record.position().map_or(0, |pos| pos.line()),
                path.display()
            );
        }
        categories.insert(domain, category.to_string());
    }
    Ok(categories)
}

/// Load the category dataset at `path`.
pub fn load_category_map(path: &Path) -> Result<CategoryMap> {
    let file = File::open(path).map_err(|err| Error::io(path, err))?;
    read_category_map(file, path)
}

fn find_category<'a>(url_string: &str, categories: &'a CategoryMap) -> Option<&'a str> {
    url_string
        .split(',')
        .map(normalize_domain)
        .filter(|domain| !domain.is_empty())
        .find_map(|domain| categories.get(&domain))
        .map(String::as_str)
}

/// Find the category of the first domain in the comma-separated
/// `url_string` which appears in `categories`.
///
/// Empty domains never match, even if the dataset has a row for one.
pub fn get_category_for_urls<'a>(url_string: &str, categories: &'a CategoryMap) -> &'a str {
    find_category(url_string, categories).unwrap_or(UNKNOWN_CATEGORY)
}

/// Set the `category` of a single entry, returning `true` when one of
/// its domains was found.
pub fn annotate_entry(entry: &mut Map<String, Value>, categories: &CategoryMap) -> bool {
    let url_string = entry.get("url").and_then(Value::as_str).unwrap_or_default();
    let found = find_category(url_string, categories);
    let category = found.unwrap_or(UNKNOWN_CATEGORY);
    entry.insert("category".to_string(), Value::String(category.to_string()));
    found.is_some()
}

/// Set the `category` of every entry in `entries`.
///
/// Fails without changing anything when an element is not a JSON
/// object. The `path` is only used for error messages.
pub fn annotate_entries(
    entries: &mut [Value],
    categories: &CategoryMap,
    path: &Path,
) -> Result<MergeSummary> {
    if !entries.iter().all(Value::is_object) {
        return Err(Error::UnexpectedJson {
            path: path.to_path_buf(),
            expected: "an array of JSON objects",
        });
    }
    let mut summary = MergeSummary::default();
    for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
        summary.entries += 1;
        if annotate_entry(entry, categories) {
            summary.matched += 1;
        } else {
            summary.unknown += 1;
        }
    }
    Ok(summary)
}

/// Annotate the entries of the `dump` file with categories from the
/// `dataset` file and write the result to `output`.
pub fn combine(dataset: &Path, dump: &Path, output: &Path) -> Result<MergeSummary> {
    let categories = load_category_map(dataset)?;
    let mut data = read_json(dump)?;
    let entries = data.as_array_mut().ok_or_else(|| Error::UnexpectedJson {
        path: dump.to_path_buf(),
        expected: "a JSON array",
    })?;
    let summary = annotate_entries(entries, &categories, dump)?;
    let contents = to_ascii_string_pretty(&data, INDENT).map_err(|err| Error::json(output, err))?;
    write_atomically(output, &contents)?;
    Ok(summary)
}
