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

//! Shrinking the extension's `_locales` message files.
//!
//! Each locale file maps a message key to an object with a `message`
//! and an optional `description`. Descriptions only help translators,
//! so the packaged files carry them as empty strings.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::json::{to_string_pretty, write_atomically};

/// Directory holding one sub-directory of message files per locale.
pub const DEFAULT_LOCALES_DIR: &str = "src/_locales";

const INDENT: &[u8] = b"    ";

/// Counts from a [`minify_all`] run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MinifySummary {
    pub files: usize,
    pub descriptions: usize,
}

/// Blank every `description` in a parsed locale file.
///
/// Returns the number of descriptions found, or `None` when `locale` is
/// not a JSON object. Message values which are not objects are skipped.
pub fn blank_descriptions(locale: &mut Value) -> Option<usize> {
    let messages = locale.as_object_mut()?;
    let mut count = 0;
    for message in messages.values_mut() {
        if let Some(description) = message
            .as_object_mut()
            .and_then(|message| message.get_mut("description"))
        {
            *description = Value::String(String::new());
            count += 1;
        }
    }
    Some(count)
}

/// Minify the locale file contents in `text`.
///
/// The `path` is only used for error messages.
pub fn minify_str(text: &str, path: &Path) -> Result<(String, usize)> {
    let mut locale: Value = serde_json::from_str(text).map_err(|err| Error::json(path, err))?;
    let count = blank_descriptions(&mut locale).ok_or_else(|| Error::UnexpectedJson {
        path: path.to_path_buf(),
        expected: "a JSON object of messages",
    })?;
    let output = to_string_pretty(&locale, INDENT).map_err(|err| Error::json(path, err))?;
    Ok((output, count))
}

/// Minify the locale file at `path` in place.
///
/// Returns the number of descriptions which were blanked.
pub fn minify(path: &Path) -> Result<usize> {
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let (output, count) = minify_str(&text, path)?;
    write_atomically(path, &output)?;
    Ok(count)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().starts_with(b"."))
}

/// Find the message files below `root`, matching `<root>/*/*.json`.
///
/// Like a shell glob, `*` does not match names starting with a dot. The
/// paths are returned in sorted order.
pub fn discover_locales(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root).map_err(|err| Error::io(root, err))? {
        let locale_dir = entry.map_err(|err| Error::io(root, err))?.path();
        if is_hidden(&locale_dir) || !locale_dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&locale_dir).map_err(|err| Error::io(&locale_dir, err))? {
            let path = entry.map_err(|err| Error::io(&locale_dir, err))?.path();
            if !is_hidden(&path) && path.is_file() && path.extension() == Some("json".as_ref()) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Minify every message file below `root`.
///
/// Stops at the first failure. Files handled before the failure stay
/// minified.
pub fn minify_all(root: &Path) -> Result<MinifySummary> {
    let mut summary = MinifySummary::default();
    for path in discover_locales(root)? {
        let count = minify(&path)?;
        info!("Minified {} ({count} descriptions)", path.display());
        summary.files += 1;
        summary.descriptions += count;
    }
    if summary.files == 0 {
        debug!("No locale files found below {}", root.display());
    }
    Ok(summary)
}
