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

//! Reading and writing the JSON files handled by the tools.
//!
//! Output mirrors what the asset pipeline has always produced: pretty
//! printed with a fixed indentation and no trailing newline. Locale
//! files keep non-ASCII text as-is, while the merged dump escapes it as
//! `\uXXXX` sequences.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Serializer, Value};
use tempfile::Builder;

use crate::error::{Error, Result};

/// Read and parse the JSON document at `path`.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    serde_json::from_str(&text).map_err(|err| Error::json(path, err))
}

/// Pretty print `value` with `indent`, leaving non-ASCII text unescaped.
pub fn to_string_pretty<T: Serialize + ?Sized>(
    value: &T,
    indent: &[u8],
) -> serde_json::Result<String> {
    serialize(value, PrettyFormatter::with_indent(indent))
}

/// Pretty print `value` with `indent`, escaping everything outside
/// printable ASCII.
pub fn to_ascii_string_pretty<T: Serialize + ?Sized>(
    value: &T,
    indent: &[u8],
) -> serde_json::Result<String> {
    serialize(value, AsciiFormatter(PrettyFormatter::with_indent(indent)))
}

fn serialize<T, F>(value: &T, formatter: F) -> serde_json::Result<String>
where
    T: Serialize + ?Sized,
    F: Formatter,
{
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// Replace the contents of `path` with `contents`.
///
/// The data is written to a temporary file next to `path` which is then
/// renamed over it, so readers see either the old or the new file. The
/// permissions of an existing file are kept, a new file is created as
/// `File::create` would.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    // New files get the usual 0666 minus umask instead of the 0600 of a
    // temporary file.
    #[cfg(unix)]
    builder.permissions(<fs::Permissions as std::os::unix::fs::PermissionsExt>::from_mode(
        0o666,
    ));
    let mut file = builder.tempfile_in(dir).map_err(|err| Error::io(dir, err))?;
    file.write_all(contents.as_bytes())
        .map_err(|err| Error::io(file.path(), err))?;
    if let Ok(metadata) = fs::metadata(path) {
        file.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|err| Error::io(path, err))?;
    }
    file.persist(path).map_err(|err| Error::io(path, err.error))?;
    Ok(())
}

/// A [`PrettyFormatter`] which writes `\uXXXX` escapes for every
/// character outside the printable ASCII range.
struct AsciiFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn pretty_keeps_non_ascii() {
        let value = json!({"greeting": {"message": "Grüß dich"}});
        assert_eq!(
            to_string_pretty(&value, b"    ").unwrap(),
            "{\n    \"greeting\": {\n        \"message\": \"Grüß dich\"\n    }\n}"
        );
    }

    #[test]
    fn ascii_escapes_non_ascii() {
        let value = json!([{"title": "café", "emoji": "😀"}]);
        assert_eq!(
            to_ascii_string_pretty(&value, b"  ").unwrap(),
            "[\n  {\n    \"title\": \"caf\\u00e9\",\n    \"emoji\": \"\\ud83d\\ude00\"\n  }\n]"
        );
    }

    #[test]
    fn ascii_escapes_delete_and_keeps_builtin_escapes() {
        let value = json!("a\u{7f}\"b\n");
        assert_eq!(
            to_ascii_string_pretty(&value, b"  ").unwrap(),
            "\"a\\u007f\\\"b\\n\""
        );
    }

    #[test]
    fn empty_containers() {
        let value = json!({"list": [], "map": {}});
        assert_eq!(
            to_ascii_string_pretty(&value, b"  ").unwrap(),
            "{\n  \"list\": [],\n  \"map\": {}\n}"
        );
    }

    #[test]
    fn write_atomically_replaces_contents() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("messages.json");
        fs::write(&path, "old")?;

        write_atomically(&path, "new")?;

        assert_eq!(fs::read_to_string(&path)?, "new");
        assert_eq!(fs::read_dir(tmp_dir.path())?.count(), 1);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn write_atomically_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let tmp_dir = tempfile::tempdir()?;
        let reference = tmp_dir.path().join("reference.json");
        fs::File::create(&reference)?;
        let created = tmp_dir.path().join("created.json");
        write_atomically(&created, "{}")?;
        assert_eq!(
            fs::metadata(&created)?.permissions().mode() & 0o777,
            fs::metadata(&reference)?.permissions().mode() & 0o777
        );

        let existing = tmp_dir.path().join("existing.json");
        fs::write(&existing, "old")?;
        fs::set_permissions(&existing, fs::Permissions::from_mode(0o640))?;
        write_atomically(&existing, "new")?;
        assert_eq!(fs::metadata(&existing)?.permissions().mode() & 0o777, 0o640);
        Ok(())
    }

    #[test]
    fn write_atomically_missing_directory() {
        let result = write_atomically(Path::new("does/not/exist/out.json"), "{}");
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn read_json_reports_path() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("broken.json");
        fs::write(&path, "{\"key\": ")?;

        let err = read_json(&path).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
        Ok(())
    }
}
