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

//! Add a `category` to every service in a ToS;DR dump.
//!
//! Reads the domain categories from `categorised_dataset.txt` and the
//! services from `dump.json`, then writes the annotated services to
//! `dump_with_categories.json`. Services without a known domain get
//! the category `unknown`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use conseal_data_tools::categories::{
    combine, DEFAULT_DATASET_FILE, DEFAULT_DUMP_FILE, DEFAULT_OUTPUT_FILE,
};
use log::info;

#[derive(Debug, Parser)]
#[command(about = "Merge domain categories into a ToS;DR dump")]
struct Cli {
    /// CSV file with `domain` and `iab_tier2` columns.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_DATASET_FILE)]
    dataset: PathBuf,
    /// JSON array of services, each with a comma-separated `url`.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_DUMP_FILE)]
    dump: PathBuf,
    /// Where to write the annotated services.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,
}

#[allow(clippy::print_stdout)]
fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();

    let summary = combine(&cli.dataset, &cli.dump, &cli.output).with_context(|| {
        format!(
            "Could not merge {} into {}",
            cli.dataset.display(),
            cli.dump.display()
        )
    })?;
    info!(
        "Categorised {} of {} entries ({} unknown)",
        summary.matched, summary.entries, summary.unknown
    );
    println!("Updated file written to {}", cli.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_paths() {
        let cli = Cli::try_parse_from(["tosdr-combine"]).unwrap();
        assert_eq!(cli.dataset, PathBuf::from("categorised_dataset.txt"));
        assert_eq!(cli.dump, PathBuf::from("dump.json"));
        assert_eq!(cli.output, PathBuf::from("dump_with_categories.json"));
    }

    #[test]
    fn test_path_overrides() {
        let cli = Cli::try_parse_from([
            "tosdr-combine",
            "--dump",
            "data/services.json",
            "--output",
            "data/out.json",
        ])
        .unwrap();
        assert_eq!(cli.dataset, PathBuf::from("categorised_dataset.txt"));
        assert_eq!(cli.dump, PathBuf::from("data/services.json"));
        assert_eq!(cli.output, PathBuf::from("data/out.json"));
    }
}
