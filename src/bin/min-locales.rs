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

//! Blank the `description` of every message in the extension's locale
//! files.
//!
//! Run from the repository root. Every `src/_locales/*/*.json` file is
//! rewritten in place with the descriptions set to `""`. The message
//! keys keep their order and all other fields are left alone.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use conseal_data_tools::locales::{minify_all, DEFAULT_LOCALES_DIR};
use log::info;

#[derive(Debug, Parser)]
#[command(about = "Strip translator descriptions from locale files")]
struct Cli {
    /// Directory with one sub-directory of JSON message files per locale.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_LOCALES_DIR)]
    locales_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();

    let summary = minify_all(&cli.locales_dir)
        .with_context(|| format!("Could not minify locales in {}", cli.locales_dir.display()))?;
    info!(
        "Blanked {} descriptions in {} locale files",
        summary.descriptions, summary.files
    );

    Ok(())
}
