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

//! Helpers for preparing the data assets shipped with the Conseal
//! browser extension.
//!
//! Two independent batch jobs live here:
//!
//! * [`locales`] blanks the translator-only `description` fields in the
//!   `_locales` message files (binary `min-locales`).
//! * [`categories`] tags each entry of a ToS;DR service dump with a site
//!   category looked up by domain (binary `tosdr-combine`).

pub mod categories;
mod error;
pub mod json;
pub mod locales;

pub use error::{Error, Result};
