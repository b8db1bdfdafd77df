// Copyright 2025 RustFS Team
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
use std::path::{Path, PathBuf};

pub const DEFAULT_HELM_BINARY: &str = "helm";

/// Options applied to a single `helm template` invocation.
///
/// Values files are applied in order, so later files override earlier ones.
/// `set_values` and `set_string_values` are kept sorted so the generated
/// command line is stable across runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub values_files: Vec<PathBuf>,
    pub set_values: BTreeMap<String, String>,
    pub set_string_values: BTreeMap<String, String>,
    pub namespace: Option<String>,
    pub extra_args: Vec<String>,
    pub helm_binary: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            values_files: Vec::new(),
            set_values: BTreeMap::new(),
            set_string_values: BTreeMap::new(),
            namespace: None,
            extra_args: Vec::new(),
            helm_binary: DEFAULT_HELM_BINARY.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values_file(mut self, path: impl AsRef<Path>) -> Self {
        self.values_files.push(path.as_ref().to_path_buf());
        self
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_values.insert(key.into(), value.into());
        self
    }

    pub fn set_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_string_values.insert(key.into(), value.into());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    pub fn helm_binary(mut self, binary: impl Into<String>) -> Self {
        self.helm_binary = binary.into();
        self
    }

    /// Arguments that follow `helm template <release> <chart>`, without the `--show-only` flags.
    pub(crate) fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(ref ns) = self.namespace {
            args.push("--namespace".to_string());
            args.push(ns.clone());
        }

        for file in &self.values_files {
            args.push("-f".to_string());
            args.push(file.display().to_string());
        }

        for (key, value) in &self.set_values {
            args.push("--set".to_string());
            args.push(format!("{key}={value}"));
        }

        for (key, value) in &self.set_string_values {
            args.push("--set-string".to_string());
            args.push(format!("{key}={value}"));
        }

        args
    }
}

/// Parses a `key=value` override as accepted by `--set`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
