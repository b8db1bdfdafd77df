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

use crate::error::{
    ChartNotFoundSnafu, ListTemplatesSnafu, ParseChartMetadataSnafu, ReadChartMetadataSnafu,
    Result, TemplateNotFoundSnafu,
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::path::{Component, Path, PathBuf};
use strum::Display;

pub const CHART_FILE: &str = "Chart.yaml";

/// Chart type as declared in `Chart.yaml`.
#[derive(Default, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[strum(to_string = "application")]
    #[default]
    Application,

    #[strum(to_string = "library")]
    Library,
}

/// The subset of `Chart.yaml` the render tests care about.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub api_version: String,
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, rename = "type")]
    pub chart_type: ChartType,
}

#[derive(Clone, Debug)]
pub struct Chart {
    root: PathBuf,
    metadata: ChartMetadata,
}

impl Chart {
    /// Opens the chart rooted at `root`, which must contain a readable `Chart.yaml`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.is_dir() {
            return ChartNotFoundSnafu {
                path: root,
                reason: "not a directory",
            }
            .fail();
        }

        let chart_file = root.join(CHART_FILE);
        if !chart_file.is_file() {
            return ChartNotFoundSnafu {
                path: root,
                reason: format!("missing {CHART_FILE}"),
            }
            .fail();
        }

        let raw = std::fs::read_to_string(&chart_file).context(ReadChartMetadataSnafu {
            path: chart_file.clone(),
        })?;
        let metadata: ChartMetadata =
            serde_yaml_ng::from_str(&raw).context(ParseChartMetadataSnafu { path: chart_file })?;

        Ok(Self { root, metadata })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn metadata(&self) -> &ChartMetadata {
        &self.metadata
    }

    /// Resolves a chart-relative template path such as `templates/statefulset.yaml`.
    ///
    /// Absolute paths and paths escaping the chart root are rejected the same
    /// way as missing files, since helm would not find them either.
    pub fn template_path(&self, template: &str) -> Result<PathBuf> {
        let relative = Path::new(template);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        let full = self.root.join(relative);
        if escapes || !full.is_file() {
            return TemplateNotFoundSnafu {
                chart: self.root.clone(),
                template,
            }
            .fail();
        }

        Ok(full)
    }

    /// Lists the renderable templates under `templates/`, skipping partials (`_*.tpl`) and notes.
    pub fn templates(&self) -> Result<Vec<String>> {
        let dir = self.root.join("templates");
        let entries = std::fs::read_dir(&dir).context(ListTemplatesSnafu { path: dir.clone() })?;

        let mut templates: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !name.starts_with('_') && name != "NOTES.txt")
            .filter(|name| name.ends_with(".yaml") || name.ends_with(".yml"))
            .map(|name| format!("templates/{name}"))
            .collect();
        templates.sort();

        Ok(templates)
    }
}
