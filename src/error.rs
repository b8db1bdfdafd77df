// Copyright 2025 RustFS Team
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

use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("chart not found at '{}': {}", path.display(), reason))]
    ChartNotFound { path: PathBuf, reason: String },

    #[snafu(display("cannot read '{}': {}", path.display(), source))]
    ReadChartMetadata {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("malformed chart metadata '{}': {}", path.display(), source))]
    ParseChartMetadata {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[snafu(display("cannot list templates of chart '{}': {}", path.display(), source))]
    ListTemplates {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("values file '{}' does not exist", path.display()))]
    ValuesFileNotFound { path: PathBuf },

    #[snafu(display("template '{}' not found in chart '{}'", template, chart.display()))]
    TemplateNotFound { chart: PathBuf, template: String },

    #[snafu(display("no templates requested for release '{}'", release))]
    NoTemplates { release: String },

    #[snafu(display("failed to run '{}': {}", program, source))]
    HelmSpawn {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("helm template exited with status {}: {}", status, stderr.trim()))]
    RenderFailed { status: i32, stderr: String },

    #[snafu(display("failed to decode rendered yaml: {}", source))]
    Decode { source: serde_yaml_ng::Error },

    #[snafu(display("rendered document {} has no kind", index))]
    MissingKind { index: usize },

    #[snafu(display("rendered output contains no documents"))]
    EmptyRender,

    #[snafu(display("expected a single rendered document, found {}", count))]
    MultipleDocuments { count: usize },

    #[snafu(display(
        "Failed to render {}: expected kind '{}', got '{}'",
        name,
        expected,
        actual
    ))]
    KindMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[snafu(display(
        "Failed to render {}: expected apiVersion '{}', got '{}'",
        name,
        expected,
        actual
    ))]
    ApiVersionMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[snafu(display("serde_json error: {}", source))]
    Json { source: serde_json::Error },
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl Error {
    /// Errors raised before or while helm runs, as opposed to decoding and assertion failures.
    pub fn is_render_failure(&self) -> bool {
        matches!(
            self,
            Error::ChartNotFound { .. }
                | Error::ReadChartMetadata { .. }
                | Error::ParseChartMetadata { .. }
                | Error::ListTemplates { .. }
                | Error::ValuesFileNotFound { .. }
                | Error::TemplateNotFound { .. }
                | Error::NoTemplates { .. }
                | Error::HelmSpawn { .. }
                | Error::RenderFailed { .. }
        )
    }

    pub fn is_assertion_failure(&self) -> bool {
        matches!(
            self,
            Error::KindMismatch { .. } | Error::ApiVersionMismatch { .. }
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
