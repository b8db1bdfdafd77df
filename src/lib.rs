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

//! Render templates of the `icon-etl` Helm chart and check the objects they produce.
//!
//! ```no_run
//! use icon_etl_chart::{ChartRenderTest, RenderOptions};
//!
//! let object = ChartRenderTest::new("charts/icon-etl", "icon-etl", "templates/statefulset.yaml", "StatefulSet")
//!     .with_options(RenderOptions::new().values_file("charts/icon-etl/deployments/test/values.test.yaml"))
//!     .run()?;
//! assert_eq!(object.kind(), "StatefulSet");
//! # Ok::<(), icon_etl_chart::Error>(())
//! ```

pub mod chart;
pub mod check;
pub mod decode;
pub mod error;
pub mod options;
pub mod render;


pub use chart::Chart;
pub use check::{ChartRenderTest, assert_kind, assert_resource};
pub use decode::{RenderedObject, single_document, split_documents, unmarshal_k8s_yaml};
pub use error::{Error, Result};
pub use options::RenderOptions;
pub use render::{HelmCli, HelmOutput, Renderer, render_template, render_template_with};

/// Installs the fmt subscriber used by the CLI. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
