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

use crate::chart::Chart;
use crate::error::{
    HelmSpawnSnafu, NoTemplatesSnafu, RenderFailedSnafu, Result, ValuesFileNotFoundSnafu,
};
use crate::options::RenderOptions;
use snafu::ResultExt;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// Captured result of one helm invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HelmOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs a helm command line. Split out so the render pipeline can be driven
/// without a helm install.
pub trait Renderer {
    fn run(&self, program: &str, args: &[String]) -> Result<HelmOutput>;
}

/// Invokes the helm binary as a blocking child process.
#[derive(Clone, Copy, Debug, Default)]
pub struct HelmCli;

impl Renderer for HelmCli {
    fn run(&self, program: &str, args: &[String]) -> Result<HelmOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .context(HelmSpawnSnafu { program })?;

        Ok(HelmOutput {
            status: output.status.code().unwrap_or(1),
            stdout: normalize_line_endings(&String::from_utf8_lossy(&output.stdout)),
            stderr: normalize_line_endings(&String::from_utf8_lossy(&output.stderr)),
        })
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Builds the full `helm template` argument list.
pub fn template_args(
    options: &RenderOptions,
    chart_path: &Path,
    release_name: &str,
    templates: &[&str],
) -> Vec<String> {
    let mut args = vec![
        "template".to_string(),
        release_name.to_string(),
        chart_path.display().to_string(),
    ];
    args.extend(options.to_args());

    for template in templates {
        args.push("--show-only".to_string());
        args.push((*template).to_string());
    }

    args.extend(options.extra_args.iter().cloned());
    args
}

/// Renders `templates` of the chart at `chart_path` with the helm binary.
pub fn render_template(
    options: &RenderOptions,
    chart_path: impl AsRef<Path>,
    release_name: &str,
    templates: &[&str],
) -> Result<String> {
    render_template_with(&HelmCli, options, chart_path, release_name, templates)
}

/// Same as [`render_template`] with an explicit [`Renderer`].
///
/// Inputs are checked on disk first so a missing chart, values file or
/// template is reported precisely instead of through helm's stderr.
pub fn render_template_with<R: Renderer + ?Sized>(
    renderer: &R,
    options: &RenderOptions,
    chart_path: impl AsRef<Path>,
    release_name: &str,
    templates: &[&str],
) -> Result<String> {
    let chart = Chart::open(chart_path.as_ref())?;

    if templates.is_empty() {
        return NoTemplatesSnafu {
            release: release_name,
        }
        .fail();
    }

    for file in &options.values_files {
        if !file.is_file() {
            return ValuesFileNotFoundSnafu { path: file.clone() }.fail();
        }
    }

    for template in templates {
        chart.template_path(template)?;
    }

    let args = template_args(options, chart.root(), release_name, templates);
    debug!("running {} {}", options.helm_binary, args.join(" "));

    let output = renderer.run(&options.helm_binary, &args)?;
    if output.status != 0 {
        return RenderFailedSnafu {
            status: output.status,
            stderr: output.stderr,
        }
        .fail();
    }

    if !output.stderr.trim().is_empty() {
        warn!("helm template stderr: {}", output.stderr.trim());
    }

    info!(
        "rendered {} template(s) of chart {} as release {}",
        templates.len(),
        chart.name(),
        release_name
    );

    Ok(output.stdout)
}
