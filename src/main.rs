// Copyright 2024 RustFS Team
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

use clap::{Args, Parser, Subcommand, ValueEnum};
use icon_etl_chart::options::{DEFAULT_HELM_BINARY, parse_key_value};
use icon_etl_chart::{Chart, ChartRenderTest, RenderOptions, render_template, split_documents};
use shadow_rs::shadow;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

shadow!(build);

#[derive(Parser)]
#[command(name = "icon-etl-chart")]
#[command(about = "Render and check the icon-etl Helm chart", long_about = None)]
#[command(version, long_version = build::CLAP_LONG_VERSION)]
struct Cli {
    /// Helm executable used for rendering
    #[arg(long, global = true, env = "HELM_BINARY", default_value = DEFAULT_HELM_BINARY)]
    helm_binary: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ChartArgs {
    /// Chart root directory
    #[arg(long, default_value = "charts/icon-etl")]
    chart: PathBuf,

    /// Release name passed to helm
    #[arg(long, default_value = "icon-etl")]
    release: String,

    /// Values files, applied in order
    #[arg(short = 'f', long = "values")]
    values: Vec<PathBuf>,

    /// Value overrides (KEY=VALUE)
    #[arg(long = "set", value_parser = parse_key_value)]
    set: Vec<(String, String)>,

    /// String value overrides (KEY=VALUE)
    #[arg(long = "set-string", value_parser = parse_key_value)]
    set_string: Vec<(String, String)>,

    #[arg(short, long)]
    namespace: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render templates and print the decoded objects
    Render {
        #[command(flatten)]
        chart: ChartArgs,

        /// Templates to render, relative to the chart root
        #[arg(long = "show-only", required = true)]
        show_only: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },

    /// Render one template and check the kind of the object it produces
    Check {
        #[command(flatten)]
        chart: ChartArgs,

        #[arg(long, default_value = "templates/statefulset.yaml")]
        template: String,

        #[arg(long, default_value = "StatefulSet")]
        kind: String,
    },

    /// List the renderable templates of a chart
    Templates {
        #[arg(long, default_value = "charts/icon-etl")]
        chart: PathBuf,
    },
}

impl ChartArgs {
    fn render_options(&self, helm_binary: &str) -> RenderOptions {
        let mut options = RenderOptions::new().helm_binary(helm_binary);
        for file in &self.values {
            options = options.values_file(file);
        }
        for (key, value) in &self.set {
            options = options.set(key, value);
        }
        for (key, value) in &self.set_string {
            options = options.set_string(key, value);
        }
        if let Some(ref ns) = self.namespace {
            options = options.namespace(ns);
        }
        options
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Render {
            chart,
            show_only,
            output,
        } => {
            let options = chart.render_options(&cli.helm_binary);
            let templates: Vec<&str> = show_only.iter().map(String::as_str).collect();
            let rendered = render_template(&options, &chart.chart, &chart.release, &templates)?;
            let objects = split_documents(&rendered)?;

            match output {
                OutputFormat::Yaml => {
                    for object in &objects {
                        print!("---\n{}", object.to_yaml()?);
                    }
                }
                OutputFormat::Json => {
                    let values = objects
                        .iter()
                        .map(|o| o.to_json())
                        .collect::<Result<Vec<_>, _>>()?;
                    println!("{}", serde_json::to_string_pretty(&values)?);
                }
            }
        }
        Commands::Check {
            chart,
            template,
            kind,
        } => {
            let options = chart.render_options(&cli.helm_binary);
            let object = ChartRenderTest::new(&chart.chart, &chart.release, template, kind)
                .with_options(options)
                .run()?;
            println!("ok: {}", object.display_name());
        }
        Commands::Templates { chart } => {
            let chart = Chart::open(&chart)?;
            let metadata = chart.metadata();
            info!(
                "{} {} ({} chart)",
                metadata.name, metadata.version, metadata.chart_type
            );
            for template in chart.templates()? {
                println!("{template}");
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    icon_etl_chart::init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_output_format_parsed_by_value_enum() {
        let cli = Cli::try_parse_from([
            "icon-etl-chart",
            "render",
            "--show-only",
            "templates/statefulset.yaml",
            "--output",
            "json",
        ])
        .expect("render args should parse");

        match cli.command {
            Commands::Render { output, .. } => assert!(matches!(output, OutputFormat::Json)),
            _ => panic!("expected render subcommand"),
        }
    }

    #[test]
    fn test_render_output_defaults_to_yaml_and_rejects_unknown() {
        let cli = Cli::try_parse_from([
            "icon-etl-chart",
            "render",
            "--show-only",
            "templates/service.yaml",
        ])
        .expect("render args should parse");
        match cli.command {
            Commands::Render { output, .. } => assert!(matches!(output, OutputFormat::Yaml)),
            _ => panic!("expected render subcommand"),
        }

        let err = Cli::try_parse_from([
            "icon-etl-chart",
            "render",
            "--show-only",
            "templates/service.yaml",
            "--output",
            "toml",
        ]);
        assert!(err.is_err(), "only yaml and json are accepted");
    }

    #[test]
    fn test_check_args_build_render_options() {
        let cli = Cli::try_parse_from([
            "icon-etl-chart",
            "--helm-binary",
            "/usr/local/bin/helm",
            "check",
            "-f",
            "charts/icon-etl/deployments/test/values.test.yaml",
            "--set",
            "replicaCount=2",
        ])
        .expect("check args should parse");

        match cli.command {
            Commands::Check {
                chart, template, kind, ..
            } => {
                let options = chart.render_options(&cli.helm_binary);
                assert_eq!(options.helm_binary, "/usr/local/bin/helm");
                assert_eq!(options.values_files.len(), 1);
                assert_eq!(
                    options.set_values.get("replicaCount").map(String::as_str),
                    Some("2")
                );
                assert_eq!(template, "templates/statefulset.yaml");
                assert_eq!(kind, "StatefulSet");
            }
            _ => panic!("expected check subcommand"),
        }
    }
}
