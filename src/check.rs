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

use crate::decode::{RenderedObject, single_document};
use crate::error::{ApiVersionMismatchSnafu, KindMismatchSnafu, Result};
use crate::options::RenderOptions;
use crate::render::{HelmCli, Renderer, render_template_with};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn assert_kind(object: &RenderedObject, expected: &str) -> Result<()> {
    if object.kind() != expected {
        return KindMismatchSnafu {
            name: object.display_name(),
            expected,
            actual: object.kind(),
        }
        .fail();
    }
    Ok(())
}

/// Checks both the kind and the api version against a `k8s-openapi` resource type.
pub fn assert_resource<K: k8s_openapi::Resource>(object: &RenderedObject) -> Result<()> {
    assert_kind(object, K::KIND)?;

    if object.api_version() != K::API_VERSION {
        return ApiVersionMismatchSnafu {
            name: object.display_name(),
            expected: K::API_VERSION,
            actual: object.api_version(),
        }
        .fail();
    }
    Ok(())
}

/// Renders one template of a chart and asserts the kind of the resulting object.
///
/// The three steps (render, decode, assert) run in order and the first
/// failure is returned as is. Decoding goes through the typed `k8s-openapi`
/// resource for the rendered kind, so a document of the right kind but the
/// wrong shape fails with a decode error.
#[derive(Clone, Debug)]
pub struct ChartRenderTest {
    pub chart_path: PathBuf,
    pub release_name: String,
    pub template: String,
    pub options: RenderOptions,
    pub expected_kind: String,
}

impl ChartRenderTest {
    pub fn new(
        chart_path: impl AsRef<Path>,
        release_name: impl Into<String>,
        template: impl Into<String>,
        expected_kind: impl Into<String>,
    ) -> Self {
        Self {
            chart_path: chart_path.as_ref().to_path_buf(),
            release_name: release_name.into(),
            template: template.into(),
            options: RenderOptions::default(),
            expected_kind: expected_kind.into(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(&self) -> Result<RenderedObject> {
        self.run_with(&HelmCli)
    }

    pub fn run_with<R: Renderer + ?Sized>(&self, renderer: &R) -> Result<RenderedObject> {
        let object = self.render_object(renderer)?;
        object.validate_shape()?;
        assert_kind(&object, &self.expected_kind)?;

        info!(
            "{} rendered {} as expected",
            self.template,
            object.display_name()
        );
        Ok(object)
    }

    /// Runs the check against the resource type `K` and returns the decoded object.
    ///
    /// `expected_kind` is ignored in favor of `K::KIND`, and the api version is
    /// checked as well.
    pub fn run_typed<K>(&self) -> Result<K>
    where
        K: k8s_openapi::Resource + DeserializeOwned,
    {
        self.run_typed_with(&HelmCli)
    }

    pub fn run_typed_with<K, R>(&self, renderer: &R) -> Result<K>
    where
        K: k8s_openapi::Resource + DeserializeOwned,
        R: Renderer + ?Sized,
    {
        let object = self.render_object(renderer)?;
        assert_resource::<K>(&object)?;
        let resource = object.decode::<K>()?;

        info!("{} rendered {} as expected", self.template, object.display_name());
        Ok(resource)
    }

    fn render_object<R: Renderer + ?Sized>(&self, renderer: &R) -> Result<RenderedObject> {
        let output = render_template_with(
            renderer,
            &self.options,
            &self.chart_path,
            &self.release_name,
            &[self.template.as_str()],
        )?;

        single_document(&output)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::tests::{
        StubRenderer, icon_etl_chart_path, icon_etl_test_values, rendered_deployment,
        rendered_service, rendered_statefulset,
    };
    use k8s_openapi::api::apps::v1 as appsv1;
    use k8s_openapi::api::core::v1 as corev1;

    fn statefulset_test() -> ChartRenderTest {
        ChartRenderTest::new(
            icon_etl_chart_path(),
            "icon-etl",
            "templates/statefulset.yaml",
            "StatefulSet",
        )
        .with_options(RenderOptions::new().values_file(icon_etl_test_values()))
    }

    #[test]
    fn test_statefulset_kind_passes() {
        let renderer = StubRenderer::ok(&rendered_statefulset());
        let object = statefulset_test()
            .run_with(&renderer)
            .expect("statefulset template should pass");

        assert_eq!(object.kind(), "StatefulSet");
        let statefulset: appsv1::StatefulSet = object.decode().unwrap();
        assert_eq!(statefulset.metadata.name.as_deref(), Some("icon-etl"));
    }

    #[test]
    fn test_deployment_kind_fails_assertion() {
        let renderer = StubRenderer::ok(&rendered_deployment());
        let err = statefulset_test()
            .run_with(&renderer)
            .expect_err("a Deployment must not satisfy a StatefulSet check");

        assert!(err.is_assertion_failure());
        match err {
            Error::KindMismatch {
                ref expected,
                ref actual,
                ..
            } => {
                assert_eq!(expected, "StatefulSet");
                assert_eq!(actual, "Deployment");
            }
            ref other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            err.to_string(),
            "Failed to render Deployment/icon-etl: expected kind 'StatefulSet', got 'Deployment'"
        );
    }

    #[test]
    fn test_missing_template_aborts_before_assertion() {
        let renderer = StubRenderer::ok(&rendered_statefulset());
        let mut check = statefulset_test();
        check.template = "templates/missing.yaml".to_string();

        let err = check.run_with(&renderer).expect_err("missing template");
        assert!(err.is_render_failure());
        assert!(!err.is_assertion_failure());
    }

    #[test]
    fn test_render_failure_aborts_before_decode() {
        let renderer = StubRenderer::failing(1, "Error: parse error in statefulset.yaml");
        let err = statefulset_test()
            .run_with(&renderer)
            .expect_err("helm failure");
        assert!(matches!(err, Error::RenderFailed { .. }));
    }

    #[test]
    fn test_malformed_render_fails_decode() {
        let renderer = StubRenderer::ok("kind: StatefulSet\n  bad: indentation\n");
        let err = statefulset_test()
            .run_with(&renderer)
            .expect_err("malformed output");
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_shape_invalid_statefulset_fails_decode() {
        let yaml = rendered_statefulset().replace("replicas: 1", "replicas: not-a-number");
        let renderer = StubRenderer::ok(&yaml);

        let err = statefulset_test()
            .run_with(&renderer)
            .expect_err("replicas must decode as an integer");
        assert!(matches!(err, Error::Decode { .. }));
        assert!(!err.is_assertion_failure());
    }

    #[test]
    fn test_run_typed_returns_statefulset() {
        let renderer = StubRenderer::ok(&rendered_statefulset());
        let statefulset: appsv1::StatefulSet = statefulset_test()
            .run_typed_with(&renderer)
            .expect("typed statefulset check should pass");

        let spec = statefulset.spec.expect("StatefulSet should have spec");
        assert_eq!(spec.service_name.as_deref(), Some("icon-etl"));
    }

    #[test]
    fn test_run_typed_rejects_shape_invalid_statefulset() {
        let yaml = rendered_statefulset().replace("replicas: 1", "replicas: not-a-number");
        let renderer = StubRenderer::ok(&yaml);

        let err = statefulset_test()
            .run_typed_with::<appsv1::StatefulSet, _>(&renderer)
            .expect_err("shape error");
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_run_typed_reports_kind_mismatch() {
        let renderer = StubRenderer::ok(&rendered_deployment());
        let err = statefulset_test()
            .run_typed_with::<appsv1::StatefulSet, _>(&renderer)
            .expect_err("a Deployment is not a StatefulSet");
        assert!(matches!(err, Error::KindMismatch { .. }));
    }

    #[test]
    fn test_assert_resource_checks_api_version() {
        let object = single_document(&rendered_statefulset()).unwrap();
        assert_resource::<appsv1::StatefulSet>(&object).expect("apps/v1 StatefulSet");

        let err = assert_resource::<corev1::Service>(&object).expect_err("not a Service");
        assert!(matches!(err, Error::KindMismatch { .. }));

        let legacy =
            rendered_statefulset().replace("apiVersion: apps/v1", "apiVersion: apps/v1beta2");
        let object = single_document(&legacy).unwrap();
        let err = assert_resource::<appsv1::StatefulSet>(&object).expect_err("old api version");
        assert!(matches!(err, Error::ApiVersionMismatch { .. }));
    }

    #[test]
    fn test_assert_kind_on_service() {
        let object = single_document(&rendered_service()).unwrap();
        assert!(assert_kind(&object, "Service").is_ok());
        assert!(assert_kind(&object, "StatefulSet").is_err());
    }
}
