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

//! Decoding of `helm template` output into Kubernetes objects.
//!
//! Helm separates documents with `---` and prefixes each one with a
//! `# Source:` comment, so empty documents are expected and skipped.

use crate::error::{
    DecodeSnafu, EmptyRenderSnafu, MissingKindSnafu, MultipleDocumentsSnafu, Result,
};
use k8s_openapi::api::apps::v1 as appsv1;
use k8s_openapi::api::batch::v1 as batchv1;
use k8s_openapi::api::core::v1 as corev1;
use kube::core::TypeMeta;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml_ng::Value;
use snafu::{OptionExt, ResultExt};
use tracing::debug;

/// One non-empty document of a rendered chart.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedObject {
    pub types: TypeMeta,
    pub name: Option<String>,
    value: Value,
}

impl RenderedObject {
    pub fn kind(&self) -> &str {
        &self.types.kind
    }

    pub fn api_version(&self) -> &str {
        &self.types.api_version
    }

    /// Name used in diagnostics: `Kind/name`, or just the kind for unnamed objects.
    pub fn display_name(&self) -> String {
        match self.name {
            Some(ref name) => format!("{}/{}", self.types.kind, name),
            None => self.types.kind.clone(),
        }
    }

    /// Decodes the document into a typed resource.
    ///
    /// `k8s-openapi` resources check `apiVersion` and `kind` while
    /// deserializing, so decoding into the wrong resource type fails.
    pub fn decode<K: DeserializeOwned>(&self) -> Result<K> {
        serde_yaml_ng::from_value(self.value.clone()).context(DecodeSnafu)
    }

    /// Decodes built-in workload and config kinds into their `k8s-openapi`
    /// type so that shape errors (wrong field types, bad nesting) surface as
    /// [`Error::Decode`](crate::Error::Decode).
    ///
    /// Returns `false` for kinds without a typed counterpart here, such as
    /// custom resources, which are only checked at the `TypeMeta` level.
    pub fn validate_shape(&self) -> Result<bool> {
        match (self.api_version(), self.kind()) {
            ("apps/v1", "StatefulSet") => self.decoded_as::<appsv1::StatefulSet>(),
            ("apps/v1", "Deployment") => self.decoded_as::<appsv1::Deployment>(),
            ("apps/v1", "DaemonSet") => self.decoded_as::<appsv1::DaemonSet>(),
            ("batch/v1", "Job") => self.decoded_as::<batchv1::Job>(),
            ("batch/v1", "CronJob") => self.decoded_as::<batchv1::CronJob>(),
            ("v1", "Pod") => self.decoded_as::<corev1::Pod>(),
            ("v1", "Service") => self.decoded_as::<corev1::Service>(),
            ("v1", "ServiceAccount") => self.decoded_as::<corev1::ServiceAccount>(),
            ("v1", "ConfigMap") => self.decoded_as::<corev1::ConfigMap>(),
            ("v1", "Secret") => self.decoded_as::<corev1::Secret>(),
            ("v1", "PersistentVolumeClaim") => {
                self.decoded_as::<corev1::PersistentVolumeClaim>()
            }
            (api_version, kind) => {
                debug!("no typed decoder for {api_version} {kind}, skipping shape check");
                Ok(false)
            }
        }
    }

    fn decoded_as<K: DeserializeOwned>(&self) -> Result<bool> {
        self.decode::<K>().map(|_| true)
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(&self.value).context(DecodeSnafu)
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.value)?)
    }

    fn from_value(index: usize, value: Value) -> Result<Self> {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .context(MissingKindSnafu { index })?
            .to_string();
        let api_version = value
            .get("apiVersion")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let name = value
            .get("metadata")
            .and_then(|metadata| metadata.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            types: TypeMeta { api_version, kind },
            name,
            value,
        })
    }
}

/// Splits a rendered YAML stream into its non-empty documents.
pub fn split_documents(yaml: &str) -> Result<Vec<RenderedObject>> {
    let mut objects = Vec::new();

    for document in serde_yaml_ng::Deserializer::from_str(yaml) {
        let value = Value::deserialize(document).context(DecodeSnafu)?;
        if value.is_null() {
            continue;
        }
        objects.push(RenderedObject::from_value(objects.len(), value)?);
    }

    Ok(objects)
}

/// Decodes a render that must contain exactly one document.
pub fn single_document(yaml: &str) -> Result<RenderedObject> {
    let mut objects = split_documents(yaml)?;
    match objects.len() {
        0 => EmptyRenderSnafu.fail(),
        1 => objects.pop().context(EmptyRenderSnafu),
        count => MultipleDocumentsSnafu { count }.fail(),
    }
}

/// Decodes a single-document render straight into a typed resource.
pub fn unmarshal_k8s_yaml<K: DeserializeOwned>(yaml: &str) -> Result<K> {
    single_document(yaml)?.decode()
}
