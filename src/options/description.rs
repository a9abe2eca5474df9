use serde::{Deserialize, Serialize};

/// Description of the RPC surface a service exposes
///
/// Only [`service_name`](Self::service_name) is interpreted here; the other
/// fields are carried for whoever announces the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescription {
    pub service_name: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub streams: Vec<String>,
    #[serde(default)]
    pub metadata: Option<String>,
}

impl ServiceDescription {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Self::default()
        }
    }

    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.methods.push(name.into());
        self
    }

    pub fn stream(mut self, name: impl Into<String>) -> Self {
        self.streams.push(name.into());
        self
    }

    pub fn metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}
