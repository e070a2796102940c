// Trait boundary over the external engine.
//
// The web backend talks to OpenLCA through LcaEngine so route and resolver
// tests can run against an in-memory engine.

use std::time::Duration;

use async_trait::async_trait;

use crate::{OpenLcaClient, ProcessDescriptor, Result};

#[async_trait]
pub trait LcaEngine: Send + Sync {
    /// Names of the databases the engine knows about.
    async fn fetch_databases(&self, timeout: Duration) -> Result<Vec<String>>;

    /// Process descriptors of the engine's active database.
    async fn fetch_process_descriptors(&self) -> Result<Vec<ProcessDescriptor>>;
}

#[async_trait]
impl LcaEngine for OpenLcaClient {
    async fn fetch_databases(&self, timeout: Duration) -> Result<Vec<String>> {
        self.databases(timeout).await
    }

    async fn fetch_process_descriptors(&self) -> Result<Vec<ProcessDescriptor>> {
        self.process_descriptors().await
    }
}
