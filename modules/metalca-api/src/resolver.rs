use std::sync::Arc;

use tracing::{debug, info, warn};

use metalca_common::MetaLcaError;
use openlca_client::{LcaEngine, OpenLcaError, DATABASES_TIMEOUT};

use crate::catalog;
use crate::envelope::{DatasetEnvelope, SourceId};

/// Descriptors returned to the caller from the engine. The envelope still
/// reports the full count.
pub const MAX_ENGINE_PROCESSES: usize = 100;

/// Turns a source tag into a dataset envelope.
///
/// Engine failures inside the `openlca` branch become `success: false`
/// envelopes. Only errors raised before anything reaches the engine are
/// returned as `Err`; the HTTP layer reports those as 500s.
pub struct DatasetResolver {
    engine: Arc<dyn LcaEngine>,
}

impl DatasetResolver {
    pub fn new(engine: Arc<dyn LcaEngine>) -> Self {
        Self { engine }
    }

    pub async fn resolve(&self, source: &str) -> Result<DatasetEnvelope, MetaLcaError> {
        let source = SourceId::from_tag(source);
        debug!(source = %source, "Resolving dataset");
        match source {
            SourceId::OpenLca => self.resolve_openlca().await,
            SourceId::Ecoinvent => Ok(catalog::ecoinvent()),
            SourceId::Indian => Ok(catalog::indian()),
            SourceId::Builtin => Ok(catalog::builtin()),
        }
    }

    async fn resolve_openlca(&self) -> Result<DatasetEnvelope, MetaLcaError> {
        let databases = match self.engine.fetch_databases(DATABASES_TIMEOUT).await {
            Ok(databases) => databases,
            Err(e) if e.is_request() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "OpenLCA database listing failed");
                return Ok(DatasetEnvelope::failure(engine_failure_message(&e)));
            }
        };

        // No database selection: the first one the engine lists is used.
        let Some(database) = databases.first().cloned() else {
            return Ok(DatasetEnvelope::connected_without_database(databases));
        };

        match self.engine.fetch_process_descriptors().await {
            Ok(mut processes) => {
                let total = processes.len();
                processes.truncate(MAX_ENGINE_PROCESSES);
                info!(database = %database, total, "Loaded processes from OpenLCA");
                Ok(DatasetEnvelope::loaded(
                    SourceId::OpenLca,
                    database,
                    processes,
                    total,
                    format!("Loaded {total} processes from OpenLCA"),
                ))
            }
            Err(e) if e.is_request() => Err(e.into()),
            Err(e) => {
                warn!(database = %database, error = %e, "OpenLCA descriptor query failed");
                Ok(DatasetEnvelope::connected_without_database(databases))
            }
        }
    }
}

fn engine_failure_message(err: &OpenLcaError) -> String {
    match err {
        OpenLcaError::Api { .. } => "Could not connect to OpenLCA".to_string(),
        OpenLcaError::MalformedResponse(detail) => {
            format!("Malformed response from OpenLCA: {detail}")
        }
        _ => "OpenLCA is not running. Please start OpenLCA IPC Server.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use openlca_client::ProcessDescriptor;

    use super::*;

    type Reply<T> = fn() -> openlca_client::Result<T>;

    /// Engine with canned replies that counts how often it is called.
    struct ScriptedEngine {
        databases: Reply<Vec<String>>,
        descriptors: Reply<Vec<ProcessDescriptor>>,
        calls: AtomicUsize,
        timeouts: Mutex<Vec<Duration>>,
    }

    impl ScriptedEngine {
        fn new(databases: Reply<Vec<String>>, descriptors: Reply<Vec<ProcessDescriptor>>) -> Arc<Self> {
            Arc::new(Self {
                databases,
                descriptors,
                calls: AtomicUsize::new(0),
                timeouts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LcaEngine for ScriptedEngine {
        async fn fetch_databases(&self, timeout: Duration) -> openlca_client::Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.timeouts.lock().unwrap().push(timeout);
            (self.databases)()
        }

        async fn fetch_process_descriptors(&self) -> openlca_client::Result<Vec<ProcessDescriptor>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.descriptors)()
        }
    }

    fn unreachable<T>() -> openlca_client::Result<T> {
        Err(OpenLcaError::Unreachable("connection refused".into()))
    }

    fn one_database() -> openlca_client::Result<Vec<String>> {
        Ok(vec!["ecoinvent_391".into(), "elcd".into()])
    }

    fn many_processes() -> openlca_client::Result<Vec<ProcessDescriptor>> {
        Ok((0..250)
            .map(|i| ProcessDescriptor::named(&format!("process {i}"), "Materials"))
            .collect())
    }

    fn resolver(engine: &Arc<ScriptedEngine>) -> DatasetResolver {
        DatasetResolver::new(engine.clone())
    }

    #[tokio::test]
    async fn static_sources_never_touch_the_engine() {
        let engine = ScriptedEngine::new(unreachable, unreachable);
        let resolver = resolver(&engine);

        for source in ["builtin", "ecoinvent", "indian", "something-else"] {
            let envelope = resolver.resolve(source).await.unwrap();
            assert!(envelope.success, "{source} should succeed");
        }
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn ecoinvent_is_an_empty_licensed_placeholder() {
        let engine = ScriptedEngine::new(unreachable, unreachable);
        let envelope = resolver(&engine).resolve("ecoinvent").await.unwrap();

        assert_eq!(envelope.total_processes, Some(19000));
        assert_eq!(envelope.processes, Some(vec![]));
        assert!(envelope.note.is_some());
    }

    #[tokio::test]
    async fn indian_has_five_descriptors_and_coverage() {
        let engine = ScriptedEngine::new(unreachable, unreachable);
        let envelope = resolver(&engine).resolve("indian").await.unwrap();

        assert_eq!(envelope.processes.as_ref().map(Vec::len), Some(5));
        assert_eq!(envelope.total_processes, Some(500));
        let coverage = envelope.coverage.unwrap();
        let keys: Vec<&str> = coverage.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["energy", "materials", "transport"]);
    }

    #[tokio::test]
    async fn unknown_sources_resolve_like_builtin() {
        let engine = ScriptedEngine::new(unreachable, unreachable);
        let resolver = resolver(&engine);
        let builtin = resolver.resolve("builtin").await.unwrap();

        for source in ["", "Indian", "OPENLCA", "gabi"] {
            assert_eq!(resolver.resolve(source).await.unwrap(), builtin);
        }
        assert_eq!(builtin.total_processes, Some(1200));
        assert_eq!(builtin.processes.as_ref().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn openlca_truncates_but_reports_full_total() {
        let engine = ScriptedEngine::new(one_database, many_processes);
        let envelope = resolver(&engine).resolve("openlca").await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.source, Some(SourceId::OpenLca));
        assert_eq!(envelope.database.as_deref(), Some("ecoinvent_391"));
        assert_eq!(envelope.processes.as_ref().map(Vec::len), Some(MAX_ENGINE_PROCESSES));
        assert_eq!(envelope.total_processes, Some(250));
        assert_eq!(envelope.message, "Loaded 250 processes from OpenLCA");
        assert_eq!(*engine.timeouts.lock().unwrap(), vec![DATABASES_TIMEOUT]);
    }

    #[tokio::test]
    async fn openlca_unreachable_is_a_failed_envelope() {
        let engine = ScriptedEngine::new(unreachable, unreachable);
        let envelope = resolver(&engine).resolve("openlca").await.unwrap();

        assert!(!envelope.success);
        assert!(envelope.processes.is_none());
        assert_eq!(
            envelope.message,
            "OpenLCA is not running. Please start OpenLCA IPC Server."
        );
    }

    #[tokio::test]
    async fn openlca_non_200_databases() {
        let engine = ScriptedEngine::new(
            || Err(OpenLcaError::Api { status: 500, message: String::new() }),
            many_processes,
        );
        let envelope = resolver(&engine).resolve("openlca").await.unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.message, "Could not connect to OpenLCA");
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn openlca_malformed_databases() {
        let engine = ScriptedEngine::new(
            || Err(OpenLcaError::MalformedResponse("expected a sequence".into())),
            many_processes,
        );
        let envelope = resolver(&engine).resolve("openlca").await.unwrap();

        assert!(!envelope.success);
        assert!(envelope.message.starts_with("Malformed response from OpenLCA"));
    }

    #[tokio::test]
    async fn openlca_without_databases_is_connected() {
        let engine = ScriptedEngine::new(|| Ok(vec![]), many_processes);
        let envelope = resolver(&engine).resolve("openlca").await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.databases, Some(vec![]));
        assert_eq!(envelope.message, "OpenLCA connected but no active database");
        // The descriptor query is skipped entirely.
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn openlca_descriptor_failure_falls_back_to_connected() {
        let engine = ScriptedEngine::new(one_database, unreachable);
        let envelope = resolver(&engine).resolve("openlca").await.unwrap();

        assert!(envelope.success);
        assert_eq!(
            envelope.databases,
            Some(vec!["ecoinvent_391".to_string(), "elcd".to_string()])
        );
        assert!(envelope.processes.is_none());
    }

    #[tokio::test]
    async fn request_errors_escape_the_branch() {
        let engine = ScriptedEngine::new(
            || Err(OpenLcaError::Request("relative URL without a base".into())),
            many_processes,
        );
        let err = resolver(&engine).resolve("openlca").await.unwrap_err();

        assert!(matches!(err, MetaLcaError::Upstream(OpenLcaError::Request(_))));
    }
}
