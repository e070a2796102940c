use std::collections::BTreeMap;

use serde::Serialize;

use openlca_client::ProcessDescriptor;

/// Where a dataset listing comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Builtin,
    OpenLca,
    Ecoinvent,
    Indian,
}

impl SourceId {
    /// Exact, case-sensitive match. Anything unrecognized is `Builtin`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "openlca" => SourceId::OpenLca,
            "ecoinvent" => SourceId::Ecoinvent,
            "indian" => SourceId::Indian,
            _ => SourceId::Builtin,
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            SourceId::Builtin => "builtin",
            SourceId::OpenLca => "openlca",
            SourceId::Ecoinvent => "ecoinvent",
            SourceId::Indian => "indian",
        };
        f.write_str(tag)
    }
}

/// Uniform response for every dataset-facing endpoint.
///
/// A failed envelope carries only `success` and `message`. `total_processes`
/// is the real size of the listing and can exceed `processes.len()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processes: Option<Vec<ProcessDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_processes: Option<usize>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<BTreeMap<String, String>>,
}

impl DatasetEnvelope {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            source: None,
            database: None,
            processes: None,
            total_processes: None,
            message: message.into(),
            databases: None,
            note: None,
            coverage: None,
        }
    }

    pub fn loaded(
        source: SourceId,
        database: impl Into<String>,
        processes: Vec<ProcessDescriptor>,
        total_processes: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            source: Some(source),
            database: Some(database.into()),
            processes: Some(processes),
            total_processes: Some(total_processes),
            message: message.into(),
            databases: None,
            note: None,
            coverage: None,
        }
    }

    /// The engine answered but there is nothing to list from it.
    pub fn connected_without_database(databases: Vec<String>) -> Self {
        Self {
            success: true,
            source: Some(SourceId::OpenLca),
            databases: Some(databases),
            ..Self::failure("OpenLCA connected but no active database")
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_coverage(mut self, coverage: &[(&str, &str)]) -> Self {
        self.coverage = Some(
            coverage
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }
}

/// Body of `/api/check-openlca`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EngineStatus {
    pub fn available(databases: Vec<String>) -> Self {
        Self {
            available: true,
            count: Some(databases.len()),
            databases: Some(databases),
            message: None,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            available: false,
            databases: None,
            count: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn source_tags_are_exact_and_case_sensitive() {
        assert_eq!(SourceId::from_tag("openlca"), SourceId::OpenLca);
        assert_eq!(SourceId::from_tag("ecoinvent"), SourceId::Ecoinvent);
        assert_eq!(SourceId::from_tag("indian"), SourceId::Indian);
        assert_eq!(SourceId::from_tag("OpenLCA"), SourceId::Builtin);
        assert_eq!(SourceId::from_tag(" indian"), SourceId::Builtin);
        assert_eq!(SourceId::from_tag(""), SourceId::Builtin);
        assert_eq!(SourceId::from_tag("indian").to_string(), "indian");
    }

    #[test]
    fn failure_serializes_success_and_message_only() {
        let body = serde_json::to_value(DatasetEnvelope::failure("Could not connect to OpenLCA")).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "Could not connect to OpenLCA"})
        );
    }

    #[test]
    fn connected_without_database_shape() {
        let body =
            serde_json::to_value(DatasetEnvelope::connected_without_database(vec![])).unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "source": "openlca",
                "databases": [],
                "message": "OpenLCA connected but no active database"
            })
        );
    }

    #[test]
    fn engine_status_counts_databases() {
        let body = serde_json::to_value(EngineStatus::available(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(body, json!({"available": true, "databases": ["a", "b"], "count": 2}));
    }
}
