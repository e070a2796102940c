//! Connectivity checks against the OpenLCA IPC server.
//!
//! The probe sends the same JSON-RPC descriptor query the desktop tool
//! answers when its IPC server is running. The auxiliary reads never fail:
//! any error is logged and turned into an empty result.

pub mod report;

use serde_json::Value;
use tracing::warn;

use openlca_client::{JsonRpcRequest, OpenLcaClient, OpenLcaError, ProcessDescriptor, PING_TIMEOUT};

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Connected,
    /// The server answered, but not with a usable reply.
    BadStatus(u16),
    /// Nothing is listening, or it did not answer in time.
    Unreachable(String),
    Failed(String),
}

impl ProbeOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, ProbeOutcome::Connected)
    }
}

pub async fn probe(client: &OpenLcaClient) -> ProbeOutcome {
    match client.json_rpc(&JsonRpcRequest::ping(), PING_TIMEOUT).await {
        Ok(body) => interpret_reply(&body),
        Err(OpenLcaError::Api { status, .. }) => ProbeOutcome::BadStatus(status),
        Err(OpenLcaError::Unreachable(detail)) => ProbeOutcome::Unreachable(detail),
        Err(e) => ProbeOutcome::Failed(e.to_string()),
    }
}

/// A 200 reply counts as connected if it carries a `result`, or at least no `error`.
pub fn interpret_reply(body: &Value) -> ProbeOutcome {
    if body.get("result").is_some() || body.get("error").is_none() {
        ProbeOutcome::Connected
    } else {
        ProbeOutcome::BadStatus(200)
    }
}

pub async fn get_database_info(client: &OpenLcaClient, name: &str) -> Option<Value> {
    match client.database_info(name).await {
        Ok(info) => Some(info),
        Err(e) => {
            warn!(database = name, error = %e, "Error getting database info");
            None
        }
    }
}

/// Fetch all process descriptors and print the first `limit` names.
pub async fn list_processes(client: &OpenLcaClient, limit: usize) -> Vec<ProcessDescriptor> {
    match client.process_descriptors().await {
        Ok(processes) => {
            report::print_process_list(&processes, limit);
            processes
        }
        Err(e) => {
            warn!(error = %e, "Error listing processes");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_key_means_connected() {
        let reply = json!({"jsonrpc": "2.0", "id": 1, "result": []});
        assert!(interpret_reply(&reply).is_connected());
    }

    #[test]
    fn result_wins_over_error() {
        let reply = json!({"result": [], "error": null});
        assert!(interpret_reply(&reply).is_connected());
    }

    #[test]
    fn missing_error_is_connected() {
        assert!(interpret_reply(&json!({"jsonrpc": "2.0", "id": 1})).is_connected());
    }

    #[test]
    fn error_without_result_is_not_connected() {
        let reply = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32601, "message": "no such method"}});
        assert_eq!(interpret_reply(&reply), ProbeOutcome::BadStatus(200));
    }
}
