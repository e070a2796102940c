use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A process descriptor as returned by `data/get/descriptors`.
///
/// The engine controls the shape, so the only thing checked at the boundary
/// is that each entry is a JSON object. Known keys get typed accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessDescriptor(Map<String, Value>);

impl ProcessDescriptor {
    /// Build a minimal `{name, category}` descriptor.
    pub fn named(name: &str, category: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name.to_string()));
        fields.insert("category".to_string(), Value::String(category.to_string()));
        Self(fields)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.0.get("category").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Body for `POST /data/get/descriptors`.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorQuery {
    #[serde(rename = "@type")]
    pub model_type: String,
}

impl DescriptorQuery {
    pub fn processes() -> Self {
        Self {
            model_type: "Process".to_string(),
        }
    }
}

/// JSON-RPC 2.0 request envelope accepted at the IPC server root.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: &str, params: impl Serialize) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.to_string(),
            params: serde_json::to_value(params).unwrap_or(Value::Null),
        }
    }

    /// The fixed descriptor query used to check that the server answers.
    pub fn ping() -> Self {
        Self::new(1, "data/get/descriptors", DescriptorQuery::processes())
    }
}
