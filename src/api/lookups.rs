use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Value;

use super::ApiClient;
use crate::error::ClientError;

/// Enumerations shown on the constant data page: (key, label, endpoint name)
pub const CONSTANT_ENUMS: &[(&str, &str, &str)] = &[
    ("status", "Status", "status"),
    ("positionStatus", "Position Status", "position-status"),
    ("maritalStatus", "Marital Status", "marital-status"),
    ("gender", "Gender", "gender"),
    ("employmentStatus", "Employment Status", "employment-status"),
    ("contractType", "Contract Type", "contract-type"),
    ("centerType", "Center Type", "center-type"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumTable {
    pub key: String,
    pub label: String,
    pub rows: Vec<Value>,
}

impl EnumTable {
    /// Column names taken from the first row
    pub fn columns(&self) -> Vec<String> {
        match self.rows.first() {
            Some(Value::Object(obj)) => obj.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

pub struct Lookups<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn lookups(&self) -> Lookups<'_> {
        Lookups { client: self }
    }
}

impl Lookups<'_> {
    /// `GET /api/lookups/enums/{name}`; a non-array answer is treated as empty
    pub async fn enumeration(&self, name: &str) -> Result<Vec<Value>, ClientError> {
        let path = format!("/api/lookups/enums/{}", name);
        let fallback = format!("Failed to fetch {}", name);
        match self.client.get_json::<Value>(&path, &[], &fallback).await? {
            Value::Array(items) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    /// All constant enumerations, fetched concurrently. One failure fails the batch.
    pub async fn constant_data(&self) -> Result<Vec<EnumTable>, ClientError> {
        let requests = CONSTANT_ENUMS.iter().map(|(key, label, name)| async move {
            let rows = self.enumeration(name).await.map_err(|e| {
                tracing::warn!("Failed to fetch {}: {}", label, e);
                e
            })?;
            Ok::<_, ClientError>(EnumTable {
                key: key.to_string(),
                label: label.to_string(),
                rows,
            })
        });
        try_join_all(requests).await
    }
}
