use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validate::FormCheck;
use super::{now_timestamp, ApiClient};
use crate::error::ClientError;

/// Code/name/status lookup record, shared by departments and job titles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CodedRecord {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

pub type Department = CodedRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodedForm {
    pub code: String,
    pub name: String,
    pub description: String,
    pub status: String,
}

impl Default for CodedForm {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            description: String::new(),
            status: "ACTIVE".to_string(),
        }
    }
}

impl From<&CodedRecord> for CodedForm {
    fn from(record: &CodedRecord) -> Self {
        Self {
            code: record.code.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            status: if record.status.is_empty() { "ACTIVE".to_string() } else { record.status.clone() },
        }
    }
}

impl CodedForm {
    pub fn validate(&self) -> Result<(), ClientError> {
        FormCheck::new()
            .required("code", &self.code, "Code is required")
            .required("name", &self.name, "Name is required")
            .required("status", &self.status, "Status is required")
            .finish()
    }

    pub(crate) fn to_record(&self, existing: Option<&CodedRecord>, acting: &str) -> CodedRecord {
        let now = now_timestamp();
        CodedRecord {
            id: existing.map(|r| r.id).unwrap_or(0),
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            status: self.status.clone(),
            created_at: Some(existing.and_then(|r| r.created_at.clone()).unwrap_or_else(|| now.clone())),
            updated_at: Some(now),
            created_by: Some(
                existing
                    .and_then(|r| r.created_by.clone())
                    .unwrap_or_else(|| acting.to_string()),
            ),
            updated_by: Some(acting.to_string()),
        }
    }
}

/// Case-insensitive match on name or code
pub fn search<'a>(records: &'a [CodedRecord], term: &str) -> Vec<&'a CodedRecord> {
    let term = term.trim().to_lowercase();
    records
        .iter()
        .filter(|r| term.is_empty() || r.name.to_lowercase().contains(&term) || r.code.to_lowercase().contains(&term))
        .collect()
}

/// Handle over a coded lookup collection such as `/api/departments`
pub struct CodedLookup<'a> {
    pub(crate) client: &'a ApiClient,
    pub(crate) path: &'static str,
    pub(crate) noun: &'static str,
    pub(crate) plural: &'static str,
}

impl ApiClient {
    pub fn departments(&self) -> CodedLookup<'_> {
        CodedLookup {
            client: self,
            path: "/api/departments",
            noun: "department",
            plural: "departments",
        }
    }
}

impl CodedLookup<'_> {
    pub async fn list(&self) -> Result<Vec<CodedRecord>, ClientError> {
        let fallback = format!("Failed to load {}. Please try again.", self.plural);
        self.client.get_list(self.path, &fallback).await
    }

    pub async fn create(&self, form: &CodedForm) -> Result<Value, ClientError> {
        form.validate()?;
        let body = form.to_record(None, &self.client.acting_username());
        let fallback = format!("Failed to create {}", self.noun);
        self.client.send_json(Method::POST, self.path, &body, &fallback).await
    }

    pub async fn update(&self, existing: &CodedRecord, form: &CodedForm) -> Result<Value, ClientError> {
        form.validate()?;
        let body = form.to_record(Some(existing), &self.client.acting_username());
        let path = format!("{}/{}", self.path, existing.id);
        let fallback = format!("Failed to update {}", self.noun);
        self.client.send_json(Method::PUT, &path, &body, &fallback).await
    }
}
