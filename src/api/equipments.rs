use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validate::FormCheck;
use super::{now_timestamp, ApiClient, Page, PageRequest};
use crate::error::ClientError;

pub const DEFAULT_SORT: &str = "equipmentType";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub equipment_type: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub equipment_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentForm {
    pub equipment_type: String,
    pub equipment_name: String,
}

impl EquipmentForm {
    pub fn validate(&self) -> Result<(), ClientError> {
        FormCheck::new()
            .required("equipmentType", &self.equipment_type, "Type is required")
            .required("equipmentName", &self.equipment_name, "Name is required")
            .finish()
    }

    fn to_record(&self, existing: Option<&Equipment>) -> Equipment {
        let now = now_timestamp();
        Equipment {
            id: existing.map(|e| e.id).unwrap_or(0),
            equipment_type: self.equipment_type.clone(),
            equipment_name: self.equipment_name.clone(),
            created_at: Some(existing.and_then(|e| e.created_at.clone()).unwrap_or_else(|| now.clone())),
            updated_at: Some(now),
        }
    }
}

/// `LABORATORY_EQUIPMENT` → `Laboratory Equipment`
pub fn type_label(raw: &str) -> String {
    raw.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct Equipments<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn equipments(&self) -> Equipments<'_> {
        Equipments { client: self }
    }
}

impl Equipments<'_> {
    /// One page of equipment. `type_filter` narrows the returned page only;
    /// the totals still describe the unfiltered listing.
    pub async fn list(
        &self,
        request: &PageRequest,
        type_filter: Option<&str>,
    ) -> Result<Page<Equipment>, ClientError> {
        let mut page: Page<Equipment> = self
            .client
            .get_json("/api/equipments", &request.to_query(), "Failed to load equipments. Please try again.")
            .await?;
        if let Some(wanted) = type_filter.filter(|t| !t.is_empty()) {
            page.content.retain(|e| e.equipment_type == wanted);
        }
        Ok(page)
    }

    /// Known equipment types; an unavailable list is treated as empty
    pub async fn types(&self) -> Vec<String> {
        match self
            .client
            .get_json::<Value>("/api/devices/equipment-types", &[], "Failed to fetch equipment types")
            .await
        {
            Ok(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to fetch equipment types: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn create(&self, form: &EquipmentForm) -> Result<Value, ClientError> {
        form.validate()?;
        self.client
            .send_json(Method::POST, "/api/equipments", &form.to_record(None), "Failed to create equipment")
            .await
    }

    pub async fn update(&self, existing: &Equipment, form: &EquipmentForm) -> Result<Value, ClientError> {
        form.validate()?;
        let path = format!("/api/equipments/{}", existing.id);
        self.client
            .send_json(Method::PUT, &path, &form.to_record(Some(existing)), "Failed to update equipment")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_labels_are_title_cased() {
        assert_eq!(type_label("RADIOLOGY_IMAGING"), "Radiology Imaging");
        assert_eq!(type_label("ANESTHESIA"), "Anesthesia");
    }

    #[test]
    fn form_requires_type_and_name() {
        let err = EquipmentForm::default().validate().unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["equipmentType"], "Type is required");
        assert_eq!(fields["equipmentName"], "Name is required");
    }
}
