use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validate::FormCheck;
use super::{now_timestamp, ApiClient, Page, PageRequest};
use crate::error::ClientError;

pub const DEFAULT_SORT: &str = "companyName";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub company_address: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub contact_person: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Editable company fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyForm {
    pub company_name: String,
    pub company_address: String,
    pub contact_person: String,
    pub phone_number: String,
    pub email: String,
}

impl CompanyForm {
    pub fn validate(&self) -> Result<(), ClientError> {
        FormCheck::new()
            .required("companyName", &self.company_name, "Company Name is required")
            .required("contactPerson", &self.contact_person, "Contact Person is required")
            .required("phoneNumber", &self.phone_number, "Phone Number is required")
            .email("email", &self.email, "Email")
            .required("companyAddress", &self.company_address, "Address is required")
            .finish()
    }

    /// Request body; `existing` keeps the id and creation time when editing
    fn to_record(&self, existing: Option<&Company>) -> Company {
        let now = now_timestamp();
        Company {
            id: existing.map(|c| c.id).unwrap_or(0),
            company_name: self.company_name.trim().to_string(),
            company_address: self.company_address.trim().to_string(),
            contact_person: self.contact_person.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            email: self.email.trim().to_string(),
            created_at: Some(existing.and_then(|c| c.created_at.clone()).unwrap_or_else(|| now.clone())),
            updated_at: Some(now),
        }
    }
}

impl From<&Company> for CompanyForm {
    fn from(company: &Company) -> Self {
        Self {
            company_name: company.company_name.clone(),
            company_address: company.company_address.clone(),
            contact_person: company.contact_person.clone(),
            phone_number: company.phone_number.clone(),
            email: company.email.clone(),
        }
    }
}

pub struct Companies<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn companies(&self) -> Companies<'_> {
        Companies { client: self }
    }
}

impl Companies<'_> {
    pub async fn list(&self, request: &PageRequest) -> Result<Page<Company>, ClientError> {
        self.client
            .get_json("/api/companies", &request.to_query(), "Failed to load companies. Please try again.")
            .await
    }

    pub async fn create(&self, form: &CompanyForm) -> Result<Value, ClientError> {
        form.validate()?;
        self.client
            .send_json(Method::POST, "/api/companies", &form.to_record(None), "Failed to create company")
            .await
    }

    pub async fn update(&self, existing: &Company, form: &CompanyForm) -> Result<Value, ClientError> {
        form.validate()?;
        let path = format!("/api/companies/{}", existing.id);
        self.client
            .send_json(Method::PUT, &path, &form.to_record(Some(existing)), "Failed to update company")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CompanyForm {
        CompanyForm {
            company_name: " Acme ".into(),
            company_address: "1 Road".into(),
            contact_person: "Ann".into(),
            phone_number: "555".into(),
            email: "ann@acme.io".into(),
        }
    }

    #[test]
    fn validation_lists_missing_fields() {
        let err = CompanyForm::default().validate().unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields["email"], "Email is required");
    }

    #[test]
    fn edit_body_keeps_id_and_created_at() {
        let existing = Company {
            id: 9,
            created_at: Some("2024-01-01T00:00:00Z".into()),
            ..Default::default()
        };
        let record = form().to_record(Some(&existing));
        assert_eq!(record.id, 9);
        assert_eq!(record.company_name, "Acme");
        assert_eq!(record.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert!(record.updated_at.is_some());

        let body = serde_json::to_value(&record).unwrap();
        assert!(body.get("companyName").is_some());
    }

    #[test]
    fn new_body_uses_zero_id() {
        assert_eq!(form().to_record(None).id, 0);
    }
}
