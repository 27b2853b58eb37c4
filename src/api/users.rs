use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::validate::FormCheck;
use super::ApiClient;
use crate::error::ClientError;
use crate::types::Role;

/// A managed account as listed by `/api/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUser {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_center_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
}

impl ManagedUser {
    fn matches(&self, term: &str) -> bool {
        [&self.username, &self.email, &self.first_name, &self.last_name]
            .iter()
            .any(|field| field.to_lowercase().contains(term))
    }
}

/// Case-insensitive filter on username, email, first and last name
pub fn filter_users<'a>(users: &'a [ManagedUser], term: &str) -> Vec<&'a ManagedUser> {
    let term = term.trim().to_lowercase();
    users.iter().filter(|u| term.is_empty() || u.matches(&term)).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    /// Only used on create
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub role: Role,
    pub health_center_id: Option<i64>,
    pub department_id: Option<i64>,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            role: Role::User,
            health_center_id: None,
            department_id: None,
        }
    }
}

impl From<&ManagedUser> for UserForm {
    fn from(user: &ManagedUser) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone(),
            role: Role::parse(&user.role),
            health_center_id: user.health_center_id,
            department_id: user.department_id,
        }
    }
}

impl UserForm {
    /// `creating` additionally requires a password. Non-admin accounts must be
    /// assigned to a health center and a department.
    pub fn validate(&self, creating: bool) -> Result<(), ClientError> {
        let mut check = FormCheck::new();
        check
            .required("username", &self.username, "Username is required")
            .email("email", &self.email, "Email");
        if creating {
            check.required("password", &self.password, "Password is required");
        }
        check
            .required("firstName", &self.first_name, "First name is required")
            .required("lastName", &self.last_name, "Last name is required")
            .required("phoneNumber", &self.phone_number, "Phone number is required");
        if self.role != Role::Admin {
            if self.health_center_id.is_none() {
                check.fail("healthCenterId", "Health Center is required");
            }
            if self.department_id.is_none() {
                check.fail("departmentId", "Department is required");
            }
        }
        check.finish()
    }

    fn base_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("username".into(), json!(self.username.trim()));
        body.insert("email".into(), json!(self.email.trim()));
        body.insert("firstName".into(), json!(self.first_name.trim()));
        body.insert("lastName".into(), json!(self.last_name.trim()));
        body.insert("phoneNumber".into(), json!(self.phone_number.trim()));
        body.insert("role".into(), json!(self.role));
        // Admin accounts are not tied to a center or department
        if self.role != Role::Admin {
            if let Some(id) = self.health_center_id {
                body.insert("healthCenterId".into(), json!(id));
            }
            if let Some(id) = self.department_id {
                body.insert("departmentId".into(), json!(id));
            }
        }
        body
    }

    fn create_body(&self) -> Value {
        let mut body = self.base_body();
        body.insert("password".into(), json!(self.password.trim()));
        Value::Object(body)
    }

    fn update_body(&self, existing: &ManagedUser) -> Value {
        let mut body = self.base_body();
        body.insert("status".into(), json!(existing.status));
        Value::Object(body)
    }
}

pub struct Users<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn users(&self) -> Users<'_> {
        Users { client: self }
    }
}

impl Users<'_> {
    pub async fn list(&self) -> Result<Vec<ManagedUser>, ClientError> {
        self.client
            .get_list("/api/users", "Failed to load users. Please try again.")
            .await
    }

    pub async fn create(&self, form: &UserForm) -> Result<Value, ClientError> {
        form.validate(true)?;
        self.client
            .send_json(Method::POST, "/api/users", &form.create_body(), "Failed to create user")
            .await
    }

    pub async fn update(&self, existing: &ManagedUser, form: &UserForm) -> Result<Value, ClientError> {
        form.validate(false)?;
        let path = format!("/api/users/{}", existing.id);
        self.client
            .send_json(Method::PUT, &path, &form.update_body(existing), "Failed to update user")
            .await
    }

    pub async fn reset_password(&self, id: i64, new_password: &str) -> Result<(), ClientError> {
        FormCheck::new()
            .required("newPassword", new_password, "New password is required")
            .finish()?;
        let path = format!("/api/users/{}/reset-password", id);
        self.client
            .send_json(Method::POST, &path, &json!({ "newPassword": new_password }), "Failed to reset password")
            .await?;
        Ok(())
    }
}
