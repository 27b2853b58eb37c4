use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::validate::FormCheck;
use super::ApiClient;
use crate::error::ClientError;

/// Self-service profile of the signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub role: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn validate(&self) -> Result<(), ClientError> {
        let mut check = FormCheck::new();
        if self.new_password != self.confirm_password {
            check.fail("confirmPassword", "New password and confirm password do not match");
        }
        check.finish()
    }
}

pub struct ProfileApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn profile(&self) -> ProfileApi<'_> {
        ProfileApi { client: self }
    }
}

impl ProfileApi<'_> {
    pub async fn get(&self) -> Result<Profile, ClientError> {
        self.client
            .get_json("/api/profile", &[], "Failed to load profile data")
            .await
    }

    pub async fn update(&self, email: &str, phone_number: &str) -> Result<(), ClientError> {
        self.client
            .send_json(
                Method::PUT,
                "/api/profile",
                &json!({ "email": email, "phoneNumber": phone_number }),
                "Failed to update profile",
            )
            .await?;
        Ok(())
    }

    /// Confirmation is checked locally before anything is sent
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ClientError> {
        change.validate()?;
        self.client
            .send_json(Method::POST, "/api/profile/change-password", change, "Failed to change password")
            .await?;
        Ok(())
    }
}
