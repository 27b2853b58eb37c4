use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validate::FormCheck;
use super::ApiClient;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub display_order: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub is_active: bool,
}

/// Display order arrives as free text from the form and must parse as a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionForm {
    pub name: String,
    pub description: String,
    pub display_order: String,
    pub is_active: bool,
}

impl Default for PositionForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            display_order: String::new(),
            is_active: true,
        }
    }
}

impl From<&Position> for PositionForm {
    fn from(position: &Position) -> Self {
        Self {
            name: position.name.clone(),
            description: position.description.clone(),
            display_order: position.display_order.to_string(),
            is_active: position.is_active,
        }
    }
}

impl PositionForm {
    pub fn validate(&self) -> Result<(), ClientError> {
        let mut check = FormCheck::new();
        check.required("name", &self.name, "Name is required");
        if self.display_order.trim().parse::<i64>().is_err() {
            check.fail("displayOrder", "Display Order must be a number");
        }
        check.finish()
    }

    fn to_record(&self, id: i64) -> Result<Position, ClientError> {
        self.validate()?;
        Ok(Position {
            id,
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            display_order: self.display_order.trim().parse().unwrap_or_default(),
            is_active: self.is_active,
        })
    }
}

/// Positions ordered by `displayOrder`, ties keep server order
pub fn sort_by_display_order(positions: &mut [Position]) {
    positions.sort_by_key(|p| p.display_order);
}

pub struct Positions<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn positions(&self) -> Positions<'_> {
        Positions { client: self }
    }
}

impl Positions<'_> {
    pub async fn list(&self) -> Result<Vec<Position>, ClientError> {
        let mut positions: Vec<Position> = self
            .client
            .get_list("/api/positions", "Failed to load positions. Please try again.")
            .await?;
        sort_by_display_order(&mut positions);
        Ok(positions)
    }

    pub async fn create(&self, form: &PositionForm) -> Result<Value, ClientError> {
        let body = form.to_record(0)?;
        self.client
            .send_json(Method::POST, "/api/positions", &body, "Failed to create position")
            .await
    }

    pub async fn update(&self, id: i64, form: &PositionForm) -> Result<Value, ClientError> {
        let body = form.to_record(id)?;
        let path = format!("/api/positions/{}", id);
        self.client
            .send_json(Method::PUT, &path, &body, "Failed to update position")
            .await
    }
}
