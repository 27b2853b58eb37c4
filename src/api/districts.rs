//! Districts and the health centers inside them.
//!
//! Health centers form a hierarchy through `parentCenterId`. [`organize_centers`]
//! groups a flat listing by district and nests children under their parents.

use std::collections::{BTreeMap, HashMap, HashSet};

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validate::FormCheck;
use super::{now_timestamp, ApiClient};
use crate::error::ClientError;

pub const UNKNOWN_DISTRICT: &str = "Unknown District";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct District {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthCenter {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "super::null_as_default")]
    pub center_type: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_name: Option<String>,
    /// Either a plain name or an object with a `name` field, depending on the endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_center_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_center_name: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub status: String,
}

impl HealthCenter {
    /// District name from whichever field the server filled in
    pub fn district_label(&self) -> String {
        match &self.district {
            Some(Value::String(name)) if !name.is_empty() => return name.clone(),
            Some(Value::Object(obj)) => {
                if let Some(name) = obj.get("name").and_then(Value::as_str) {
                    return name.to_string();
                }
            }
            _ => {}
        }
        self.district_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_DISTRICT.to_string())
    }

    /// Parent id, treating `0` as "no parent"
    pub fn parent_id(&self) -> Option<i64> {
        self.parent_center_id.filter(|id| *id != 0)
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id().is_none()
    }
}

/// A health center with its nested children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CenterNode {
    pub center: HealthCenter,
    pub children: Vec<CenterNode>,
}

impl CenterNode {
    /// This node plus all descendants
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(CenterNode::count).sum::<usize>()
    }
}

/// Group centers by district label, then nest each center under its parent when the
/// parent is in the same district. Centers whose parent is absent stay top-level.
/// Input order is preserved at every level.
pub fn organize_centers(centers: &[HealthCenter]) -> BTreeMap<String, Vec<CenterNode>> {
    let mut grouped: BTreeMap<String, Vec<&HealthCenter>> = BTreeMap::new();
    for center in centers {
        grouped.entry(center.district_label()).or_default().push(center);
    }

    grouped
        .into_iter()
        .map(|(district, members)| (district, build_tree(&members)))
        .collect()
}

fn build_tree(members: &[&HealthCenter]) -> Vec<CenterNode> {
    let ids: HashSet<i64> = members.iter().map(|c| c.id).collect();
    let mut children_of: HashMap<i64, Vec<&HealthCenter>> = HashMap::new();
    let mut roots = Vec::new();

    for center in members {
        match center.parent_id() {
            Some(parent) if ids.contains(&parent) && parent != center.id => {
                children_of.entry(parent).or_default().push(*center)
            }
            Some(parent) => {
                tracing::debug!("Parent {} not found for center {}, treating as top-level", parent, center.name);
                roots.push(*center);
            }
            None => roots.push(*center),
        }
    }

    let mut visited = HashSet::new();
    roots
        .into_iter()
        .filter_map(|root| attach(root, &children_of, &mut visited))
        .collect()
}

fn attach(
    center: &HealthCenter,
    children_of: &HashMap<i64, Vec<&HealthCenter>>,
    visited: &mut HashSet<i64>,
) -> Option<CenterNode> {
    // Duplicate ids or parent cycles would otherwise recurse forever
    if !visited.insert(center.id) {
        return None;
    }
    let children = children_of
        .get(&center.id)
        .map(|kids| kids.iter().filter_map(|kid| attach(kid, children_of, visited)).collect())
        .unwrap_or_default();
    Some(CenterNode { center: center.clone(), children })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthCenterForm {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub center_type: String,
    pub description: String,
    pub district_id: Option<i64>,
    pub parent_center_id: Option<i64>,
    pub status: String,
}

impl Default for HealthCenterForm {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            center_type: "HOSPITAL".to_string(),
            description: String::new(),
            district_id: None,
            parent_center_id: None,
            status: "ACTIVE".to_string(),
        }
    }
}

impl From<&HealthCenter> for HealthCenterForm {
    fn from(center: &HealthCenter) -> Self {
        let district_id = center.district_id.or_else(|| {
            center
                .district
                .as_ref()
                .and_then(|d| d.get("id"))
                .and_then(Value::as_i64)
        });
        let defaults = Self::default();
        Self {
            code: center.code.clone(),
            name: center.name.clone(),
            center_type: if center.center_type.is_empty() { defaults.center_type } else { center.center_type.clone() },
            description: center.description.clone(),
            district_id,
            parent_center_id: center.parent_id(),
            status: if center.status.is_empty() { defaults.status } else { center.status.clone() },
        }
    }
}

impl HealthCenterForm {
    pub fn validate(&self) -> Result<(), ClientError> {
        let mut check = FormCheck::new();
        check
            .required("name", &self.name, "Name is required")
            .required("code", &self.code, "Code is required")
            .required("type", &self.center_type, "Type is required");
        if self.district_id.is_none() {
            check.fail("districtId", "District is required");
        }
        check.finish()
    }

    fn to_body(&self, id: i64, district_name: &str, parent_name: Option<String>, acting: &str) -> Value {
        let now = now_timestamp();
        serde_json::json!({
            "id": id,
            "name": self.name.trim(),
            "code": self.code.trim(),
            "type": self.center_type,
            "description": self.description.trim(),
            "districtId": self.district_id,
            "districtName": district_name,
            "parentCenterId": self.parent_center_id.filter(|p| *p != 0),
            "parentCenterName": parent_name,
            "status": self.status,
            "createdAt": now,
            "updatedAt": now,
            "createdBy": acting,
            "updatedBy": acting,
        })
    }
}

pub struct Districts<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn districts(&self) -> Districts<'_> {
        Districts { client: self }
    }
}

impl Districts<'_> {
    pub async fn list(&self) -> Result<Vec<District>, ClientError> {
        self.client
            .get_json("/api/districts", &[], "Failed to load districts. Please try again.")
            .await
    }

    pub async fn centers(&self) -> Result<Vec<HealthCenter>, ClientError> {
        self.client
            .get_json("/api/health-centers", &[], "Failed to load health centers. Please try again.")
            .await
    }

    pub async fn center(&self, id: i64) -> Result<HealthCenter, ClientError> {
        self.centers()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: format!("Health center {} not found", id),
            })
    }

    /// Centers without a parent, the only ones offered for user assignment
    pub async fn top_level_centers(&self) -> Result<Vec<HealthCenter>, ClientError> {
        let mut centers = self.centers().await?;
        centers.retain(HealthCenter::is_top_level);
        Ok(centers)
    }

    pub async fn center_types(&self) -> Result<Vec<Value>, ClientError> {
        self.client.lookups().enumeration("center-type").await
    }

    pub async fn create_center(&self, form: &HealthCenterForm) -> Result<Value, ClientError> {
        form.validate()?;
        let body = self.center_body(0, form).await?;
        self.client
            .send_json(Method::POST, "/api/health-centers", &body, "Failed to create center")
            .await
    }

    pub async fn update_center(&self, id: i64, form: &HealthCenterForm) -> Result<Value, ClientError> {
        form.validate()?;
        let body = self.center_body(id, form).await?;
        let path = format!("/api/health-centers/{}", id);
        self.client
            .send_json(Method::PUT, &path, &body, "Failed to update center")
            .await
    }

    /// Denormalized names are looked up so the server receives them alongside the ids
    async fn center_body(&self, id: i64, form: &HealthCenterForm) -> Result<Value, ClientError> {
        let districts = self.list().await?;
        let district_name = districts
            .iter()
            .find(|d| Some(d.id) == form.district_id)
            .map(|d| d.name.clone())
            .unwrap_or_default();

        let parent_name = match form.parent_center_id.filter(|p| *p != 0) {
            Some(parent) => self
                .centers()
                .await?
                .into_iter()
                .find(|c| c.id == parent)
                .map(|c| c.name),
            None => None,
        };

        Ok(form.to_body(id, &district_name, parent_name, &self.client.acting_username()))
    }
}
