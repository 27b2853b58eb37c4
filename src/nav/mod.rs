//! Declarative application menu and role-based filtering.

use serde::Serialize;

use crate::auth::access::authorize;
use crate::types::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKind {
    Link,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Speedometer,
    Settings,
    People,
    Devices,
    User,
    LocationPin,
    Briefcase,
    Building,
    UserFollow,
    LockLocked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavItem {
    pub kind: NavKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    /// Empty means visible to every role
    pub allowed_roles: Vec<Role>,
}

impl NavItem {
    pub fn link(label: &str, path: &str, icon: Icon, allowed_roles: &[Role]) -> Self {
        Self {
            kind: NavKind::Link,
            label: label.to_string(),
            path: Some(path.to_string()),
            icon: Some(icon),
            allowed_roles: allowed_roles.to_vec(),
        }
    }

    pub fn title(label: &str, allowed_roles: &[Role]) -> Self {
        Self {
            kind: NavKind::Title,
            label: label.to_string(),
            path: None,
            icon: None,
            allowed_roles: allowed_roles.to_vec(),
        }
    }

    pub fn is_visible_to(&self, role: Role) -> bool {
        authorize(role, &self.allowed_roles).is_allowed()
    }
}

const EVERYONE: &[Role] = &[Role::Admin, Role::Manager, Role::User];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// The full, unfiltered menu
pub fn default_menu() -> Vec<NavItem> {
    vec![
        NavItem::link("Dashboard", "/dashboard", Icon::Speedometer, EVERYONE),
        NavItem::link("Role Test", "/test/role-test", Icon::Settings, EVERYONE),
        NavItem::title("Main Operations", EVERYONE),
        NavItem::link("Employees", "/main-operations/employees", Icon::People, EVERYONE),
        NavItem::link("Devices", "/main-operations/devices", Icon::Devices, EVERYONE),
        NavItem::link("Users", "/main-operations/users", Icon::User, ADMIN_ONLY),
        NavItem::title("System Lookups", ADMIN_ONLY),
        NavItem::link("Districts & Centers", "/system-lookups/districts-centers", Icon::LocationPin, ADMIN_ONLY),
        NavItem::link("Equipments", "/system-lookups/equipments", Icon::Settings, ADMIN_ONLY),
        NavItem::link("Departments", "/system-lookups/departments", Icon::Briefcase, ADMIN_ONLY),
        NavItem::link("Job Titles", "/system-lookups/job-titles", Icon::Briefcase, ADMIN_ONLY),
        NavItem::link("Constant Data", "/system-lookups/placements", Icon::LocationPin, ADMIN_ONLY),
        NavItem::link("Companies", "/system-lookups/companies", Icon::Building, ADMIN_ONLY),
        NavItem::link("Positions", "/system-lookups/positions", Icon::Briefcase, ADMIN_ONLY),
        NavItem::title("Profile", EVERYONE),
        NavItem::link("Profile", "/profile/profile", Icon::UserFollow, EVERYONE),
        NavItem::link("Logout", "/logout", Icon::LockLocked, EVERYONE),
    ]
}

/// Items visible to `role`, in their original order.
///
/// Titles are filtered like any other item; a title whose links are all hidden is
/// still shown if the title itself allows the role.
pub fn filter_nav(items: &[NavItem], role: Role) -> Vec<NavItem> {
    items
        .iter()
        .filter(|item| item.is_visible_to(role))
        .cloned()
        .collect()
}
