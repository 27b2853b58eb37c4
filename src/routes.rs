//! Console routing: one navigation pass per request.
//!
//! Every page goes through [`Router::navigate`], which applies the layout guard and
//! then the page's allow-set via [`authorize`]. A denied page always redirects to
//! [`Route::AccessDenied`] before any data is fetched.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::auth::access::{authorize, AccessDecision};
use crate::auth::guard::{GuardState, RouteGuard};
use crate::auth::role::{resolve_role, user_info, UserInfo};
use crate::nav::{default_menu, filter_nav, NavItem};
use crate::session::{SessionEvent, SessionProvider};
use crate::types::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Login,
    Logout,
    AccessDenied,
    Dashboard,
    RoleTest,
    Employees,
    Devices,
    Users,
    DistrictsCenters,
    Equipments,
    Departments,
    JobTitles,
    ConstantData,
    Companies,
    Positions,
    Profile,
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl Route {
    pub const ALL: [Route; 16] = [
        Route::Login,
        Route::Logout,
        Route::AccessDenied,
        Route::Dashboard,
        Route::RoleTest,
        Route::Employees,
        Route::Devices,
        Route::Users,
        Route::DistrictsCenters,
        Route::Equipments,
        Route::Departments,
        Route::JobTitles,
        Route::ConstantData,
        Route::Companies,
        Route::Positions,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Logout => "/logout",
            Route::AccessDenied => "/access-denied",
            Route::Dashboard => "/dashboard",
            Route::RoleTest => "/test/role-test",
            Route::Employees => "/main-operations/employees",
            Route::Devices => "/main-operations/devices",
            Route::Users => "/main-operations/users",
            Route::DistrictsCenters => "/system-lookups/districts-centers",
            Route::Equipments => "/system-lookups/equipments",
            Route::Departments => "/system-lookups/departments",
            Route::JobTitles => "/system-lookups/job-titles",
            Route::ConstantData => "/system-lookups/placements",
            Route::Companies => "/system-lookups/companies",
            Route::Positions => "/system-lookups/positions",
            Route::Profile => "/profile/profile",
        }
    }

    /// Exact path match; `/` and a trailing slash are accepted. A leading `#` is
    /// stripped so hash-style links resolve too.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim().trim_start_matches('#');
        let path = match path.trim_end_matches('/') {
            "" => return Some(Route::Dashboard),
            p => p,
        };
        Route::ALL.iter().copied().find(|r| r.path() == path)
    }

    /// Roles allowed to open the page; empty means any signed-in role
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Route::Users
            | Route::DistrictsCenters
            | Route::Equipments
            | Route::Departments
            | Route::JobTitles
            | Route::ConstantData
            | Route::Companies
            | Route::Positions => ADMIN_ONLY,
            _ => &[],
        }
    }

    /// Rendered outside the application shell, without the layout guard
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::AccessDenied)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Logout => "Logout",
            Route::AccessDenied => "Access Denied",
            Route::Dashboard => "Dashboard",
            Route::RoleTest => "Role Test",
            Route::Employees => "Employees",
            Route::Devices => "Devices",
            Route::Users => "Users",
            Route::DistrictsCenters => "Districts & Centers",
            Route::Equipments => "Equipments",
            Route::Departments => "Departments",
            Route::JobTitles => "Job Titles",
            Route::ConstantData => "Constant Data",
            Route::Companies => "Companies",
            Route::Positions => "Positions",
            Route::Profile => "Profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What the shell shows for an admitted page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub route: Route,
    pub user: UserInfo,
    pub menu: Vec<NavItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Navigation {
    Render(Page),
    Redirect { to: Route, reason: String },
    NotFound { path: String },
}

/// Owns the layout guard and the role-filtered menu for one console session
pub struct Router {
    session: Arc<dyn SessionProvider>,
    guard: RouteGuard,
    events: broadcast::Receiver<SessionEvent>,
    items: Vec<NavItem>,
    menu: Vec<NavItem>,
}

impl Router {
    pub fn new(session: Arc<dyn SessionProvider>) -> Self {
        Self::with_menu(session, default_menu())
    }

    pub fn with_menu(session: Arc<dyn SessionProvider>, items: Vec<NavItem>) -> Self {
        let events = session.subscribe();
        let menu = filter_nav(&items, resolve_role(session.as_ref()));
        Self {
            session,
            guard: RouteGuard::new(),
            events,
            items,
            menu,
        }
    }

    pub fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    /// Menu for the role seen at the last session change
    pub fn menu(&self) -> &[NavItem] {
        &self.menu
    }

    /// Apply pending session-change events: reset the guard and rebuild the menu.
    /// Returns whether anything changed.
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.reload();
        }
        changed
    }

    /// Start over as if the application had been reloaded
    pub fn reload(&mut self) {
        self.guard.reset();
        self.menu = filter_nav(&self.items, resolve_role(self.session.as_ref()));
    }

    pub fn navigate(&mut self, path: &str) -> Navigation {
        match Route::from_path(path) {
            Some(route) => self.enter(route),
            None => Navigation::NotFound { path: path.to_string() },
        }
    }

    /// Enter `route`: guard, then the page's allow-set against the current role
    pub fn enter(&mut self, route: Route) -> Navigation {
        self.refresh();

        if route == Route::Login {
            if self.session.is_present() {
                return Navigation::Redirect {
                    to: Route::Dashboard,
                    reason: "Already signed in".to_string(),
                };
            }
            return self.render(route);
        }
        if route.is_public() {
            return self.render(route);
        }

        if self.guard.check(self.session.as_ref()) != GuardState::Admitted {
            return Navigation::Redirect {
                to: Route::Login,
                reason: "No active session".to_string(),
            };
        }

        let role = resolve_role(self.session.as_ref());
        match authorize(role, route.allowed_roles()) {
            AccessDecision::Allowed => self.render(route),
            AccessDecision::Denied { reason } => {
                tracing::info!("Access to {} denied: {}", route, reason);
                Navigation::Redirect { to: Route::AccessDenied, reason }
            }
        }
    }

    fn render(&self, route: Route) -> Navigation {
        let menu = if route.is_public() { Vec::new() } else { self.menu.clone() };
        Navigation::Render(Page {
            route,
            user: user_info(self.session.as_ref()),
            menu,
        })
    }
}
