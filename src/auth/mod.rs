//! Session-based authorization: role resolution, the layout guard, the shared
//! access decision, and the login/logout flow.
//!
//! All of this runs client-side against values the user controls. It decides what
//! the console shows; the backend still has to enforce every permission.

pub mod access;
pub mod flow;
pub mod guard;
pub mod role;

pub use access::{authorize, AccessDecision};
pub use flow::{login, logout, LoginFailure};
pub use guard::{GuardState, RouteGuard};
pub use role::{resolve_role, user_info, UserInfo};
