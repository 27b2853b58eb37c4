pub mod auth;
pub mod lookups;
pub mod nav;
pub mod profile;
pub mod users;
