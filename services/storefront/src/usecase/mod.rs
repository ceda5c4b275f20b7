pub mod auth;
pub mod dashboard;
pub mod home;
pub mod images;
pub mod session;
pub mod settings;
pub mod users;

#[cfg(test)]
pub(crate) mod mock;
