pub mod auth;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod images;
pub mod multipart;
pub mod session;
pub mod settings;
pub mod users;
