pub mod artists;
pub mod auth;
pub mod festivals;
pub mod health;
pub mod uploads;
pub mod users;
