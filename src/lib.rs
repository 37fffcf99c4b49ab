pub mod auction;
pub mod avatar;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod oauth;
pub mod posts;
pub mod query;
pub mod scheduler;
pub mod session;
pub mod users;
