pub mod auth;

pub use auth::CallerToken;
