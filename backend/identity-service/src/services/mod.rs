/// Business logic for identity-service
pub mod login;

pub use login::LoginService;
