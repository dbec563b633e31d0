//! Client-side domain models: the user profile and the auth session.

pub mod session;
pub mod user;

pub use session::AuthSession;
pub use user::UserProfile;
