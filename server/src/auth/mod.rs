mod credentials;
mod crypto;
mod db;
mod middleware;
mod throttle;

pub use credentials::check_admin_credentials;
pub use crypto::{generate_token, tokens_match};
pub use db::{create_session, delete_session, purge_expired};
pub use middleware::{current_admin, require_admin, safe_next, ClientIp};
pub use throttle::LoginThrottle;
