use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;

use crate::models::NewAdminSession;
use crate::schema::admin_sessions;

use super::crypto::{generate_token, hash_token};

/// When a session started at `now` should lapse, clamped to the latest representable time.
fn session_expiry(now: DateTime<Utc>, ttl_days: i64) -> DateTime<Utc> {
    Duration::try_days(ttl_days)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Insert a session for `username` and return the raw token for the cookie.
pub fn create_session(
    conn: &mut PgConnection,
    username: &str,
    ttl_days: i64,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = session_expiry(Utc::now(), ttl_days);

    let new_session = NewAdminSession {
        username,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(admin_sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

/// Username behind a live (unexpired) session token.
pub fn username_for_token(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<String>, diesel::result::Error> {
    admin_sessions::table
        .filter(admin_sessions::token_hash.eq(hash_token(token)))
        .filter(admin_sessions::expires_at.gt(Utc::now()))
        .select(admin_sessions::username)
        .first(conn)
        .optional()
}

pub fn delete_session(conn: &mut PgConnection, token: &str) -> Result<usize, diesel::result::Error> {
    diesel::delete(admin_sessions::table.filter(admin_sessions::token_hash.eq(hash_token(token))))
        .execute(conn)
}

/// Drop sessions past their expiry. Returns how many were removed.
pub fn purge_expired(conn: &mut PgConnection) -> Result<usize, diesel::result::Error> {
    diesel::delete(admin_sessions::table.filter(admin_sessions::expires_at.le(Utc::now())))
        .execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        assert_eq!(session_expiry(now, 30), now + Duration::days(30));
        assert_eq!(session_expiry(now, 200_000_000_000_000), DateTime::<Utc>::MAX_UTC);
    }
}
