use actix_session::Session;
use rand::RngCore;

use crate::errors::AppError;

const SESSION_KEY: &str = "csrf_token";
const TOKEN_BYTES: usize = 32;

/// Get the CSRF token from the session, or generate a new one.
pub fn get_or_create_token(session: &Session) -> String {
    if let Ok(Some(token)) = session.get::<String>(SESSION_KEY) {
        return token;
    }
    let token = new_token();
    if let Err(e) = session.insert(SESSION_KEY, &token) {
        log::warn!("Could not store CSRF token in session: {e}");
    }
    token
}

/// Compare the token a request carried with the session's token.
pub fn validate_csrf(session: &Session, submitted: &str) -> Result<(), AppError> {
    let stored = session.get::<String>(SESSION_KEY).ok().flatten();
    match stored {
        Some(stored) if tokens_match(&stored, submitted) => Ok(()),
        _ => {
            log::warn!("Rejected request with invalid or missing CSRF token");
            Err(AppError::Csrf)
        }
    }
}

fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Tokens are hex; both sides are decoded and compared without early exit.
fn tokens_match(stored: &str, submitted: &str) -> bool {
    let (Ok(expected), Ok(given)) = (hex::decode(stored), hex::decode(submitted.trim())) else {
        return false;
    };
    if expected.len() != TOKEN_BYTES || given.len() != TOKEN_BYTES {
        return false;
    }
    expected.iter().zip(&given).map(|(a, b)| a ^ b).fold(0, |acc, x| acc | x) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_hex_and_differ() {
        let a = new_token();
        let b = new_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn only_the_same_token_matches() {
        let token = new_token();
        assert!(tokens_match(&token, &token));
        assert!(tokens_match(&token, &token.to_uppercase()));
        assert!(!tokens_match(&token, &new_token()));
        assert!(!tokens_match(&token, ""));
        assert!(!tokens_match(&token, "not-hex"));
        assert!(!tokens_match("abcd", "abcd"));
    }
}
