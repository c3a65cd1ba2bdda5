//! Credential helpers.

use base64::{Engine as _, engine::general_purpose};

/// `Authorization` header value for HTTP Basic credentials.
#[must_use]
pub fn basic_auth_header(username: &str, password: &str) -> String {
    let encoded = general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_default_credentials() {
        assert_eq!(
            basic_auth_header("username", "password"),
            "Basic dXNlcm5hbWU6cGFzc3dvcmQ="
        );
    }
}
