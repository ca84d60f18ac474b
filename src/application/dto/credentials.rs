//! # Credentials DTO
//!
//! ログイン用の認証情報

use std::fmt;

/// アカウントの認証情報
///
/// `Debug` 出力ではパスワードを伏せる
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// パスワードを取り出す（ログに出さないこと）
    pub fn expose_password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("alice@example.com", "hunter2");
        let debug = format!("{:?}", creds);

        assert!(debug.contains("alice@example.com"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_accessors() {
        let creds = Credentials::new("bob@example.com", "s3cret");
        assert_eq!(creds.email(), "bob@example.com");
        assert_eq!(creds.expose_password(), "s3cret");
    }
}
