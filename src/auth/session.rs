use std::fmt;

/// Proof of an authenticated user.
///
/// Created and destroyed by the identity provider; the dashboard only reads it.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    id_token: Option<String>,
    email: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            id_token: None,
            email: None,
        }
    }

    /// Attach the bearer token used to authorize database reads.
    pub fn with_id_token(mut self, id_token: impl Into<String>) -> Self {
        self.id_token = Some(id_token.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

// Keep tokens out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("id_token", &self.id_token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_token() {
        let session = Session::new("uid-1").with_id_token("secret-token");
        let rendered = format!("{session:?}");
        assert!(rendered.contains("uid-1"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn builder_sets_optional_fields() {
        let session = Session::new("uid-2").with_email("asha@example.com");
        assert_eq!(session.user_id(), "uid-2");
        assert_eq!(session.email(), Some("asha@example.com"));
        assert_eq!(session.id_token(), None);
    }
}
