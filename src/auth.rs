//! Authentication collaborator: resolves the acting user's email and
//! privilege from the access proxy header and the administrator allow-list.
//!
//! The portal never checks passwords itself; an upstream access proxy
//! injects the authenticated email. Whether a missing header is acceptable
//! is an explicit configuration flag (`require_auth`), not an implicit
//! default: permissive mode grants administrator rights, so it must be
//! opted into.

/// Header injected by the access proxy with the authenticated user's email.
pub const IDENTITY_HEADER: &str = "cf-access-authenticated-user-email";

/// Resolved authentication state for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated email, if the proxy supplied one.
    pub email: Option<String>,

    /// Whether the actor holds administrator privilege.
    pub is_admin: bool,
}

impl AuthContext {
    /// Resolve the auth context from the proxy header.
    ///
    /// Returns `None` when authentication is required but no identity was
    /// supplied (the caller responds 401). With `require_auth` off and no
    /// header, the request runs in open (administrator) mode.
    pub fn resolve(
        header_email: Option<&str>,
        admin_emails: &[String],
        require_auth: bool,
    ) -> Option<AuthContext> {
        let email = header_email
            .map(str::trim)
            .filter(|email| !email.is_empty());

        match email {
            Some(email) => Some(AuthContext {
                email: Some(email.to_string()),
                is_admin: is_admin_email(email, admin_emails),
            }),
            None if require_auth => None,
            None => Some(AuthContext {
                email: None,
                is_admin: true,
            }),
        }
    }
}

/// Case-insensitive allow-list membership check.
fn is_admin_email(email: &str, admin_emails: &[String]) -> bool {
    admin_emails
        .iter()
        .any(|admin| admin.trim().eq_ignore_ascii_case(email))
}
