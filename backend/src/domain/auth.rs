//! Authentication primitives such as account credentials.
//!
//! Inbound payload parsing stays outside the domain; handlers build
//! [`Credentials`] through the validating constructor before talking to a
//! port or service.

use zeroize::Zeroizing;

use crate::domain::{Login, UserValidationError};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Login was missing, blank, or too long.
    #[error(transparent)]
    Login(#[from] UserValidationError),
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated credentials used for registration and login.
///
/// ## Invariants
/// - `login` is trimmed and non-empty.
/// - `password` is non-empty; surrounding whitespace is preserved.
///
/// # Examples
/// ```
/// use loyalty_backend::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" alice ", "s3cret").unwrap();
/// assert_eq!(creds.login().as_str(), "alice");
/// assert_eq!(creds.password(), "s3cret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    login: Login,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw login/password inputs.
    pub fn try_from_parts(login: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let login = Login::new(login)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            login,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login to register or look up.
    pub fn login(&self) -> &Login {
        &self.login
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::Login(UserValidationError::EmptyLogin))]
    #[case("   ", "pw", CredentialsValidationError::Login(UserValidationError::EmptyLogin))]
    #[case("user", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] login: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err =
            Credentials::try_from_parts(login, password).expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn password_whitespace_is_preserved() {
        let creds = Credentials::try_from_parts("alice", "  pw  ").expect("valid");
        assert_eq!(creds.password(), "  pw  ");
    }
}
