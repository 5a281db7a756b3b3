//! User accounts and their validated identity fields.

use std::fmt;

use uuid::Uuid;

use super::password::PasswordHash;

/// Maximum length, in characters, of an email address or display name.
pub const USER_FIELD_MAX: usize = 255;

/// Validation errors raised when constructing user identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain a single '@' separating local and domain parts")]
    InvalidEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a user id from its textual UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalised email address used as the login identifier.
///
/// Surrounding whitespace is trimmed and the whole address is lower-cased,
/// so `" Test@TESt.com "` and `"test@test.com"` are the same account.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Email;
///
/// let email = Email::parse("test@TESt.com").expect("valid email");
/// assert_eq!(email.as_ref(), "test@test.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > USER_FIELD_MAX {
            return Err(UserValidationError::EmailTooLong {
                max: USER_FIELD_MAX,
            });
        }
        let (local, domain) = trimmed
            .split_once('@')
            .ok_or(UserValidationError::InvalidEmail)?;
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text display name; may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserName(String);

impl UserName {
    /// Validate a display name. Surrounding whitespace is trimmed.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() > USER_FIELD_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Account role flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserFlags {
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl UserFlags {
    /// Active account without elevated privileges.
    pub const fn regular() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    /// Active account with staff and superuser privileges.
    pub const fn superuser() -> Self {
        Self {
            is_active: true,
            is_staff: true,
            is_superuser: true,
        }
    }
}

impl Default for UserFlags {
    fn default() -> Self {
        Self::regular()
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: UserName,
    password_hash: PasswordHash,
    flags: UserFlags,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(
        id: UserId,
        email: Email,
        name: UserName,
        password_hash: PasswordHash,
        flags: UserFlags,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            flags,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn flags(&self) -> UserFlags {
        self.flags
    }

    pub fn is_active(&self) -> bool {
        self.flags.is_active
    }

    pub fn is_staff(&self) -> bool {
        self.flags.is_staff
    }

    pub fn is_superuser(&self) -> bool {
        self.flags.is_superuser
    }

    /// Whether `candidate` matches the stored password hash.
    pub fn check_password(&self, candidate: &str) -> bool {
        self.password_hash.verify(candidate)
    }

    /// Return a copy with a different display name.
    pub fn with_name(mut self, name: UserName) -> Self {
        self.name = name;
        self
    }

    /// Return a copy with a different password hash.
    pub fn with_password_hash(mut self, password_hash: PasswordHash) -> Self {
        self.password_hash = password_hash;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Password;
    use rstest::rstest;

    #[rstest]
    #[case("test@TESt.com", "test@test.com")]
    #[case("  Sample@Example.ORG ", "sample@example.org")]
    #[case("TEST3@example.COM", "test3@example.com")]
    fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
        let email = Email::parse(raw).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("no-at-sign", UserValidationError::InvalidEmail)]
    #[case("@example.com", UserValidationError::InvalidEmail)]
    #[case("user@", UserValidationError::InvalidEmail)]
    #[case("a@b@c", UserValidationError::InvalidEmail)]
    #[case("a b@c.d", UserValidationError::InvalidEmail)]
    fn invalid_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::parse(raw), Err(expected));
    }

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    fn invalid_user_ids_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn user_id_round_trips_through_display() {
        let id = UserId::random();
        assert_eq!(UserId::new(id.to_string()), Ok(id));
    }

    #[rstest]
    fn long_names_are_rejected() {
        let raw = "n".repeat(USER_FIELD_MAX + 1);
        assert!(matches!(
            UserName::new(&raw),
            Err(UserValidationError::NameTooLong { .. })
        ));
    }

    #[rstest]
    fn check_password_uses_stored_hash() {
        let password = Password::new("testpass123").expect("valid password");
        let user = User::new(
            UserId::random(),
            Email::parse("test@example.com").expect("valid email"),
            UserName::default(),
            PasswordHash::hash(&password).expect("hashing succeeds"),
            UserFlags::regular(),
        );

        assert!(user.check_password("testpass123"));
        assert!(!user.check_password("wrong"));
    }

    #[rstest]
    fn superuser_flags_grant_staff_and_superuser() {
        let flags = UserFlags::superuser();
        assert!(flags.is_staff && flags.is_superuser && flags.is_active);
    }
}
