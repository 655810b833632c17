//! User data model and field validation rules.
//!
//! Every field of a user record is a validated newtype. Construction is the
//! only way to obtain one, so a [`NewUser`] or [`UserChanges`] value always
//! satisfies the username, email, and password policies.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Validation errors returned by the user field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    EmailTooLong { max: usize },
    InvalidEmail,
    PasswordTooShort { min: usize },
    PasswordTooLong { max: usize },
    PasswordMissingUppercase,
    PasswordMissingLowercase,
    PasswordMissingDigit,
}

impl UserValidationError {
    /// Name of the request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UsernameTooShort { .. }
            | Self::UsernameTooLong { .. }
            | Self::UsernameInvalidCharacters => "username",
            Self::EmailTooLong { .. } | Self::InvalidEmail => "email",
            Self::PasswordTooShort { .. }
            | Self::PasswordTooLong { .. }
            | Self::PasswordMissingUppercase
            | Self::PasswordMissingLowercase
            | Self::PasswordMissingDigit => "password",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsernameTooShort { min } => {
                write!(f, "Username must be at least {min} characters long")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "Username must be at most {max} characters long")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "Username may only contain letters, digits, underscores, or spaces"
            ),
            Self::EmailTooLong { max } => write!(f, "Email must be at most {max} characters long"),
            Self::InvalidEmail => write!(f, "Email must be a valid email address"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters long")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "Password must be at most {max} characters long")
            }
            Self::PasswordMissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            Self::PasswordMissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            Self::PasswordMissingDigit => write!(f, "Password must contain at least one digit"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-generated user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 2;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 50;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;
/// Minimum allowed length for a password.
pub const PASSWORD_MIN: usize = 8;
/// Maximum allowed length for a password.
pub const PASSWORD_MAX: usize = 128;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static DIGIT_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[a-zA-Zа-яА-ЯёЁ0-9_ ]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn digit_regex() -> &'static Regex {
    DIGIT_RE.get_or_init(|| {
        Regex::new(r"\d").unwrap_or_else(|error| panic!("digit regex failed to compile: {error}"))
    })
}

/// Unique, human-readable account name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Unique contact address in standard email syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.len() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Account password satisfying the strength policy.
///
/// The value is stored as given. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Validate and construct a [`Password`].
    ///
    /// Rules are checked in a fixed order and the first unmet rule is
    /// returned: length, then uppercase, lowercase, and digit.
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = password.into();
        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(UserValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(UserValidationError::PasswordMissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(UserValidationError::PasswordMissingLowercase);
        }
        if !digit_regex().is_match(&password) {
            return Err(UserValidationError::PasswordMissingDigit);
        }
        Ok(Self(password))
    }

    /// Expose the stored secret.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Persisted user record.
///
/// ## Invariants
/// - `username` and `email` are unique across all records held by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    password: Password,
}

impl User {
    /// Assemble a record from validated components.
    pub fn new(id: UserId, fields: NewUser) -> Self {
        let NewUser {
            username,
            email,
            password,
        } = fields;
        Self {
            id,
            username,
            email,
            password,
        }
    }

    /// Store-generated identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique account name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Unique contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Apply a partial update, keeping fields that are not provided.
    #[must_use]
    pub fn with_changes(self, changes: UserChanges) -> Self {
        let UserChanges {
            username,
            email,
            password,
        } = changes;
        Self {
            id: self.id,
            username: username.unwrap_or(self.username),
            email: email.unwrap_or(self.email),
            password: password.unwrap_or(self.password),
        }
    }
}

/// Validated fields for a user that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
}

impl NewUser {
    /// Validate raw inputs in field order: username, email, password.
    pub fn try_from_parts(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }
}

/// Partial update where `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub password: Option<Password>,
}

impl UserChanges {
    /// Validate the provided fields only.
    pub fn try_from_parts(
        username: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            username: username.map(Username::new).transpose()?,
            email: email.map(EmailAddress::new).transpose()?,
            password: password.map(Password::new).transpose()?,
        })
    }

    /// Whether the update touches a unique field.
    pub fn touches_unique_fields(&self) -> bool {
        self.username.is_some() || self.email.is_some()
    }
}
