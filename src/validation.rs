// ✅ Form Validation - Rules for login, registration and account forms
//
// Each form validates all fields and reports every failing field at once.
// Messages are not stored here; `messages::rule` turns a `Rule` into text.

use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::account::{NewAccount, DEFAULT_ACCOUNT_COLOR};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    InvalidEmail,
    PasswordTooShort,
    NameTooShort,
    PasswordMismatch,
    TermsNotAccepted,
    NotANumber,
    InvalidColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, rule: Rule) {
        self.0.push(FieldError { field, rule });
    }

    /// First failing rule for a field, if any
    pub fn for_field(&self, field: &str) -> Option<Rule> {
        self.0.iter().find(|e| e.field == field).map(|e| e.rule)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Structural email check: one `@`, a non-empty local part, and a dotted
/// domain whose labels are non-empty and whose last label has 2+ characters.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| !label.is_empty())
        && labels.last().map_or(false, |tld| tld.chars().count() >= 2)
}

/// `#RGB` or `#RRGGBB` hex color, the only form allowed into inline styles
pub fn is_valid_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.is_empty() {
        errors.push("email", Rule::Required);
    } else if !is_valid_email(email) {
        errors.push("email", Rule::InvalidEmail);
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("password", Rule::PasswordTooShort);
    }
}

/// HTML checkboxes send "on" when ticked and nothing otherwise
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        value.as_deref().map(str::to_lowercase).as_deref(),
        Some("on" | "true" | "1" | "yes")
    ))
}

// ============================================================================
// LOGIN
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors.into_result()
    }
}

// ============================================================================
// REGISTER
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub terms: bool,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().chars().count() < MIN_NAME_LEN {
            errors.push("name", Rule::NameTooShort);
        }
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        if self.password != self.confirm_password {
            errors.push("confirm_password", Rule::PasswordMismatch);
        }
        if !self.terms {
            errors.push("terms", Rule::TermsNotAccepted);
        }

        errors.into_result()
    }
}

// ============================================================================
// ACCOUNT
// ============================================================================

/// Raw "new account" input; balance arrives as text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub balance: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl AccountForm {
    /// Trimmed non-empty name, a finite numeric balance and an optional hex
    /// color. A comma decimal separator is accepted ("12,50").
    pub fn validate(&self) -> Result<NewAccount, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name", Rule::Required);
        }

        let balance_text = self.balance.trim().replace(',', ".");
        let balance = if balance_text.is_empty() {
            errors.push("balance", Rule::Required);
            None
        } else {
            match balance_text.parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    errors.push("balance", Rule::NotANumber);
                    None
                }
            }
        };

        let color = match self.color.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            None => DEFAULT_ACCOUNT_COLOR,
            Some(color) if is_valid_hex_color(color) => color,
            Some(_) => {
                errors.push("color", Rule::InvalidColor);
                DEFAULT_ACCOUNT_COLOR
            }
        };

        match (errors.is_empty(), balance) {
            (true, Some(balance)) => Ok(NewAccount {
                name: name.to_string(),
                balance,
                color: color.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
