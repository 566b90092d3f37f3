// 🌐 User-facing text in German (default) and English
//
// Errors and empty states surface to users only through this module, so a
// new error kind or list page needs an entry here in both languages.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::auth::AuthError;
use crate::table::UnknownValue;
use crate::validation::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }
}

impl FromStr for Locale {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "de" | "de-de" | "deutsch" => Ok(Locale::De),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::En),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

/// The list pages of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Income,
    Expenses,
    Categories,
    Accounts,
}

/// Text of the placeholder row shown when a search matches nothing
pub fn empty_list(locale: Locale, kind: ListKind) -> &'static str {
    match (locale, kind) {
        (Locale::De, ListKind::Income) => "Keine Einnahmen gefunden.",
        (Locale::De, ListKind::Expenses) => "Keine Ausgaben gefunden.",
        (Locale::De, ListKind::Categories) => "Keine Kategorien gefunden.",
        (Locale::De, ListKind::Accounts) => "Keine Konten vorhanden.",
        (Locale::En, ListKind::Income) => "No income found.",
        (Locale::En, ListKind::Expenses) => "No expenses found.",
        (Locale::En, ListKind::Categories) => "No categories found.",
        (Locale::En, ListKind::Accounts) => "No accounts yet.",
    }
}

pub fn list_title(locale: Locale, kind: ListKind) -> &'static str {
    match (locale, kind) {
        (Locale::De, ListKind::Income) => "Einnahmen",
        (Locale::De, ListKind::Expenses) => "Ausgaben",
        (Locale::De, ListKind::Categories) => "Kategorien",
        (Locale::De, ListKind::Accounts) => "Konten",
        (Locale::En, ListKind::Income) => "Income",
        (Locale::En, ListKind::Expenses) => "Expenses",
        (Locale::En, ListKind::Categories) => "Categories",
        (Locale::En, ListKind::Accounts) => "Accounts",
    }
}

/// Translated message for a failed authentication call
pub fn auth_error(locale: Locale, error: &AuthError) -> &'static str {
    match locale {
        Locale::De => match error {
            AuthError::InvalidCredentials => "Ungültige E-Mail-Adresse oder ungültiges Passwort.",
            AuthError::EmailNotConfirmed => "Bitte bestätige zuerst deine E-Mail-Adresse.",
            AuthError::UserAlreadyRegistered => "Diese E-Mail-Adresse ist bereits registriert.",
            AuthError::WeakPassword { .. } => "Das Passwort muss mindestens 8 Zeichen lang sein.",
            AuthError::InvalidEmail => "Bitte gib eine gültige E-Mail-Adresse ein.",
            AuthError::NotSignedIn => "Kein Benutzer angemeldet.",
            AuthError::SessionExpired => "Deine Sitzung ist abgelaufen. Bitte melde dich erneut an.",
            AuthError::InvalidConfirmationToken => "Der Bestätigungslink ist ungültig oder abgelaufen.",
            AuthError::AlreadyConfirmed => "Diese E-Mail-Adresse wurde bereits bestätigt.",
            AuthError::Storage(_) => "Ein unerwarteter Fehler ist aufgetreten. Bitte versuche es später erneut.",
        },
        Locale::En => match error {
            AuthError::InvalidCredentials => "Invalid email address or password.",
            AuthError::EmailNotConfirmed => "Please confirm your email address first.",
            AuthError::UserAlreadyRegistered => "This email address is already registered.",
            AuthError::WeakPassword { .. } => "The password must be at least 8 characters long.",
            AuthError::InvalidEmail => "Please enter a valid email address.",
            AuthError::NotSignedIn => "No user is signed in.",
            AuthError::SessionExpired => "Your session has expired. Please sign in again.",
            AuthError::InvalidConfirmationToken => "The confirmation link is invalid or has expired.",
            AuthError::AlreadyConfirmed => "This email address has already been confirmed.",
            AuthError::Storage(_) => "Something went wrong. Please try again later.",
        },
    }
}

/// Translated message for a failed form rule
pub fn rule(locale: Locale, rule: Rule) -> &'static str {
    match locale {
        Locale::De => match rule {
            Rule::Required => "Dieses Feld ist erforderlich.",
            Rule::InvalidEmail => "Bitte gib eine gültige E-Mail-Adresse ein.",
            Rule::PasswordTooShort => "Das Passwort muss mindestens 8 Zeichen lang sein.",
            Rule::NameTooShort => "Der Name muss mindestens 2 Zeichen lang sein.",
            Rule::PasswordMismatch => "Die Passwörter stimmen nicht überein.",
            Rule::TermsNotAccepted => {
                "Du musst den Nutzungsbedingungen zustimmen, um fortzufahren."
            }
            Rule::NotANumber => "Bitte gib einen gültigen Betrag ein.",
            Rule::InvalidColor => "Bitte wähle eine Farbe im Format #RRGGBB.",
        },
        Locale::En => match rule {
            Rule::Required => "This field is required.",
            Rule::InvalidEmail => "Please enter a valid email address.",
            Rule::PasswordTooShort => "The password must be at least 8 characters long.",
            Rule::NameTooShort => "The name must be at least 2 characters long.",
            Rule::PasswordMismatch => "The passwords do not match.",
            Rule::TermsNotAccepted => "You must accept the terms of use to continue.",
            Rule::NotANumber => "Please enter a valid amount.",
            Rule::InvalidColor => "Please pick a color in #RRGGBB format.",
        },
    }
}

/// Shown on the confirm page after registering or resending
pub fn confirmation_sent(locale: Locale, email: &str) -> String {
    match locale {
        Locale::De => format!(
            "Wir haben eine Bestätigungsmail an {} gesendet. Bitte klicke auf den Link in der E-Mail.",
            email
        ),
        Locale::En => format!(
            "We sent a confirmation email to {}. Please click the link in the email.",
            email
        ),
    }
}

/// Format an amount the German way: `1.234,56 €`
pub fn format_eur(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}{},{:02} €", if negative { "-" } else { "" }, grouped, fraction)
}

// ============================================================================
// TESTS
// ============================================================================
