// 🚦 Route Guard - Redirect rules applied before any page renders
//
//   protected page + no session      → /login
//   /login or /register + session    → /dashboard
//   protected page + failed check    → /login
//   anything else                    → continue

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Path prefixes that require a signed-in user
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/profile", "/settings"];

/// Pages a signed-in user is sent away from
pub const AUTH_ROUTES: &[&str] = &["/login", "/register"];

/// Result of looking up the visitor's session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Authenticated,
    Anonymous,
    /// The session lookup itself failed
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Continue,
    Redirect(&'static str),
}

/// `/dashboard` guards `/dashboard` and `/dashboard/...`, not `/dashboards`
fn under_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES
        .iter()
        .any(|prefix| under_prefix(path, prefix))
}

pub fn is_auth_route(path: &str) -> bool {
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
    AUTH_ROUTES.contains(&path)
}

pub fn decide(path: &str, status: SessionStatus) -> RouteDecision {
    match status {
        SessionStatus::Authenticated if is_auth_route(path) => {
            RouteDecision::Redirect(DASHBOARD_PATH)
        }
        SessionStatus::Anonymous | SessionStatus::Unknown if is_protected(path) => {
            RouteDecision::Redirect(LOGIN_PATH)
        }
        _ => RouteDecision::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_sent_to_login() {
        for path in ["/dashboard", "/dashboard/ausgaben", "/settings", "/profile/edit"] {
            assert_eq!(
                decide(path, SessionStatus::Anonymous),
                RouteDecision::Redirect("/login"),
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_signed_in_skips_auth_pages() {
        assert_eq!(
            decide("/login", SessionStatus::Authenticated),
            RouteDecision::Redirect("/dashboard")
        );
        assert_eq!(
            decide("/register/", SessionStatus::Authenticated),
            RouteDecision::Redirect("/dashboard")
        );
        // the confirm page stays reachable
        assert_eq!(
            decide("/register/confirm", SessionStatus::Authenticated),
            RouteDecision::Continue
        );
    }

    #[test]
    fn test_failed_check_only_blocks_protected() {
        assert_eq!(
            decide("/dashboard/konten", SessionStatus::Unknown),
            RouteDecision::Redirect("/login")
        );
        assert_eq!(decide("/login", SessionStatus::Unknown), RouteDecision::Continue);
        assert_eq!(decide("/", SessionStatus::Unknown), RouteDecision::Continue);
    }

    #[test]
    fn test_public_pages_pass() {
        for status in [SessionStatus::Anonymous, SessionStatus::Authenticated] {
            assert_eq!(decide("/", status), RouteDecision::Continue);
            assert_eq!(decide("/features/sparkonten", status), RouteDecision::Continue);
        }
        assert_eq!(decide("/dashboard", SessionStatus::Authenticated), RouteDecision::Continue);
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        assert!(is_protected("/dashboard"));
        assert!(is_protected("/settings/"));
        assert!(!is_protected("/dashboards"));
        assert!(!is_protected("/settingsfoo"));
    }
}
