// Route guard: the three-state gate in front of protected screens.
//
// The decision is a pure function of a session snapshot and the current
// location; the guard holds no state of its own. Recording the redirect
// location for the post-login return lives on the manager
// (`SessionManager::guard`), not here.

use crate::session::Session;

/// What to do with a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Hydration has not finished; show a placeholder, render nothing
    /// protected, do not redirect.
    Loading,
    /// Not authenticated; go to the sign-in screen and keep `from` so a
    /// successful login can come back.
    RedirectToSignIn { from: String },
    /// Authenticated; render the protected content.
    Render,
}

impl RouteDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render)
    }
}

/// Decide what `location` gets, given the session as it is right now.
pub fn decide(session: &Session, location: &str) -> RouteDecision {
    if session.is_loading {
        return RouteDecision::Loading;
    }
    if !session.is_authenticated() {
        return RouteDecision::RedirectToSignIn {
            from: location.to_string(),
        };
    }
    RouteDecision::Render
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};

    #[test]
    fn test_loading_session_waits() {
        let decision = decide(&Session::loading(), "/pacientes");
        assert_eq!(decision, RouteDecision::Loading);
    }

    #[test]
    fn test_logged_out_session_redirects_with_location() {
        let decision = decide(&Session::logged_out(), "/pacientes");
        assert_eq!(
            decision,
            RouteDecision::RedirectToSignIn {
                from: "/pacientes".to_string()
            }
        );
    }

    #[test]
    fn test_authenticated_session_renders() {
        let session = Session::authenticated(User::new("1", "ana", Role::Admin), "tok".into());
        assert!(decide(&session, "/pacientes").is_render());
    }
}
