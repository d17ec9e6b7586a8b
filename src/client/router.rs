//! Client route table and advisory role gate.
//!
//! Routes mirror the five screens: home, login, signup, the doctor
//! dashboard, and the patient alert form. The gate is an exact string
//! comparison of the held session's role against the route's required
//! role — a navigation convenience, not a security boundary.

use crate::client::session::Session;
use crate::models::Role;

/// The five client routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    Doctor,
    Patient,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Doctor => "/doctor",
            Route::Patient => "/patient",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        match path {
            "/" => Some(Route::Home),
            "/login" => Some(Route::Login),
            "/signup" => Some(Route::Signup),
            "/doctor" => Some(Route::Doctor),
            "/patient" => Some(Route::Patient),
            _ => None,
        }
    }

    /// Role required to view the route, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Doctor => Some(Role::Doctor),
            Route::Patient => Some(Role::Patient),
            Route::Home | Route::Login | Route::Signup => None,
        }
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
}

/// Client-side router holding the current session.
///
/// Constructed with whatever session the store had at startup and
/// updated only through `on_login` / `on_logout`.
pub struct AppRouter {
    session: Option<Session>,
}

impl AppRouter {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn on_login(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn on_logout(&mut self) {
        self.session = None;
    }

    /// Gate a route: exact role match or redirect. Absence of a
    /// session denies every gated route.
    pub fn authorize(&self, route: Route) -> RouteDecision {
        match route.required_role() {
            None => RouteDecision::Allow,
            Some(required) => match &self.session {
                Some(session) if session.role == required => RouteDecision::Allow,
                _ => RouteDecision::RedirectToLogin,
            },
        }
    }

    /// Where to land right after login.
    pub fn post_login_route(role: &Role) -> Route {
        match role {
            Role::Doctor => Route::Doctor,
            Role::Patient => Route::Patient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            email: "who@ward.example".into(),
            role,
        }
    }

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::Home,
            Route::Login,
            Route::Signup,
            Route::Doctor,
            Route::Patient,
        ] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/admin"), None);
    }

    #[test]
    fn public_routes_always_allow() {
        let router = AppRouter::new(None);
        assert_eq!(router.authorize(Route::Home), RouteDecision::Allow);
        assert_eq!(router.authorize(Route::Login), RouteDecision::Allow);
        assert_eq!(router.authorize(Route::Signup), RouteDecision::Allow);
    }

    #[test]
    fn doctor_route_requires_doctor_role() {
        let router = AppRouter::new(Some(session(Role::Doctor)));
        assert_eq!(router.authorize(Route::Doctor), RouteDecision::Allow);

        let router = AppRouter::new(Some(session(Role::Patient)));
        assert_eq!(
            router.authorize(Route::Doctor),
            RouteDecision::RedirectToLogin
        );

        let router = AppRouter::new(None);
        assert_eq!(
            router.authorize(Route::Doctor),
            RouteDecision::RedirectToLogin
        );
    }

    #[test]
    fn patient_route_requires_patient_role() {
        let router = AppRouter::new(Some(session(Role::Patient)));
        assert_eq!(router.authorize(Route::Patient), RouteDecision::Allow);

        let router = AppRouter::new(Some(session(Role::Doctor)));
        assert_eq!(
            router.authorize(Route::Patient),
            RouteDecision::RedirectToLogin
        );
    }

    #[test]
    fn login_and_logout_refresh_the_gate() {
        let mut router = AppRouter::new(None);
        assert_eq!(
            router.authorize(Route::Doctor),
            RouteDecision::RedirectToLogin
        );

        router.on_login(session(Role::Doctor));
        assert_eq!(router.authorize(Route::Doctor), RouteDecision::Allow);

        router.on_logout();
        assert_eq!(
            router.authorize(Route::Doctor),
            RouteDecision::RedirectToLogin
        );
    }

    #[test]
    fn post_login_routing_by_role() {
        assert_eq!(AppRouter::post_login_route(&Role::Doctor), Route::Doctor);
        assert_eq!(AppRouter::post_login_route(&Role::Patient), Route::Patient);
    }
}
