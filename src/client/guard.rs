use crate::client::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// Where the client is, or wants to go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub pathname: String,
    pub search: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: String::new(),
        }
    }

    /// Splits `"/quiz/1?tab=edit"` into path and query.
    pub fn parse(target: &str) -> Self {
        match target.find('?') {
            Some(idx) => Self {
                pathname: target[..idx].to_string(),
                search: target[idx..].to_string(),
            },
            None => Self::new(target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session restore still in flight. Render a neutral placeholder only.
    Pending,
    Allow,
    Redirect {
        to: String,
        /// Location the user asked for, handed to the login view.
        from: Location,
        /// Replace the history entry instead of pushing a new one.
        replace: bool,
    },
}

/// Gate for views that need a logged-in user.
pub struct RouteGuard;

impl RouteGuard {
    pub fn check(session: &Session, requested: &Location) -> GuardDecision {
        if session.is_loading {
            return GuardDecision::Pending;
        }

        if session.is_logged_in() {
            return GuardDecision::Allow;
        }

        log::debug!("Redirecting {} to {}", requested.pathname, LOGIN_PATH);
        GuardDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            from: requested.clone(),
            replace: true,
        }
    }
}

/// Where to land after a successful login.
pub fn post_login_destination(from: Option<&Location>) -> String {
    from.map(|l| l.pathname.as_str())
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_LANDING_PATH)
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Dashboard,
    Login,
    Signup,
    Study,
    CreateQuiz,
    TimedQuizzes,
    ViewQuizzes,
    Quiz,
    EditQuiz,
    MyAttempts,
}

#[derive(Debug, Clone, Copy)]
struct Route {
    pattern: &'static str,
    view: View,
    protected: bool,
}

const ROUTES: &[Route] = &[
    Route { pattern: "/", view: View::Home, protected: false },
    Route { pattern: "/dashboard", view: View::Dashboard, protected: false },
    Route { pattern: "/login", view: View::Login, protected: false },
    Route { pattern: "/signup", view: View::Signup, protected: false },
    Route { pattern: "/study", view: View::Study, protected: true },
    Route { pattern: "/create-quiz", view: View::CreateQuiz, protected: true },
    Route { pattern: "/timed-quizzes", view: View::TimedQuizzes, protected: true },
    Route { pattern: "/view-quizzes", view: View::ViewQuizzes, protected: true },
    Route { pattern: "/quiz/:id", view: View::Quiz, protected: true },
    Route { pattern: "/quiz/:id/edit", view: View::EditQuiz, protected: true },
    Route { pattern: "/my-attempts", view: View::MyAttempts, protected: true },
];

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut wanted = segments(pattern);
    let mut actual = segments(path);
    loop {
        match (wanted.next(), actual.next()) {
            (None, None) => return true,
            (Some(w), Some(_)) if w.starts_with(':') => continue,
            (Some(w), Some(a)) if w == a => continue,
            _ => return false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(View),
    Pending,
    Redirect {
        to: String,
        from: Location,
        replace: bool,
    },
    NotFound,
}

/// The application's views and which of them sit behind the guard.
pub struct RouteTable;

impl RouteTable {
    pub fn resolve(pathname: &str) -> Option<(View, bool)> {
        ROUTES
            .iter()
            .find(|r| pattern_matches(r.pattern, pathname))
            .map(|r| (r.view, r.protected))
    }

    pub fn is_protected(pathname: &str) -> bool {
        Self::resolve(pathname).map_or(false, |(_, protected)| protected)
    }

    pub fn navigate(target: &str, session: &Session) -> Navigation {
        let location = Location::parse(target);
        let Some((view, protected)) = Self::resolve(&location.pathname) else {
            return Navigation::NotFound;
        };

        if !protected {
            return Navigation::Render(view);
        }

        match RouteGuard::check(session, &location) {
            GuardDecision::Pending => Navigation::Pending,
            GuardDecision::Allow => Navigation::Render(view),
            GuardDecision::Redirect { to, from, replace } => Navigation::Redirect { to, from, replace },
        }
    }
}
