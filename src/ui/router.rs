use strum::{Display, EnumIter, IntoEnumIterator};

/// Pages reachable by static path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
        }
    }

    /// Exact match on the path, ignoring one trailing slash
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim();
        let normalized = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };
        Route::iter().find(|route| route.path() == normalized)
    }

    /// Function key (F1..F4) that navigates to this page
    pub fn function_key(self) -> u8 {
        match self {
            Route::Home => 1,
            Route::Login => 2,
            Route::Register => 3,
            Route::Dashboard => 4,
        }
    }

    pub fn from_function_key(n: u8) -> Option<Route> {
        Route::iter().find(|route| route.function_key() == n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_route_matches_its_own_path() {
        for route in Route::iter() {
            assert_eq!(Route::from_path(route.path()), Some(route));
            assert_eq!(Route::from_function_key(route.function_key()), Some(route));
        }
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        assert_eq!(Route::from_path("/login/"), Some(Route::Login));
        assert_eq!(Route::from_path("/"), Some(Route::Home));
    }

    #[test]
    fn unknown_paths_do_not_match() {
        assert_eq!(Route::from_path("/admin"), None);
        assert_eq!(Route::from_path("login"), None);
        assert_eq!(Route::from_path(""), None);
        assert_eq!(Route::from_path("/login/extra"), None);
        assert_eq!(Route::from_function_key(9), None);
    }
}
