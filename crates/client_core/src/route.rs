#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Search,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Search => "/search",
        }
    }

    /// Maps a location to a route. The root and unknown paths land on login.
    pub fn resolve(path: &str) -> Self {
        match path.trim().trim_end_matches('/') {
            "/register" => Self::Register,
            "/search" => Self::Search,
            _ => Self::Login,
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, Self::Search)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
