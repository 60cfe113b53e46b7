use http::Method;

/// What a matched request should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListUsers,
    CreateUser,
    UploadFiles,
    Login,
    GetUser,
    UpdateUser,
    DeleteUser,
}

#[derive(Debug, Clone)]
enum PathMatcher {
    /// The whole path equals this string.
    Exact(String),
    /// The path starts with this string; the rest is the user id.
    PrefixId(String),
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    matcher: PathMatcher,
    endpoint: Endpoint,
}

/// A matched route, with the raw id segment for `PrefixId` routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub endpoint: Endpoint,
    pub id: Option<&'a str>,
}

/// Routes evaluated top to bottom; the first match wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(api_base_path: &str) -> Self {
        let users = format!("{}/users", api_base_path.trim_end_matches('/'));
        let exact = |method, suffix: &str, endpoint| {
            Route { method, matcher: PathMatcher::Exact(format!("{users}{suffix}")), endpoint }
        };
        let prefix = |method, endpoint| Route { method, matcher: PathMatcher::PrefixId(format!("{users}/")), endpoint };

        let routes = vec![
            exact(Method::GET, "", Endpoint::ListUsers),
            exact(Method::POST, "", Endpoint::CreateUser),
            exact(Method::POST, "/upload", Endpoint::UploadFiles),
            exact(Method::POST, "/login", Endpoint::Login),
            prefix(Method::GET, Endpoint::GetUser),
            prefix(Method::PUT, Endpoint::UpdateUser),
            prefix(Method::DELETE, Endpoint::DeleteUser),
        ];
        Self { routes }
    }

    /// Matches the raw method token case-sensitively, so a method that isn't
    /// in the table, valid token or not, is simply a miss.
    pub fn resolve<'a>(&self, method: &str, path: &'a str) -> Option<RouteMatch<'a>> {
        self.routes.iter().filter(|route| route.method.as_str() == method).find_map(|route| {
            let endpoint = route.endpoint;
            match &route.matcher {
                PathMatcher::Exact(expected) => (path == expected).then_some(RouteMatch { endpoint, id: None }),
                PathMatcher::PrefixId(prefix) => {
                    path.strip_prefix(prefix.as_str()).map(|id| RouteMatch { endpoint, id: Some(id) })
                }
            }
        })
    }
}
