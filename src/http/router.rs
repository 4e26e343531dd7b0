use crate::http::handler::HandlerFunc;
use crate::http::method::Method;
use crate::http::parse::normalize_path;
use std::collections::HashMap;
use tracing::debug;

/// Outcome of looking a request up in the [`Router`].
pub enum Verdict<'a> {
    Matched(&'a HandlerFunc),
    /// The path exists, but not under the requested method.
    MethodNotAllowed,
    NotFound,
}

impl Verdict<'_> {
    pub fn is_matched(&self) -> bool {
        matches!(self, Verdict::Matched(_))
    }
}

impl std::fmt::Debug for Verdict<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Matched(_) => f.write_str("Matched"),
            Verdict::MethodNotAllowed => f.write_str("MethodNotAllowed"),
            Verdict::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Exact-match routing table keyed by path, then method.
///
/// Registering the same (method, path) twice replaces the earlier handler.
/// The table is filled before the server starts accepting and only read
/// afterwards.
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, HashMap<Method, HandlerFunc>>,
}

impl Router {
    pub fn new() -> Router {
        Router::default()
    }

    /// Registers `f` for (method, path). The path is normalized the same way
    /// request paths are, so `/hello/` and `/hello` name the same route.
    pub fn register(&mut self, method: Method, path: &str, f: HandlerFunc) {
        let path = normalize_path(path);
        let replaced = self
            .routes
            .entry(path.clone())
            .or_default()
            .insert(method.clone(), f)
            .is_some();

        if replaced {
            debug!(%method, %path, "replaced existing route");
        } else {
            debug!(%method, %path, "registered route");
        }
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Verdict<'_> {
        match self.routes.get(path) {
            Some(by_method) => match by_method.get(method) {
                Some(f) => Verdict::Matched(f),
                None => Verdict::MethodNotAllowed,
            },
            None => Verdict::NotFound,
        }
    }

    /// Methods registered for `path`, sorted by name.
    pub fn allowed_methods(&self, path: &str) -> Vec<String> {
        let mut methods: Vec<String> = self
            .routes
            .get(path)
            .map(|by_method| by_method.keys().map(|m| m.to_string()).collect())
            .unwrap_or_default();
        methods.sort();
        methods
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
