//! Progressive web app settings.
//!
//! The service worker served at `/sw.js` is rendered from the constants and
//! the strategy table in this module, so cache names, limits and the order
//! in which strategies are tried are defined once and unit tested here.

/// Prefix shared by every cache this app owns. Caches with this prefix but
/// an unknown name are deleted when a new worker activates.
pub const CACHE_PREFIX: &str = "naqlah-";

/// Version baked into cache names. Bump to invalidate all caches.
pub const CACHE_VERSION: &str = "naqlah-v1";

/// URLs cached when the worker installs.
pub const PRECACHE_URLS: [&str; 4] = ["/", "/manifest.json", "/static/images/logo.svg", "/offline"];

/// Page served from the cache when a navigation fails offline.
pub const OFFLINE_URL: &str = "/offline";

pub const DYNAMIC_CACHE_LIMIT: usize = 50;
pub const IMAGE_CACHE_LIMIT: usize = 60;

/// Brand colour used in the browser chrome on marketing pages.
pub const THEME_BRAND: &str = "#00B8A9";
/// Colour used inside the logged-in app.
pub const THEME_APP: &str = "#fff";

/// Pages that use the app layout rather than the marketing layout.
pub const APP_PATHS: [&str; 4] = ["/dashboard", "/profile", "/settings", "/register-company"];

/// Named caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheName {
    Static,
    Dynamic,
    Images,
    Fonts,
}

impl CacheName {
    pub const ALL: [Self; 4] = [Self::Static, Self::Dynamic, Self::Images, Self::Fonts];

    /// Full cache name, e.g. `naqlah-v1-static`.
    #[must_use]
    pub fn name(self) -> String {
        let suffix = match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
            Self::Images => "images",
            Self::Fonts => "fonts",
        };
        format!("{CACHE_VERSION}-{suffix}")
    }
}

/// How a request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Serve from cache, fetch and store on a miss.
    CacheFirst,
    /// Fetch and store, fall back to cache when offline.
    NetworkFirst,
    /// Serve from cache immediately and refresh it in the background.
    StaleWhileRevalidate,
}

impl Strategy {
    /// Name of the worker function implementing the strategy.
    #[must_use]
    pub const fn js_function(self) -> &'static str {
        match self {
            Self::CacheFirst => "cacheFirst",
            Self::NetworkFirst => "networkFirst",
            Self::StaleWhileRevalidate => "staleWhileRevalidate",
        }
    }
}

/// One row of the strategy table. A rule matches when the request
/// destination is listed, or the path contains / starts with the given text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheRule {
    pub destinations: &'static [&'static str],
    pub path_contains: Option<&'static str>,
    pub path_prefix: Option<&'static str>,
    pub strategy: Strategy,
    pub cache: CacheName,
    pub limit: Option<usize>,
}

impl CacheRule {
    #[must_use]
    pub fn matches(&self, destination: &str, path: &str) -> bool {
        self.destinations.contains(&destination)
            || self.path_contains.is_some_and(|p| path.contains(p))
            || self.path_prefix.is_some_and(|p| path.starts_with(p))
    }

    /// The rule's test as a JavaScript expression over `request` and `url`.
    #[must_use]
    pub fn js_condition(&self) -> String {
        let mut parts: Vec<String> = self
            .destinations
            .iter()
            .map(|d| format!("request.destination === '{d}'"))
            .collect();
        if let Some(p) = self.path_contains {
            parts.push(format!("url.pathname.includes('{p}')"));
        }
        if let Some(p) = self.path_prefix {
            parts.push(format!("url.pathname.startsWith('{p}')"));
        }
        if parts.is_empty() {
            "true".to_owned()
        } else {
            parts.join(" || ")
        }
    }

    /// The strategy call as a JavaScript expression.
    #[must_use]
    pub fn js_call(&self) -> String {
        let limit = self
            .limit
            .map_or_else(|| "undefined".to_owned(), |l| l.to_string());
        format!(
            "{}(request, '{}', {limit})",
            self.strategy.js_function(),
            self.cache.name()
        )
    }
}

/// Strategy table, first match wins.
pub static CACHE_RULES: [CacheRule; 5] = [
    CacheRule {
        destinations: &["image"],
        path_contains: None,
        path_prefix: None,
        strategy: Strategy::CacheFirst,
        cache: CacheName::Images,
        limit: Some(IMAGE_CACHE_LIMIT),
    },
    CacheRule {
        destinations: &["font"],
        path_contains: Some("/fonts/"),
        path_prefix: None,
        strategy: Strategy::CacheFirst,
        cache: CacheName::Fonts,
        limit: None,
    },
    CacheRule {
        destinations: &["document"],
        path_contains: None,
        path_prefix: Some("/api/"),
        strategy: Strategy::NetworkFirst,
        cache: CacheName::Dynamic,
        limit: Some(DYNAMIC_CACHE_LIMIT),
    },
    CacheRule {
        destinations: &["script", "style"],
        path_contains: None,
        path_prefix: None,
        strategy: Strategy::StaleWhileRevalidate,
        cache: CacheName::Static,
        limit: None,
    },
    CacheRule {
        destinations: &[],
        path_contains: None,
        path_prefix: Some("/static/"),
        strategy: Strategy::CacheFirst,
        cache: CacheName::Static,
        limit: None,
    },
];

/// Used when no rule in [`CACHE_RULES`] matches.
pub static DEFAULT_RULE: CacheRule = CacheRule {
    destinations: &[],
    path_contains: None,
    path_prefix: None,
    strategy: Strategy::NetworkFirst,
    cache: CacheName::Dynamic,
    limit: Some(DYNAMIC_CACHE_LIMIT),
};

/// Pick the rule the worker will apply to a request.
#[must_use]
pub fn select_rule(destination: &str, path: &str) -> &'static CacheRule {
    CACHE_RULES
        .iter()
        .find(|rule| rule.matches(destination, path))
        .unwrap_or(&DEFAULT_RULE)
}

/// Status the worker answers with when both network and cache fail.
#[must_use]
pub const fn offline_status(is_document: bool) -> u16 {
    if is_document { 503 } else { 408 }
}

/// `theme-color` for a page.
#[must_use]
pub fn theme_color(path: &str, logged_in: bool) -> &'static str {
    let app_page = APP_PATHS
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{p}/")));
    if logged_in || app_page {
        THEME_APP
    } else {
        THEME_BRAND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_names() {
        assert_eq!(CacheName::Static.name(), "naqlah-v1-static");
        assert_eq!(CacheName::Dynamic.name(), "naqlah-v1-dynamic");
        assert_eq!(CacheName::Images.name(), "naqlah-v1-images");
        assert_eq!(CacheName::Fonts.name(), "naqlah-v1-fonts");
        assert!(CacheName::ALL.iter().all(|c| c.name().starts_with(CACHE_PREFIX)));
    }

    #[test]
    fn test_images_are_cache_first_with_limit() {
        let rule = select_rule("image", "/static/images/logo.svg");
        assert_eq!(rule.strategy, Strategy::CacheFirst);
        assert_eq!(rule.cache, CacheName::Images);
        assert_eq!(rule.limit, Some(60));
    }

    #[test]
    fn test_fonts_by_destination_or_path() {
        assert_eq!(select_rule("font", "/x.woff2").cache, CacheName::Fonts);
        assert_eq!(select_rule("", "/static/fonts/a.woff2").cache, CacheName::Fonts);
    }

    #[test]
    fn test_documents_and_api_are_network_first() {
        let rule = select_rule("document", "/request-move");
        assert_eq!(rule.strategy, Strategy::NetworkFirst);
        assert_eq!(rule.cache, CacheName::Dynamic);
        assert_eq!(select_rule("", "/api/geo/search").strategy, Strategy::NetworkFirst);
    }

    #[test]
    fn test_scripts_and_styles_revalidate() {
        assert_eq!(
            select_rule("script", "/static/js/app.js").strategy,
            Strategy::StaleWhileRevalidate
        );
        assert_eq!(
            select_rule("style", "/static/css/main.css").strategy,
            Strategy::StaleWhileRevalidate
        );
    }

    #[test]
    fn test_static_prefix_and_default() {
        let rule = select_rule("", "/static/docs/terms.pdf");
        assert_eq!(rule.strategy, Strategy::CacheFirst);
        assert_eq!(rule.cache, CacheName::Static);
        assert_eq!(select_rule("", "/manifest.json"), &DEFAULT_RULE);
    }

    #[test]
    fn test_js_rendering() {
        assert_eq!(
            CACHE_RULES[1].js_condition(),
            "request.destination === 'font' || url.pathname.includes('/fonts/')"
        );
        assert_eq!(
            CACHE_RULES[0].js_call(),
            "cacheFirst(request, 'naqlah-v1-images', 60)"
        );
        assert_eq!(
            CACHE_RULES[3].js_call(),
            "staleWhileRevalidate(request, 'naqlah-v1-static', undefined)"
        );
        assert_eq!(DEFAULT_RULE.js_condition(), "true");
    }

    #[test]
    fn test_offline_status() {
        assert_eq!(offline_status(true), 503);
        assert_eq!(offline_status(false), 408);
    }

    #[test]
    fn test_theme_color() {
        assert_eq!(theme_color("/", false), THEME_BRAND);
        assert_eq!(theme_color("/request-move", false), THEME_BRAND);
        assert_eq!(theme_color("/dashboard", false), THEME_APP);
        assert_eq!(theme_color("/settings", false), THEME_APP);
        assert_eq!(theme_color("/", true), THEME_APP);
        assert_eq!(theme_color("/dashboardx", false), THEME_BRAND);
    }
}
