//! Web app manifest, service worker and offline page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{
        HeaderName,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};

use crate::error::Result;
use crate::filters;
use crate::middleware::Page;
use crate::pwa::{self, CacheName, CacheRule};

/// Icon sizes listed in the manifest.
pub const ICON_SIZES: [u16; 8] = [72, 96, 128, 144, 152, 192, 384, 512];

/// Serve the web app manifest.
pub async fn manifest() -> Response {
    let icons: Vec<_> = ICON_SIZES
        .iter()
        .map(|size| {
            serde_json::json!({
                "src": format!("/static/images/icons/icon-{size}x{size}.png"),
                "sizes": format!("{size}x{size}"),
                "type": "image/png",
                "purpose": "any maskable"
            })
        })
        .collect();

    let manifest = serde_json::json!({
        "name": "Naqlah - نقلة",
        "short_name": "Naqlah",
        "description": "اطلب نقل أثاثك بسهولة",
        "start_url": "/",
        "scope": "/",
        "display": "standalone",
        "orientation": "portrait",
        "dir": "rtl",
        "lang": "ar",
        "theme_color": pwa::THEME_BRAND,
        "background_color": "#ffffff",
        "icons": icons
    });

    (
        [(CONTENT_TYPE, "application/manifest+json")],
        manifest.to_string(),
    )
        .into_response()
}

/// Service worker script, generated from the cache table in [`crate::pwa`].
#[derive(Template)]
#[template(path = "sw.js", escape = "none")]
pub struct ServiceWorkerTemplate {
    pub cache_prefix: &'static str,
    pub cache_names: Vec<String>,
    pub precache_urls: &'static [&'static str],
    pub offline_url: &'static str,
    pub rules: &'static [CacheRule],
    pub default_rule: &'static CacheRule,
    pub document_status: u16,
    pub other_status: u16,
}

impl Default for ServiceWorkerTemplate {
    fn default() -> Self {
        Self {
            cache_prefix: pwa::CACHE_PREFIX,
            cache_names: CacheName::ALL.into_iter().map(CacheName::name).collect(),
            precache_urls: &pwa::PRECACHE_URLS,
            offline_url: pwa::OFFLINE_URL,
            rules: &pwa::CACHE_RULES,
            default_rule: &pwa::DEFAULT_RULE,
            document_status: pwa::offline_status(true),
            other_status: pwa::offline_status(false),
        }
    }
}

/// Serve the service worker.
///
/// `no-cache` makes browsers revalidate the script on every registration
/// check, so a new cache version rolls out on the next visit.
pub async fn service_worker() -> Result<Response> {
    let script = ServiceWorkerTemplate::default().render()?;

    Ok((
        [
            (CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (CACHE_CONTROL, "no-cache"),
            (HeaderName::from_static("service-worker-allowed"), "/"),
        ],
        script,
    )
        .into_response())
}

/// Offline fallback page template.
#[derive(Template, WebTemplate)]
#[template(path = "offline.html")]
pub struct OfflineTemplate {
    pub page: Page,
}

/// Display the offline page. The service worker precaches it.
pub async fn offline(page: Page) -> impl IntoResponse {
    OfflineTemplate { page }
}
