use salvo::Router;
use salvo::caching_headers::CachingHeaders;
use salvo::serve_static::StaticDir;

use coursegate_core::config::Settings;

/// Prebuilt single-page application assets. Must be pushed last: it matches
/// every path and method.
#[must_use]
pub fn routes(settings: &Settings) -> Router {
    Router::with_path("{**path}").hoop(CachingHeaders::new()).goal(
        StaticDir::new(vec![settings.frontend.root.clone()])
            .defaults(settings.frontend.index.clone())
            .auto_list(false),
    )
}
