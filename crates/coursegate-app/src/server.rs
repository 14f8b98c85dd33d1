//! Front door: picks plain HTTP or TLS from the configured port and, in TLS
//! mode, runs the HTTP-to-HTTPS redirect listener alongside.

use std::path::PathBuf;

use anyhow::Context;
use salvo::conn::TcpListener;
use salvo::conn::rustls::{Keycert, RustlsConfig};
use salvo::http::uri::Uri;
use salvo::http::{StatusCode, header::HOST};
use salvo::prelude::ListenerAcmeExt;
use salvo::writing::Redirect;
use salvo::{Listener, Request, Response, Router, Server, handler};

use coursegate_core::config::{Settings, TlsConfig};

/// Where TLS certificates come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsStrategy {
    /// Certificates issued and renewed through ACME (TLS-ALPN-01).
    Acme {
        domains: Vec<String>,
        cache_dir: PathBuf,
    },
    /// A PEM certificate chain and private key read from disk at startup.
    Certificate { crt: PathBuf, key: PathBuf },
}

impl TlsStrategy {
    #[must_use]
    pub fn from_config(tls: &TlsConfig) -> Self {
        if tls.autocert {
            Self::Acme {
                domains: tls.acme_domains(),
                cache_dir: tls.acme_cache_dir.clone(),
            }
        } else {
            Self::Certificate {
                crt: tls.certification.crt.clone(),
                key: tls.certification.key.clone(),
            }
        }
    }
}

/// ## Summary
/// Serves `router` until the server stops.
///
/// ## Errors
/// Returns an error if the TLS settings are incomplete, the certificate files
/// cannot be read or the listener cannot bind.
pub async fn serve(settings: &Settings, router: Router) -> anyhow::Result<()> {
    let bind_addr = settings.server.bind_addr(settings.server.port);

    if !settings.server.is_tls() {
        let acceptor = TcpListener::new(bind_addr.clone()).try_bind().await?;
        tracing::info!("Server listening on http://{bind_addr}");
        Server::new(acceptor).serve(router).await;
        return Ok(());
    }

    settings.validate_tls()?;

    if settings.server.redirect_http {
        spawn_https_redirect(settings.server.bind_addr(settings.server.redirect_port));
    }

    match TlsStrategy::from_config(&settings.tls) {
        TlsStrategy::Acme { domains, cache_dir } => {
            let mut listener = TcpListener::new(bind_addr.clone()).acme().cache_path(cache_dir);
            for domain in &domains {
                listener = listener.add_domain(domain.clone());
            }
            let acceptor = listener.try_bind().await?;
            tracing::info!(domains = ?domains, "Server listening on https://{bind_addr} (ACME)");
            Server::new(acceptor).serve(router).await;
        }
        TlsStrategy::Certificate { crt, key } => {
            let cert = tokio::fs::read(&crt)
                .await
                .with_context(|| format!("reading certificate {}", crt.display()))?;
            let key = tokio::fs::read(&key)
                .await
                .with_context(|| format!("reading private key {}", key.display()))?;
            let config = RustlsConfig::new(Keycert::new().cert(cert).key(key));
            let acceptor = TcpListener::new(bind_addr.clone())
                .rustls(config)
                .try_bind()
                .await?;
            tracing::info!("Server listening on https://{bind_addr}");
            Server::new(acceptor).serve(router).await;
        }
    }

    Ok(())
}

/// ## Summary
/// Starts the redirect listener in the background. A bind failure is logged
/// and does not affect the TLS listener.
pub fn spawn_https_redirect(bind_addr: String) {
    tokio::spawn(async move {
        match TcpListener::new(bind_addr.clone()).try_bind().await {
            Ok(acceptor) => {
                tracing::info!("Redirecting http://{bind_addr} to HTTPS");
                Server::new(acceptor).serve(redirect_router()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, bind_addr = %bind_addr, "Failed to bind HTTP redirect listener");
            }
        }
    });
}

#[must_use]
pub fn redirect_router() -> Router {
    Router::with_path("{**path}").goal(redirect_to_https)
}

/// `https://<host><path>[?<query>]`
#[must_use]
pub fn https_redirect_target(host: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("https://{host}{path}?{query}"),
        _ => format!("https://{host}{path}"),
    }
}

#[handler]
async fn redirect_to_https(req: &mut Request, res: &mut Response) {
    let host = req
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .or_else(|| req.uri().authority().map(|authority| authority.to_string()));

    let Some(host) = host else {
        res.status_code(StatusCode::BAD_REQUEST);
        return;
    };

    let target = https_redirect_target(&host, req.uri().path(), req.uri().query());
    if target.parse::<Uri>().is_err() {
        tracing::debug!(host = %host, "Refusing to redirect to an invalid URI");
        res.status_code(StatusCode::BAD_REQUEST);
        return;
    }

    res.render(Redirect::temporary(target));
}
