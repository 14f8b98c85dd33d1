//! Settings fixtures shared by the unit tests of this crate.

use std::path::{Path, PathBuf};

use crate::config::{
    AuthConfig, CertificationConfig, FilesConfig, FrontendConfig, LoggingConfig, ServerConfig,
    Settings, TlsConfig,
};

pub fn test_settings(base: &Path) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5800,
            tls_port: 443,
            redirect_port: 80,
            redirect_http: true,
            request_timeout_secs: 30,
        },
        tls: TlsConfig {
            domain: String::new(),
            autocert: false,
            certification: CertificationConfig {
                crt: PathBuf::new(),
                key: PathBuf::new(),
            },
            acme_cache_dir: base.join("acme"),
        },
        auth: AuthConfig {
            allow_list_path: base.join("login.txt"),
            session_cookie_name: "coursegate.sid".to_string(),
            session_ttl_secs: 3600,
            session_cleanup_secs: 60,
            session_secret: None,
        },
        files: FilesConfig {
            root: base.join("files"),
            url_prefix: "files".to_string(),
            course_dir: "course".to_string(),
            course_in_url: false,
            denial_status: 403,
            error_page: "/error/403".to_string(),
        },
        frontend: FrontendConfig {
            root: base.join("angular"),
            index: "index.html".to_string(),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
    }
}
