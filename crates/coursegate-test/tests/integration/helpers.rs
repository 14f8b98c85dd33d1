#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Laying out an isolated site directory (allow-list, file root, frontend)
//! - Creating the full Salvo service over it
//! - Making HTTP requests that carry a session cookie
//! - Asserting on responses
//!
//! ## Site Layout
//! ```text
//! login.txt              A001, A002
//! files/slides/          f.pdf g.pdf sub/inner.pdf
//! files/course-notes/    notes.txt course/week1.pdf
//! files/readme.txt
//! angular/               index.html main.js
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use salvo::http::header::HeaderName;
use salvo::http::{Method, ReqBody, StatusCode};
use salvo::prelude::*;
use salvo::session::MemoryStore;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};

use coursegate_test::component::allow_list::AllowList;
use coursegate_test::component::config::{
    AuthConfig, CertificationConfig, FilesConfig, FrontendConfig, LoggingConfig, ServerConfig,
    Settings, TlsConfig,
};

pub const SESSION_COOKIE: &str = "coursegate.sid";

/// Test configuration - static struct instead of loading from file.
fn test_config(base: &Path) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5800,
            tls_port: 443,
            redirect_port: 80,
            redirect_http: false,
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
            session_cookie_name: SESSION_COOKIE.to_string(),
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

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directory");
    }
    std::fs::write(path, contents).expect("write fixture file");
}

/// An isolated site directory plus the service serving it.
///
/// The directory is removed when the `TestSite` is dropped.
pub struct TestSite {
    dir: tempfile::TempDir,
    pub settings: Arc<Settings>,
    pub allow_list: Arc<AllowList>,
    pub service: Service,
}

impl TestSite {
    /// Creates a site with the default layout and configuration.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Creates a site with the default layout, letting the caller adjust the
    /// configuration before the router is built.
    pub async fn with_config(customize: impl FnOnce(&mut Settings)) -> Self {
        let dir = tempfile::tempdir().expect("create site directory");
        let base = dir.path();

        write(&base.join("login.txt"), "A001\nA002\n");
        write(&base.join("files/slides/f.pdf"), "slides f");
        write(&base.join("files/slides/g.pdf"), "slides g");
        write(&base.join("files/slides/sub/inner.pdf"), "inner");
        write(&base.join("files/course-notes/notes.txt"), "notes");
        write(&base.join("files/course-notes/course/week1.pdf"), "week 1");
        write(&base.join("files/readme.txt"), "readme");
        write(&base.join("angular/index.html"), "<html>coursegate</html>");
        write(&base.join("angular/main.js"), "console.log('app');");

        let mut settings = test_config(base);
        customize(&mut settings);
        let settings = Arc::new(settings);

        let allow_list = Arc::new(AllowList::load(settings.auth.allow_list_path.clone()).await);
        let router = coursegate_test::app::app::router(
            Arc::clone(&settings),
            Arc::clone(&allow_list),
            MemoryStore::new(),
        )
        .expect("router should build");

        Self {
            dir,
            settings,
            allow_list,
            service: Service::new(router),
        }
    }

    /// Absolute path of `relative` inside the site directory.
    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Overwrites the allow-list file. Takes effect after `/api/refresh`.
    pub fn write_allow_list(&self, contents: &str) {
        write(&self.path("login.txt"), contents);
    }

    /// Logs in with `student_id` and returns the session cookie header value.
    ///
    /// ## Panics
    /// Panics if the login is rejected or no session cookie is issued.
    pub async fn login(&self, student_id: &str) -> String {
        let res = TestRequest::post("/api/login")
            .json_body(&format!(r#"{{"student_id":"{student_id}"}}"#))
            .send(&self.service)
            .await
            .assert_status(StatusCode::OK);

        assert_eq!(res.json()["err"], "", "login for {student_id} failed");
        res.session_cookie().expect("login should issue a session cookie")
    }
}

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl TestRequest {
    /// Creates a new test request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a new GET request.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a new POST request.
    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// Adds a header to the request.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Sends a previously issued cookie (`name=value`).
    #[must_use]
    pub fn cookie(self, cookie: &str) -> Self {
        self.header("Cookie", cookie)
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn json_body(self, json: &str) -> Self {
        self.header("Content-Type", "application/json")
            .body(json.as_bytes().to_vec())
    }

    /// Sends the request to the test service and returns the response.
    ///
    /// ## Panics
    /// Panics if the response body cannot be read.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:5800{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            "POST" => TestClient::post(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        for (name, value) in self.headers {
            if let Ok(header_name) = HeaderName::try_from(name.as_str()) {
                client = client.add_header(header_name, value, true);
            }
        }

        if let Some(body_bytes) = self.body {
            client = client.body(ReqBody::Once(body_bytes.into()));
        }

        let mut response = client.send(service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        // Cookies set through the response jar are only written to headers
        // when the response is sent over the wire.
        let mut cookies: Vec<(String, String)> = response
            .cookies()
            .iter()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();
        cookies.extend(
            headers
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case("set-cookie"))
                .filter_map(|(_, v)| v.split(';').next())
                .filter_map(|pair| pair.split_once('='))
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string())),
        );

        let body: Vec<u8> = response.take_bytes(None).await.unwrap_or_default().to_vec();

        TestResponse {
            status,
            headers,
            cookies,
            body,
        }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected} but got {} (body: {})",
            self.status,
            self.text()
        );
        self
    }

    /// Returns the value of the first header named `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    ///
    /// ## Panics
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Response is not JSON ({e}): {}", self.text()))
    }

    /// The session cookie as a `name=value` pair ready for a `Cookie` header.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.cookies
            .iter()
            .find(|(name, _)| name == SESSION_COOKIE)
            .map(|(name, value)| format!("{name}={value}"))
    }
}
