#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Tests for the protected `/files/` tree.

use salvo::http::{Method, StatusCode};

use super::helpers::{TestRequest, TestSite};

#[test_log::test(tokio::test)]
async fn anonymous_download_is_denied() {
    let site = TestSite::new().await;

    let res = TestRequest::get("/files/slides/f.pdf")
        .send(&site.service)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    assert_eq!(res.text(), "Access deny");
}

#[test_log::test(tokio::test)]
async fn logged_in_download_is_served() {
    let site = TestSite::new().await;
    let cookie = site.login("A001").await;

    let res = TestRequest::get("/files/slides/f.pdf")
        .cookie(&cookie)
        .send(&site.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(res.text(), "slides f");
}

#[test_log::test(tokio::test)]
async fn nested_and_course_files_are_served() {
    let site = TestSite::new().await;
    let cookie = site.login("A002").await;

    let res = TestRequest::get("/files/slides/sub/inner.pdf")
        .cookie(&cookie)
        .send(&site.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(res.text(), "inner");

    let res = TestRequest::get("/files/course-notes/course/week1.pdf")
        .cookie(&cookie)
        .send(&site.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(res.text(), "week 1");
}

#[test_log::test(tokio::test)]
async fn directory_request_redirects_without_session() {
    let site = TestSite::new().await;

    let res = TestRequest::get("/files/slides/")
        .send(&site.service)
        .await
        .assert_status(StatusCode::FOUND);
    assert_eq!(res.header("location"), Some("/error/403"));
}

#[test_log::test(tokio::test)]
async fn directory_request_redirects_with_session() {
    let site = TestSite::new().await;
    let cookie = site.login("A001").await;

    let res = TestRequest::get("/files/slides/")
        .cookie(&cookie)
        .send(&site.service)
        .await
        .assert_status(StatusCode::FOUND);
    assert_eq!(res.header("location"), Some("/error/403"));
}

#[test_log::test(tokio::test)]
async fn legacy_denial_status() {
    let site = TestSite::with_config(|s| s.files.denial_status = 200).await;

    let res = TestRequest::get("/files/slides/f.pdf")
        .send(&site.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(res.text(), "Access deny");
}

#[test_log::test(tokio::test)]
async fn missing_file_is_not_found() {
    let site = TestSite::new().await;
    let cookie = site.login("A001").await;

    let _ = TestRequest::get("/files/slides/missing.pdf")
        .cookie(&cookie)
        .send(&site.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn anonymous_non_get_requests_are_denied() {
    let site = TestSite::new().await;

    for method in [Method::POST, Method::HEAD, Method::PUT, Method::DELETE] {
        let res = TestRequest::new(method.clone(), "/files/slides/f.pdf")
            .send(&site.service)
            .await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "{method} was not gated");
    }
}

#[test_log::test(tokio::test)]
async fn logged_in_head_and_post_reach_the_file() {
    let site = TestSite::new().await;
    let cookie = site.login("A001").await;

    let res = TestRequest::new(Method::HEAD, "/files/slides/f.pdf")
        .cookie(&cookie)
        .send(&site.service)
        .await
        .assert_status(StatusCode::OK);
    assert!(res.header("content-type").is_some());

    let res = TestRequest::post("/files/slides/f.pdf")
        .cookie(&cookie)
        .send(&site.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(res.text(), "slides f");
}

#[test_log::test(tokio::test)]
async fn non_get_directory_request_redirects() {
    let site = TestSite::new().await;

    let res = TestRequest::post("/files/slides/")
        .send(&site.service)
        .await
        .assert_status(StatusCode::FOUND);
    assert_eq!(res.header("location"), Some("/error/403"));
}
