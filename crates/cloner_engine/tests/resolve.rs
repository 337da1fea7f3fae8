use std::time::Duration;

use cloner_engine::{
    FailureKind, FetchSettings, ReqwestFetcher, ResolutionError, ScraperParser, StylesheetResolver,
};
use pretty_assertions::assert_eq;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_text(server: &MockServer, at: &str, body: &str, mime: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), mime))
        .mount(server)
        .await;
}

fn fetcher() -> ReqwestFetcher {
    ReqwestFetcher::new(FetchSettings::default()).unwrap()
}

#[tokio::test]
async fn document_without_styles_resolves_to_empty_stylesheet() {
    let server = MockServer::start().await;
    let html = "<html><head><title>x</title></head><body><p>plain</p></body></html>";
    mount_text(&server, "/c/1/index.html", html, "text/html").await;

    let fetcher = fetcher();
    let origin = Url::parse(&server.uri()).unwrap();
    let resolver = StylesheetResolver::new(&fetcher, &ScraperParser, origin);
    let resolved = resolver
        .resolve(&format!("{}/c/1/index.html", server.uri()))
        .await
        .unwrap();

    assert_eq!(resolved.stylesheet_text(), "");
    assert_eq!(resolved.html_markup(), html);
}

#[tokio::test]
async fn inline_blocks_then_links_in_source_order_with_failures_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();
    let html = format!(
        r#"<html><head>
<link rel="stylesheet" href="css/first.css">
<style>h1 {{ color: red; }}</style>
<link rel="stylesheet" href="/c/1/css/missing.css">
<link rel="stylesheet" href="{base}/c/1/css/third.css">
</head><body><style>p {{ margin: 0; }}</style><h1>Hi</h1></body></html>"#
    );
    mount_text(&server, "/c/1/index.html", &html, "text/html; charset=utf-8").await;
    // The first stylesheet answers last; its block must still come first.
    Mock::given(method("GET"))
        .and(path("/c/1/css/first.css"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(150))
                .set_body_raw("body { margin: 0; }", "text/css"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c/1/css/missing.css"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_text(&server, "/c/1/css/third.css", ".third { top: 0; }", "text/css").await;

    let fetcher = fetcher();
    let origin = Url::parse(&base).unwrap();
    let resolver = StylesheetResolver::new(&fetcher, &ScraperParser, origin);
    let resolved = resolver
        .resolve(&format!("{base}/c/1/index.html"))
        .await
        .unwrap();

    let expected = format!(
        "h1 {{ color: red; }}\n\
p {{ margin: 0; }}\n\
/* {base}/c/1/css/first.css */\nbody {{ margin: 0; }}\n\
/* {base}/c/1/css/third.css */\n.third {{ top: 0; }}\n"
    );
    assert_eq!(resolved.stylesheet_text(), expected);
    assert_eq!(resolved.stylesheet_text().matches("/* ").count(), 2);
    assert_eq!(resolved.html_markup(), html);
}

#[tokio::test]
async fn foreign_stylesheets_are_fetched_by_path_from_the_service_origin() {
    let server = MockServer::start().await;
    let html = r#"<link rel="stylesheet" href="https://cdn.example.com/lib/site.css?v=3">"#;
    mount_text(&server, "/c/2/index.html", html, "text/html").await;
    Mock::given(method("GET"))
        .and(path("/lib/site.css"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("a { b: c; }", "text/css"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher();
    let origin = Url::parse(&server.uri()).unwrap();
    let resolver = StylesheetResolver::new(&fetcher, &ScraperParser, origin);
    let resolved = resolver
        .resolve(&format!("{}/c/2/index.html", server.uri()))
        .await
        .unwrap();

    assert_eq!(
        resolved.stylesheet_text(),
        "/* https://cdn.example.com/lib/site.css?v=3 */\na { b: c; }\n"
    );
}

#[tokio::test]
async fn every_linked_stylesheet_failing_still_resolves() {
    let server = MockServer::start().await;
    let html = r#"<link rel="stylesheet" href="/a.css"><link rel="stylesheet" href="/b.css"><style>x{}</style>"#;
    mount_text(&server, "/c/3/index.html", html, "text/html").await;
    Mock::given(method("GET"))
        .and(path("/a.css"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = fetcher();
    let origin = Url::parse(&server.uri()).unwrap();
    let resolver = StylesheetResolver::new(&fetcher, &ScraperParser, origin);
    let resolved = resolver
        .resolve(&format!("{}/c/3/index.html", server.uri()))
        .await
        .unwrap();

    assert_eq!(resolved.stylesheet_text(), "x{}\n");
}

#[tokio::test]
async fn missing_root_document_fails_resolution() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/c/4/index.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = fetcher();
    let origin = Url::parse(&server.uri()).unwrap();
    let resolver = StylesheetResolver::new(&fetcher, &ScraperParser, origin);
    let url = format!("{}/c/4/index.html", server.uri());
    let err = resolver.resolve(&url).await.unwrap_err();

    match err {
        ResolutionError::RootFetchFailed { url: failed, source } => {
            assert_eq!(failed, url);
            assert_eq!(source.kind, FailureKind::HttpStatus(404));
        }
    }
}

#[tokio::test]
async fn malformed_bytes_are_replaced_instead_of_failing() {
    let server = MockServer::start().await;
    let mut html = b"<link rel=\"stylesheet\" href=\"/s.css\"><p>caf".to_vec();
    html.push(0xE9);
    html.extend_from_slice(b"</p>");
    Mock::given(method("GET"))
        .and(path("/c/5/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(&server)
        .await;
    let mut css = b"p::after { content: \"".to_vec();
    css.push(0xFF);
    css.extend_from_slice(b"\"; }");
    Mock::given(method("GET"))
        .and(path("/s.css"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(css, "text/css; charset=utf-8"))
        .mount(&server)
        .await;

    let fetcher = fetcher();
    let origin = Url::parse(&server.uri()).unwrap();
    let resolver = StylesheetResolver::new(&fetcher, &ScraperParser, origin);
    let resolved = resolver
        .resolve(&format!("{}/c/5/index.html", server.uri()))
        .await
        .unwrap();

    assert_eq!(
        resolved.html_markup(),
        "<link rel=\"stylesheet\" href=\"/s.css\"><p>caf\u{FFFD}</p>"
    );
    assert_eq!(
        resolved.stylesheet_text(),
        format!(
            "/* {}/s.css */\np::after {{ content: \"\u{FFFD}\"; }}\n",
            server.uri()
        )
    );
}
