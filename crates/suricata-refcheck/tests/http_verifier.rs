//! HTTP strategy against a local mock server.

use std::time::Duration;
use suricata_refcheck::status::{Status, UNKNOWN_DESCRIPTION};
use suricata_refcheck::verify::{HttpVerifier, Verifier};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn verifier() -> HttpVerifier {
    HttpVerifier::new(Duration::from_secs(5), "refcheck-test").unwrap()
}

async fn server_with(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_200_is_success() {
    let server = server_with("/ioc", ResponseTemplate::new(200).set_body_string("ok")).await;
    let url = format!("{}/ioc", server.uri());

    let outcome = verifier().verify(&url).await.unwrap();
    assert_eq!(outcome.status, Status::Http(200));
    assert_eq!(outcome.description, "Sucesso");
    assert_eq!(outcome.url, url);
}

#[tokio::test]
async fn test_404_is_described() {
    let server = server_with("/gone", ResponseTemplate::new(404)).await;
    let outcome = verifier()
        .verify(&format!("{}/gone", server.uri()))
        .await
        .unwrap();
    assert_eq!(outcome.status, Status::Http(404));
    assert_eq!(outcome.description, "Página Não Encontrada");
    assert!(!outcome.status.is_success());
}

#[tokio::test]
async fn test_unmapped_code_gets_default_description() {
    let server = server_with("/teapot", ResponseTemplate::new(418)).await;
    let outcome = verifier()
        .verify(&format!("{}/teapot", server.uri()))
        .await
        .unwrap();
    assert_eq!(outcome.status, Status::Http(418));
    assert_eq!(outcome.description, UNKNOWN_DESCRIPTION);
}

#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = verifier()
        .verify(&format!("{}/flaky", server.uri()))
        .await
        .unwrap();
    assert_eq!(outcome.status, Status::Http(503));
    assert_eq!(outcome.description, "Serviço Indisponível");
    server.verify().await;
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let outcome = verifier()
        .verify(&format!("{}/old", server.uri()))
        .await
        .unwrap();
    assert_eq!(outcome.status, Status::Http(200));
}

#[tokio::test]
async fn test_timeout_becomes_error_outcome() {
    let server = server_with(
        "/slow",
        ResponseTemplate::new(200).set_delay(Duration::from_secs(3)),
    )
    .await;
    let verifier = HttpVerifier::new(Duration::from_millis(200), "refcheck-test").unwrap();

    let outcome = verifier
        .verify(&format!("{}/slow", server.uri()))
        .await
        .unwrap();
    assert_eq!(outcome.status, Status::Error);
    assert!(!outcome.description.is_empty());
}

#[tokio::test]
async fn test_unresolvable_host_becomes_error_outcome() {
    let outcome = verifier()
        .verify("https://refcheck-unreachable.invalid/path")
        .await
        .unwrap();
    assert_eq!(outcome.status, Status::Error);
    assert_eq!(outcome.status.to_string(), "Erro");
}
