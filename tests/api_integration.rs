use mockito::Matcher;
use nook_viewer::api::ContentService;
use nook_viewer::config::AppConfig;
use nook_viewer::internal::headings::extract_headings;

#[tokio::test]
async fn test_integration_fetch_digest_and_scan_headings() {
    let mut server = mockito::Server::new_async().await;
    let digest = r##"{"content": "# Reddit Explorer\n\n## r/rust\n\n- post one\n\n## r/programming\n\ntext"}"##;
    let mock = server
        .mock("GET", "/fetch_markdown")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("app_name".into(), "reddit_explorer".into()),
            Matcher::UrlEncoded("date".into(), "2025-06-01".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(digest)
        .create_async()
        .await;

    let service = ContentService::with_base_url(format!("{}/", server.url()));
    let markdown = service
        .fetch_markdown("reddit_explorer", "2025-06-01")
        .await
        .expect("Failed to fetch digest")
        .expect("Digest should have content");

    mock.assert_async().await;
    assert_eq!(extract_headings(&markdown), vec!["r/rust", "r/programming"]);
}

#[tokio::test]
async fn test_integration_uses_configured_server() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/fetch_markdown")
        .match_query(Matcher::UrlEncoded("app_name".into(), "tech_feed".into()))
        .with_status(200)
        .with_body(r#"{"content": false}"#)
        .create_async()
        .await;

    let config = AppConfig::parse(&format!(r#"(server: (base_url: "{}"))"#, server.url()))
        .expect("config should parse");
    let service = ContentService::new(&config.server);

    let content = service
        .fetch_markdown("tech_feed", "2025-06-01")
        .await
        .expect("Failed to fetch digest");
    assert_eq!(content, None);
}

#[tokio::test]
async fn test_integration_not_found_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/fetch_markdown")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let service = ContentService::with_base_url(server.url());
    let err = service
        .fetch_markdown("paper_summarizer", "1999-01-01")
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("paper_summarizer"));
}
