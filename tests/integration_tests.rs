mod common;

use common::{FakeClassifier, PNG_BYTES};
use env_logger::{Builder, Env};
use jangle::{
    render, ClassificationClient, ImageFile, InputMode, RequestState, Session, TransportStrategy,
};

// Initialize test logger
fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn")).try_init();
}

fn session_for(client: ClassificationClient) -> Session<ClassificationClient> {
    Session::new(client, InputMode::Tabbed)
}

#[tokio::test]
async fn test_rpc_durian_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let server = FakeClassifier::start().await;
    let client = ClassificationClient::builder()
        .with_transport(TransportStrategy::RpcPredict)
        .with_space_url(server.url("/space"))
        .build()?;
    let mut session = session_for(client);

    let state = session.submit_url(&server.url("/images/bus.png")).await?;
    let lines = render(state);
    assert_eq!(
        lines[0],
        "[will-not-eat] Jangle will NOT eat this! (It's durian — he hates durian)"
    );
    assert_eq!(lines[1], "Confidence: 87%");
    assert!(lines[2].contains("\"other\": 0.13"));
    Ok(())
}

#[tokio::test]
async fn test_file_upload_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let server = FakeClassifier::start().await;
    let client = ClassificationClient::builder()
        .with_api_base(server.url("/ok"))
        .build()?;
    let mut session = session_for(client);

    let path = std::env::temp_dir().join("jangle-integration-lunch.png");
    tokio::fs::write(&path, PNG_BYTES).await?;
    session.select_file(ImageFile::load(&path).await?)?;
    assert!(session.preview().unwrap().starts_with("data:image/png;base64,"));

    let state = session.submit_file().await?;
    assert_eq!(
        render(state),
        vec![
            "[will-not-eat] Jangle will NOT eat this! (Not food)".to_string(),
            "Confidence: 42%".to_string(),
            "All scores: {\n  \"durian\": 0.1,\n  \"inedible\": 0.42\n}".to_string(),
        ]
    );
    assert_eq!(server.recorded.uploads().len(), 1);

    tokio::fs::remove_file(&path).await?;
    Ok(())
}

#[tokio::test]
async fn test_server_error_shows_single_error_line() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let server = FakeClassifier::start().await;
    let client = ClassificationClient::builder()
        .with_api_base(server.url("/fail"))
        .build()?;
    let mut session = session_for(client);

    session.select_file(ImageFile::new("a.jpg", "image/jpeg", PNG_BYTES.to_vec()))?;
    let state = session.submit_file().await?;
    assert!(matches!(state, RequestState::Failed(_)));
    assert_eq!(render(state), vec!["Error: API request failed: 500".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_new_request_replaces_previous_outcome() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let server = FakeClassifier::start().await;
    let client = ClassificationClient::builder()
        .with_api_base(server.url("/ok"))
        .build()?;
    let mut session = session_for(client);

    session.submit_url(&server.url("/images/missing.png")).await?;
    assert_eq!(
        session.error().map(|e| e.user_message()),
        Some("Error: Failed to fetch image: 404".to_string())
    );

    session.submit_url(&server.url("/images/bus.png")).await?;
    assert!(session.error().is_none());
    assert_eq!(session.result().map(|r| r.label.as_str()), Some("inedible"));
    assert_eq!(session.preview(), Some(server.url("/images/bus.png").as_str()));
    Ok(())
}
