//! Integration tests for the triggered digest pipeline
//!
//! These tests drive `run_digest` end-to-end against wiremock stand-ins
//! for the forum, the token endpoint, and the mail provider, and verify
//! the status contract: 200 for success or nothing-to-do, 400 for a
//! keyword-list failure, 500 for an authorization or send failure.

use fauna_watch::config::{
    Config, EmailConfig, Environment, FetchConfig, FetchMode, ForumConfig, OutputConfig,
    RuntimeConfig,
};
use fauna_watch::handler::{run_digest, Trigger};
use std::path::PathBuf;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/forums/forums/turtles-tortoises.54/";
const SEND_PATH: &str = "/gmail/v1/users/me/messages/send";

fn thread_item(title: &str, href: &str) -> String {
    format!(
        r#"<div class="structItem structItem--thread">
            <h3 class="structItem-title">
                <a href="{href}" data-tp-primary="on">{title}</a>
            </h3>
            <a class="username" href="/members/poster/">poster</a>
        </div>"#
    )
}

fn listing_page(items: &[String]) -> String {
    format!("<html><body>{}</body></html>", items.join("\n"))
}

/// Test fixture: temp dir for keyword/token files plus a config wired
/// to the mock servers
struct Fixture {
    config: Config,
    _dir: tempfile::TempDir,
}

impl Fixture {
    fn new(forum_url: &str, mail_url: &str, environment: Environment) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            forum: ForumConfig {
                base_url: forum_url.to_string(),
                listing_path: LISTING_PATH.to_string(),
                page_count: 1,
                page_delay_ms: 10,
            },
            fetch: FetchConfig {
                mode: FetchMode::Direct,
                user_agent: "TestAgent/1.0".to_string(),
                proxy_endpoint: "https://proxy.invalid/request".to_string(),
                proxy_zone: "test_zone".to_string(),
                proxy_token: None,
            },
            email: EmailConfig {
                recipient: "keeper@example.com".to_string(),
                subject: "New Forum Posts Found!".to_string(),
                token_path: dir.path().join("token.json").display().to_string(),
                credentials_path: dir.path().join("credentials.json").display().to_string(),
                api_base: mail_url.to_string(),
            },
            output: OutputConfig {
                keywords_path: dir.path().join("keywords.json").display().to_string(),
                records_path: dir.path().join("forum_posts.json").display().to_string(),
            },
            runtime: RuntimeConfig { environment },
        };
        Self { config, _dir: dir }
    }

    fn write_keywords(&self, content: &str) {
        std::fs::write(&self.config.output.keywords_path, content).unwrap();
    }

    fn write_token(&self, access_token: &str, refresh_token: Option<&str>, expiry: &str, token_uri: &str) {
        let refresh = match refresh_token {
            Some(r) => format!(r#""refresh_token": "{}","#, r),
            None => String::new(),
        };
        let json = format!(
            r#"{{
                "access_token": "{access_token}",
                {refresh}
                "client_id": "client-id",
                "client_secret": "client-secret",
                "token_uri": "{token_uri}",
                "expiry": "{expiry}"
            }}"#
        );
        std::fs::write(&self.config.email.token_path, json).unwrap();
    }

    fn token_path(&self) -> PathBuf {
        PathBuf::from(&self.config.email.token_path)
    }
}

/// Mounts a single listing page with the given thread titles
async fn mount_listing(server: &MockServer, titles: &[&str]) {
    let items: Vec<String> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| thread_item(title, &format!("/threads/t.{}/", i + 1)))
        .collect();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&items)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_missing_keyword_file_yields_400() {
    let forum = MockServer::start().await;
    let mail = MockServer::start().await;
    mount_listing(&forum, &["Red Eared Slider for sale"]).await;

    let fixture = Fixture::new(&forum.uri(), &mail.uri(), Environment::Ephemeral);
    // No keyword file written

    let outcome = run_digest(&fixture.config, Trigger::default()).await;
    assert_eq!(outcome.status_code, 400);
    assert!(outcome.body.contains("keywords"));
}

#[tokio::test]
async fn test_empty_keyword_list_yields_400() {
    let forum = MockServer::start().await;
    let mail = MockServer::start().await;
    mount_listing(&forum, &["Red Eared Slider for sale"]).await;

    let fixture = Fixture::new(&forum.uri(), &mail.uri(), Environment::Ephemeral);
    fixture.write_keywords("[]");

    let outcome = run_digest(&fixture.config, Trigger::default()).await;
    assert_eq!(outcome.status_code, 400);
}

#[tokio::test]
async fn test_no_matches_yields_200_without_touching_the_notifier() {
    let forum = MockServer::start().await;
    let mail = MockServer::start().await;
    mount_listing(&forum, &["Heat lamp question", "Substrate advice"]).await;

    // The notifier must never be invoked on the nothing-to-do path
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mail)
        .await;

    let fixture = Fixture::new(&forum.uri(), &mail.uri(), Environment::Ephemeral);
    fixture.write_keywords(r#"["slider"]"#);

    let outcome = run_digest(&fixture.config, Trigger::default()).await;
    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.body, "No new posts matching keywords.");
}

#[tokio::test]
async fn test_match_with_successful_send_yields_200_with_count() {
    let forum = MockServer::start().await;
    let mail = MockServer::start().await;
    mount_listing(&forum, &["Red Eared Slider for sale", "Heat lamp question"]).await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(header("Authorization", "Bearer access-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "msg-1" })),
        )
        .expect(1)
        .mount(&mail)
        .await;

    let fixture = Fixture::new(&forum.uri(), &mail.uri(), Environment::Ephemeral);
    fixture.write_keywords(r#"["slider"]"#);
    fixture.write_token(
        "access-123",
        None,
        "2099-01-01T00:00:00Z",
        "https://oauth2.invalid/token",
    );

    let outcome = run_digest(&fixture.config, Trigger::default()).await;
    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.body, "Email sent with 1 posts.");
}

#[tokio::test]
async fn test_send_failure_yields_500() {
    let forum = MockServer::start().await;
    let mail = MockServer::start().await;
    mount_listing(&forum, &["Red Eared Slider for sale"]).await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .mount(&mail)
        .await;

    let fixture = Fixture::new(&forum.uri(), &mail.uri(), Environment::Ephemeral);
    fixture.write_keywords(r#"["slider"]"#);
    fixture.write_token(
        "access-123",
        None,
        "2099-01-01T00:00:00Z",
        "https://oauth2.invalid/token",
    );

    let outcome = run_digest(&fixture.config, Trigger::default()).await;
    assert_eq!(outcome.status_code, 500);
    assert_eq!(outcome.body, "Failed to send email.");
}

#[tokio::test]
async fn test_missing_credential_in_ephemeral_environment_yields_500() {
    let forum = MockServer::start().await;
    let mail = MockServer::start().await;
    mount_listing(&forum, &["Red Eared Slider for sale"]).await;

    let fixture = Fixture::new(&forum.uri(), &mail.uri(), Environment::Ephemeral);
    fixture.write_keywords(r#"["slider"]"#);
    // No token file: the grant flow needs a console and must fail fast

    let outcome = run_digest(&fixture.config, Trigger::default()).await;
    assert_eq!(outcome.status_code, 500);
}

#[tokio::test]
async fn test_expired_token_refresh_is_use_once_in_ephemeral_environment() {
    let forum = MockServer::start().await;
    let mail = MockServer::start().await;
    mount_listing(&forum, &["Red Eared Slider for sale"]).await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "refreshed-token",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mail)
        .await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(header("Authorization", "Bearer refreshed-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "msg-2" })),
        )
        .expect(1)
        .mount(&mail)
        .await;

    let fixture = Fixture::new(&forum.uri(), &mail.uri(), Environment::Ephemeral);
    fixture.write_keywords(r#"["slider"]"#);
    let token_uri = format!("{}/token", mail.uri());
    fixture.write_token("stale-token", Some("refresh-456"), "2020-01-01T00:00:00Z", &token_uri);
    let before = std::fs::read_to_string(fixture.token_path()).unwrap();

    let outcome = run_digest(&fixture.config, Trigger::default()).await;
    assert_eq!(outcome.status_code, 200);

    // The refreshed token was used once and never written back
    let after = std::fs::read_to_string(fixture.token_path()).unwrap();
    assert_eq!(before, after);
    assert!(!after.contains("refreshed-token"));
}

#[tokio::test]
async fn test_expired_token_refresh_is_persisted_in_interactive_environment() {
    let forum = MockServer::start().await;
    let mail = MockServer::start().await;
    mount_listing(&forum, &["Red Eared Slider for sale"]).await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "refreshed-token",
            "expires_in": 3600
        })))
        .mount(&mail)
        .await;

    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "msg-3" })),
        )
        .mount(&mail)
        .await;

    let fixture = Fixture::new(&forum.uri(), &mail.uri(), Environment::Interactive);
    fixture.write_keywords(r#"["slider"]"#);
    let token_uri = format!("{}/token", mail.uri());
    fixture.write_token("stale-token", Some("refresh-456"), "2020-01-01T00:00:00Z", &token_uri);

    let outcome = run_digest(&fixture.config, Trigger::default()).await;
    assert_eq!(outcome.status_code, 200);

    // The refreshed token was written back, keeping the refresh token
    let after = std::fs::read_to_string(fixture.token_path()).unwrap();
    assert!(after.contains("refreshed-token"));
    assert!(after.contains("refresh-456"));
}

#[tokio::test]
async fn test_failed_walk_still_reaches_the_keyword_gate() {
    // The forum being down shortens the walk to nothing; the run still
    // terminates with the nothing-to-do status, not an abort
    let forum = MockServer::start().await;
    let mail = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&forum)
        .await;

    let fixture = Fixture::new(&forum.uri(), &mail.uri(), Environment::Ephemeral);
    fixture.write_keywords(r#"["slider"]"#);

    let outcome = run_digest(&fixture.config, Trigger::default()).await;
    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.body, "No new posts matching keywords.");
}
