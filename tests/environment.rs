//! The process-wide client and its environment fallback key.
//!
//! Environment variables are process global, so everything runs in a single
//! test in its own test binary.

use ipmonster::{Error, Options, Settings};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn environment_key_survives_unrelated_bad_settings() {
    // SAFETY: this binary runs a single test, nothing else reads the environment concurrently.
    unsafe {
        std::env::set_var("IPMONSTER_API_KEY", "from-env");
        std::env::set_var("IPMONSTER_LOG__STYLE", "colour");
    }

    assert!(matches!(Settings::from_env(), Err(Error::Config(_))));
    let settings = Settings::from_env_lenient();
    assert_eq!(settings.api_key.as_deref(), Some("from-env"));
    assert_eq!(settings.base_url, Settings::default().base_url);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/single"))
        .and(query_param("ip", "8.8.8.8"))
        .and(header("X-API-KEY", "from-env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ip": "8.8.8.8" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/multiple"))
        .and(query_param("ip", "1.1.1.1,::1"))
        .and(header("X-API-KEY", "configured"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    ipmonster::configure(Options::new().base_url(server.uri()));
    let result = ipmonster::lookup("8.8.8.8", &Options::default())
        .await
        .unwrap();
    assert_eq!(result, json!({ "ip": "8.8.8.8" }));

    ipmonster::configure(Options::new().api_key("configured"));
    ipmonster::batch_lookup(&["1.1.1.1", "bogus", "::1"], &Options::default())
        .await
        .unwrap();

    let err = ipmonster::lookup("not-an-ip", &Options::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidIp));
}
