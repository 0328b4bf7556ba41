use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use once_cell::sync::Lazy;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding};
use rsa::RsaPrivateKey;
use secrecy::Secret;
use uuid::Uuid;
use web::{
    configuration::{get_configuration, Settings},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_SIGNING_KEY: &str = include_str!("fixtures/test_signing_key.pem");
pub const ALTERNATE_SIGNING_KEY: &str = include_str!("fixtures/alternate_signing_key.pem");

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub session_token: String,
    pub user_id: String,
    // Held so the mock identity provider outlives the test.
    pub identity_provider: MockServer,
}

impl TestApp {
    pub async fn post_token(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/sso/token", &self.address))
            .bearer_auth(&self.session_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_token_unauthenticated(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/sso/token", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_debug_config(&self, authenticated: bool) -> reqwest::Response {
        let mut request = self
            .api_client
            .get(&format!("{}/api/debug/config", &self.address));
        if authenticated {
            request = request.bearer_auth(&self.session_token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn get_healthcheck(&self) -> reqwest::Response {
        self.api_client
            .get(&format!("{}/health_check", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Spin up the application with a valid directly-configured signing key.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|settings| {
        settings.signing.private_key = Some(Secret::new(TEST_SIGNING_KEY.to_string()));
    })
    .await
}

/// Spin up the application, letting the test customize settings after
/// the identity provider has been wired in. By default no signing key
/// source is configured.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
    // Singleton Pattern
    Lazy::force(&TRACING);

    let identity_provider = MockServer::start().await;
    let session_token = Uuid::new_v4().to_string();
    let user_id = format!("user_{}", Uuid::new_v4());

    // Only the test's own session token verifies; anything else gets the
    // mock's 404 and is treated as rejected.
    Mock::given(method("GET"))
        .and(path("/v1/sessions/verify"))
        .and(header(
            "Authorization",
            format!("Bearer {}", session_token).as_str(),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "user_id": user_id })),
        )
        .mount(&identity_provider)
        .await;

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration");
        // Wildcard port, the system will find available port
        c.application.port = 0;
        c.auth.provider_url = identity_provider.uri();
        c.signing.private_key = None;
        c.signing.private_key_base64 = None;
        c.signing.private_key_file = None;
        customize(&mut c);
        c
    };
    let app = Application::build(configuration)
        .await
        .expect("Failed to build application");
    let port = app.port();
    let address = format!("http://127.0.0.1:{}", port);

    // Run the application
    let _ = tokio::spawn(app.run_until_stopped());
    TestApp {
        address,
        port,
        api_client,
        session_token,
        user_id,
        identity_provider,
    }
}

/// Decode and verify a compact token against the public half of the
/// given private key, returning the raw claims.
pub fn decode_claims(token: &str, private_key_pem: &str) -> serde_json::Value {
    let private = RsaPrivateKey::from_pkcs1_pem(private_key_pem).expect("invalid test key");
    let public_pem = private
        .to_public_key()
        .to_pkcs1_pem(LineEnding::LF)
        .expect("failed to encode public key");
    let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes()).unwrap();
    let validation = Validation::new(Algorithm::RS256);
    jsonwebtoken::decode::<serde_json::Value>(token, &decoding_key, &validation)
        .expect("token failed verification")
        .claims
}
