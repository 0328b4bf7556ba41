use std::time::Duration;

use actix_cors::Cors;
use actix_web::{dev::Server, web::Data, App, HttpServer};
use std::{io::Error, net::TcpListener};
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::{Settings, SigningSettings},
    routes::{debug_config, health_check, issue_sso_token},
    session::SessionClient,
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address).expect(&format!(
            "Failed to bind port {}",
            configuration.application.port
        ));
        let port = listener.local_addr().unwrap().port();

        let session_client = SessionClient::new(
            configuration.auth.provider_url.clone(),
            Duration::from_millis(configuration.auth.timeout_ms),
        )?;

        let server = run(listener, configuration.signing, session_client).await?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), Error> {
        self.server.await
    }
}

async fn run(
    listener: TcpListener,
    signing: SigningSettings,
    session_client: SessionClient,
) -> Result<Server, anyhow::Error> {
    let signing = Data::new(signing);
    let session_client = Data::new(session_client);
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .max_age(3600);
        App::new()
            // Logger middleware
            // Sent active-web log to log subscriber
            .wrap(TracingLogger::default())
            .wrap(cors)
            .service(health_check)
            .service(issue_sso_token)
            .service(debug_config)
            .app_data(signing.clone())
            .app_data(session_client.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
