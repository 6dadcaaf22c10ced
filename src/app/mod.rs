use std::{io, net::SocketAddr, sync::Arc};

use anyhow::{anyhow, Context};
use axum::{http::Request, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::Settings, domain::business::Business, email::EmailClient, rate_limit::RateLimiter,
};

pub mod contact;
mod error;
pub mod extractor;
mod health;
mod home;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no email-service credential is configured.
    email_client: Option<EmailClient>,
    rate_limiter: RateLimiter,
    business: Arc<Business>,
}

fn app_router() -> Router<AppState> {
    health::router()
        .merge(contact::router())
        .merge(home::router())
}

pub struct App {
    listener: TcpListener,
    address: SocketAddr,
    state: AppState,
}

impl App {
    pub async fn with(config: Settings) -> anyhow::Result<Self> {
        let email_client = match config.email_client.authorization_token.clone() {
            Some(token) => Some(
                EmailClient::new(
                    config.email_client.base_url.clone(),
                    config.email_client.sender().map_err(|e| anyhow!(e))?,
                    token,
                    config.email_client.timeout(),
                )
                .context("Failed to build the email client")?,
            ),
            None => {
                tracing::warn!("no email service credential configured, submissions will fail");
                None
            }
        };

        let business = config
            .business
            .business()
            .map_err(|e| anyhow!(e))
            .context("The business contact email should be valid")?;

        let listener = TcpListener::bind(format!(
            "{}:{}",
            config.application.host, config.application.port
        ))
        .await
        .context("The listener should be able to bind the address")?;
        let address = listener.local_addr()?;

        Ok(Self {
            listener,
            address,
            state: AppState {
                email_client,
                rate_limiter: RateLimiter::from(&config.rate_limit),
                business: Arc::new(business),
            },
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn port(&self) -> u16 {
        self.address.port()
    }

    pub async fn serve(self) -> Result<(), io::Error> {
        let sweep = self.state.rate_limiter.spawn_cleanup();

        let app = app_router().with_state(self.state).layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let id = uuid::Uuid::new_v4();
                tracing::info_span!(
                    "request",
                    method = ?request.method(),
                    uri = ?request.uri(),
                    %id,
                )
            }),
        );

        let served = axum::serve(self.listener, app.into_make_service()).await;
        sweep.abort();
        served
    }
}
