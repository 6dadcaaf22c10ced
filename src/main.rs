use anyhow::Context;
use contact_form::{app::App, config::get_configuration, telemetry::get_subscriber};
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration().context("Failed to read configuration.")?;

    get_subscriber(&config.log_level, std::io::stdout).init();

    let app = App::with(config).await?;

    tracing::info!(address = %app.address(), "starting server");
    app.serve().await.context("The server should be running")?;

    Ok(())
}
