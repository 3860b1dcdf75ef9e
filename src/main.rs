mod telemetry;

use eventhub_api::Application;
use eventhub_infra::{run_migration, setup_context};
use std::io::{Error, ErrorKind};
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("eventhub_server".into(), "info".into());
    init_subscriber(subscriber);

    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        info!("Running database migrations");
        run_migration(&database_url)
            .await
            .map_err(|e| Error::new(ErrorKind::Other, e))?;
    }

    let context = setup_context()
        .await
        .map_err(|e| Error::new(ErrorKind::Other, e.to_string()))?;

    let app = Application::new(context).await?;
    info!("Listening on port {}", app.port());
    app.start().await
}
