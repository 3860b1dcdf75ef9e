use eventhub_api::{Application, ApplicationHandle};
use eventhub_infra::{EventHubContext, InMemorySearchIndex};
use eventhub_sdk::EventHubSDK;
use std::sync::Arc;
use std::time::Duration;

pub struct TestApp {
    pub ctx: EventHubContext,
    pub index: Arc<InMemorySearchIndex>,
    pub handle: ApplicationHandle,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, EventHubSDK) {
    let index = Arc::new(InMemorySearchIndex::new());
    let mut ctx = EventHubContext::create_inmemory_with_index(index.clone());
    ctx.config.port = 0; // Random port
    ctx.config.align_jobs_to_minute = false;
    ctx.config.reminder_job_interval = Duration::from_millis(50);
    ctx.config.status_job_interval = Duration::from_millis(50);
    ctx.config.reindex_job_interval = Duration::from_millis(100);

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");
    let handle = application.handle();

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { ctx, index, handle };
    let sdk = EventHubSDK::new(address);
    (app, sdk)
}
