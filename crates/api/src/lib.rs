mod error;
mod event;
mod job_schedulers;
mod notification;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{
    dev::{Server, ServerHandle},
    middleware, web, App, HttpServer,
};
use eventhub_infra::EventHubContext;
use job_schedulers::{
    start_complete_events_job, start_reindex_events_job, start_send_reminders_job, PeriodicJob,
};
use std::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    event::configure_routes(cfg);
    notification::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
    cancel_token: CancellationToken,
    jobs: Vec<PeriodicJob>,
}

/// Stops a running `Application` from outside of it
#[derive(Clone)]
pub struct ApplicationHandle {
    server: ServerHandle,
    cancel_token: CancellationToken,
}

impl ApplicationHandle {
    /// Stops the background jobs and gracefully shuts down the server
    pub async fn stop(&self) {
        self.cancel_token.cancel();
        self.server.stop(true).await;
    }
}

impl Application {
    pub async fn new(context: EventHubContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        let cancel_token = CancellationToken::new();
        let jobs = Application::start_job_schedulers(context, &cancel_token);

        Ok(Self {
            server,
            port,
            cancel_token,
            jobs,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn handle(&self) -> ApplicationHandle {
        ApplicationHandle {
            server: self.server.handle(),
            cancel_token: self.cancel_token.clone(),
        }
    }

    fn start_job_schedulers(
        context: EventHubContext,
        cancel_token: &CancellationToken,
    ) -> Vec<PeriodicJob> {
        vec![
            start_send_reminders_job(context.clone(), cancel_token.child_token()),
            start_complete_events_job(context.clone(), cancel_token.child_token()),
            start_reindex_events_job(context, cancel_token.child_token()),
        ]
    }

    async fn configure_server(context: EventHubContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    /// Runs until the server stops, then stops the background jobs
    pub async fn start(self) -> Result<(), std::io::Error> {
        let res = self.server.await;

        for job in &self.jobs {
            job.stop();
        }
        for job in self.jobs {
            let name = job.name();
            job.stopped().await;
            info!("Job {} is shut down", name);
        }

        res
    }

    /// Stops the background jobs and gracefully shuts down the server
    pub async fn stop(&self) {
        self.handle().stop().await;
    }
}
