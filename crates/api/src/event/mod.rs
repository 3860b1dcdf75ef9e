pub mod complete_events;
mod create_event;
mod delete_event;
mod get_event;
mod join_event;
mod quit_event;
pub mod reindex_events;
pub mod send_reminders;
mod subscribers;
mod update_event;

use actix_web::web;
use create_event::create_event_controller;
use delete_event::delete_event_controller;
use get_event::get_event_controller;
use join_event::join_event_controller;
use quit_event::quit_event_controller;
use reindex_events::reindex_events_controller;
use update_event::update_event_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::post().to(create_event_controller));
    cfg.route("/events/{event_id}", web::get().to(get_event_controller));
    cfg.route(
        "/users/{user_id}/events/{event_id}",
        web::put().to(update_event_controller),
    );
    cfg.route(
        "/users/{user_id}/events/{event_id}",
        web::delete().to(delete_event_controller),
    );
    cfg.route(
        "/users/{user_id}/events/{event_id}/participants",
        web::post().to(join_event_controller),
    );
    cfg.route(
        "/users/{user_id}/events/{event_id}/participants",
        web::delete().to(quit_event_controller),
    );
    cfg.route("/reindex", web::post().to(reindex_events_controller));
}
