pub mod dispatch_notification;
mod get_user_notifications;

use actix_web::web;
use dispatch_notification::dispatch_notification_controller;
use get_user_notifications::get_user_notifications_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/{user_id}/events/{event_id}/notifications/{notification_type}",
        web::post().to(dispatch_notification_controller),
    );
    cfg.route(
        "/users/{user_id}/notifications",
        web::get().to(get_user_notifications_controller),
    );
}
