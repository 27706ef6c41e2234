//! HTTP handlers and route configuration.

mod auth;
mod feeds;
mod follow;
mod groups;
mod health;
mod posts;
mod present;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(feeds::index))
        .route("/group/{slug}/", web::get().to(feeds::group_posts))
        .route("/profile/{username}/", web::get().to(feeds::profile))
        .route("/profile/{username}/follow/", web::post().to(follow::profile_follow))
        .route("/profile/{username}/unfollow/", web::post().to(follow::profile_unfollow))
        .route("/follow/", web::get().to(feeds::follow_index))
        .route("/create/", web::post().to(posts::post_create))
        .route("/posts/{post_id}/", web::get().to(feeds::post_detail))
        .route("/posts/{post_id}/edit/", web::post().to(posts::post_edit))
        .route("/posts/{post_id}/delete/", web::post().to(posts::post_delete))
        .route("/posts/{post_id}/comment/", web::post().to(posts::add_comment))
        .service(
            web::resource("/groups/")
                .route(web::get().to(groups::group_list))
                .route(web::post().to(groups::group_create)),
        )
        .service(
            web::scope("/auth")
                .route("/signup/", web::post().to(auth::signup))
                .route("/login/", web::post().to(auth::login))
                .route("/password_change/", web::post().to(auth::password_change)),
        )
        .service(web::scope("/api").route("/health", web::get().to(health::health_check)));
}
