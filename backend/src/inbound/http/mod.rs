//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod cache_control;
pub mod chats;
pub mod directory;
pub mod error;
pub mod gate;
pub mod health;
pub mod notes;
pub mod preferences;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::signup)
        .service(auth::logout)
        .service(auth::request_password_reset)
        .service(auth::update_password)
        .service(auth::resend_confirmation)
        .service(auth::oauth_authorize)
        .service(gate::resolve_gate)
        .service(preferences::get_preferences)
        .service(preferences::complete_onboarding)
        .service(preferences::onboarding_options)
        .service(directory::list_people)
        .service(directory::create_person)
        .service(directory::list_companies)
        .service(chats::dashboard)
        .service(chats::schedule_chat)
        .service(notes::get_note)
        .service(notes::save_note)
        .service(notes::update_section)
        .service(notes::set_interview_relevant)
        .service(notes::update_tags);
}
