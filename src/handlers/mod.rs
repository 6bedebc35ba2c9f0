pub mod admin_handlers;
pub mod auth_handlers;
pub mod document_handlers;
pub mod form_handlers;

use actix_web::web;

/// Route table, shared by main and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth_handlers::register))
            .route("/login", web::post().to(auth_handlers::login))
            .route("/logout", web::post().to(auth_handlers::logout))
            .route("/me", web::get().to(auth_handlers::me)),
    );
    cfg.route("/forms/{kind}", web::post().to(form_handlers::submit));
    cfg.service(
        web::scope("/user")
            .route("/forms", web::get().to(form_handlers::list_own))
            .route("/form-detail", web::get().to(form_handlers::detail))
            .route("/delete-form", web::post().to(form_handlers::delete)),
    );
    cfg.service(
        web::scope("/admin")
            .route("/all-forms", web::get().to(admin_handlers::all_forms))
            .route("/form-settings", web::get().to(admin_handlers::get_form_settings))
            .route("/form-settings", web::post().to(admin_handlers::put_form_settings))
            .route("/notifications", web::get().to(admin_handlers::notifications))
            .route("/documents/delete", web::post().to(document_handlers::delete)),
    );
    cfg.service(
        web::scope("/documents")
            .route("", web::post().to(document_handlers::upload))
            .route("", web::get().to(document_handlers::list)),
    );
}
