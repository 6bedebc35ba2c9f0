use actix_web::{App, HttpServer, middleware, web};

use uniportal::auth::{password, rate_limit::RateLimiter};
use uniportal::blobs::BlobStore;
use uniportal::config::AppConfig;
use uniportal::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Resolve configuration once; everything below receives it by injection.
    let config = AppConfig::from_env();

    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pool = db::init_pool(&config.database_path);
    db::run_migrations(&pool);

    let admin_hash = password::hash_password(&config.admin_password)
        .expect("Failed to hash admin password");
    db::seed_admin(&pool, &admin_hash);

    let blob_store = BlobStore::new(config.upload_dir.clone())?;
    let limiter = RateLimiter::new();

    log::info!("Starting server at http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    let upload_dir = config.upload_dir.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(blob_store.clone()))
            .app_data(web::Data::new(limiter.clone()))
            // Uploads are read as one Bytes body; cap them at 10 MiB.
            .app_data(web::PayloadConfig::new(10 * 1024 * 1024))
            // Uploaded blobs, served by stored name
            .service(actix_files::Files::new("/files", upload_dir.clone()))
            .configure(handlers::configure)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
