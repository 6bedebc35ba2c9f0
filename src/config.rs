/// Runtime configuration, resolved once at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_path: String,
    pub upload_dir: String,
    pub admin_password: String,
    pub token_ttl_days: i64,
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => {
            log::info!("{key} not set, using default '{default}'");
            default.to_string()
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment. Called exactly once in main;
    /// everything downstream receives values by injection, never by re-reading
    /// the environment.
    pub fn from_env() -> Self {
        let token_ttl_days = std::env::var("TOKEN_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(30);

        let admin_password = match std::env::var("ADMIN_PASSWORD") {
            Ok(val) if val.len() >= 8 => val,
            Ok(val) => {
                log::warn!(
                    "ADMIN_PASSWORD too short ({} chars, need 8+) — using default",
                    val.len()
                );
                "admin123".to_string()
            }
            Err(_) => {
                log::warn!("No ADMIN_PASSWORD set — seeding admin with default password");
                "admin123".to_string()
            }
        };

        AppConfig {
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:8080"),
            database_path: env_or("DATABASE_PATH", "data/app.db"),
            upload_dir: env_or("UPLOAD_DIR", "data/uploads"),
            admin_password,
            token_ttl_days,
        }
    }
}
