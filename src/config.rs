use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_hours: i64,
    pub cookie_secure: bool,
    pub login_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub session: SessionConfig,
    pub admin_phone: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let session = SessionConfig {
            ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(24 * 7),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            login_path: std::env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".into()),
        };
        let admin_phone = std::env::var("ADMIN_PHONE").ok().filter(|v| !v.is_empty());
        Ok(Self {
            database_url,
            session,
            admin_phone,
        })
    }

    /// Configuration used by tests and the in-memory dev mode.
    pub fn local() -> Self {
        Self {
            database_url: None,
            session: SessionConfig {
                ttl_hours: 24,
                cookie_secure: false,
                login_path: "/login".into(),
            },
            admin_phone: None,
        }
    }
}
