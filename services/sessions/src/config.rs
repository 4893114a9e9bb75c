/// Sessions service configuration loaded from environment variables.
#[derive(Debug)]
pub struct SessionsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3121). Env var: `SESSIONS_PORT`.
    pub sessions_port: u16,
}

impl SessionsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            sessions_port: std::env::var("SESSIONS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3121),
        }
    }
}
