pub mod advice;
pub mod domain;
pub mod rules;
pub mod storage;

pub mod config {
    use anyhow::Context;

    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_MAX_CONNECTIONS: u32 = 5;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub database_max_connections: u32,
        pub sentry_dsn: Option<String>,
        pub port: u16,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let database_max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
                Ok(s) => s
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {s}"))?,
                Err(_) => DEFAULT_MAX_CONNECTIONS,
            };
            anyhow::ensure!(
                database_max_connections >= 1,
                "DATABASE_MAX_CONNECTIONS must be >= 1"
            );

            let port = std::env::var("PORT")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT);

            Ok(Self {
                database_url: std::env::var("DATABASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                database_max_connections,
                sentry_dsn: std::env::var("SENTRY_DSN")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                port,
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }

        pub async fn connect_pool(&self) -> anyhow::Result<sqlx::PgPool> {
            let db_url = self.require_database_url()?;
            sqlx::postgres::PgPoolOptions::new()
                .max_connections(self.database_max_connections)
                .connect(db_url)
                .await
                .context("connect DATABASE_URL failed")
        }
    }
}
