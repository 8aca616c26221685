//! PostgreSQL helpers for integration tests
//!
//! One container is started lazily and shared by every test in the binary.
//! Tests share the database, so each one creates its own uniquely named data.

use std::sync::Arc;

use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use jury::{
    AppState, Config,
    config::DatabaseConfig,
    db::{self, PgStore},
    utils::SystemClock,
};

struct SharedPostgres {
    _container: ContainerAsync<Postgres>,
    url: String,
}

static POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

/// Get or start the PostgreSQL container and return its connection URL
pub async fn postgres_url() -> &'static str {
    let shared = POSTGRES
        .get_or_init(|| async {
            let container = Postgres::default()
                .with_user("jury")
                .with_password("jury_test")
                .with_db_name("jury_test")
                .with_tag("16-alpine")
                .start()
                .await
                .expect("Failed to start PostgreSQL container");
            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            SharedPostgres {
                url: format!("postgres://jury:jury_test@{}:{}/jury_test", host, port),
                _container: container,
            }
        })
        .await;
    &shared.url
}

/// Application state over a migrated `PgStore`
pub async fn postgres_state() -> AppState {
    let database = DatabaseConfig {
        url: Some(postgres_url().await.to_string()),
        max_connections: 10,
    };
    let pool = db::create_pool(&database).await.unwrap();
    db::run_migrations(&pool).await.unwrap();

    AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(SystemClock),
        Config::default(),
    )
}
