mod db;
mod routes;
mod services;
mod state;

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8081;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = env_parse("PORT", DEFAULT_PORT);
    let data_dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

    let max_connections = env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS);
    let pool = db::init_pool(&database_url, max_connections)
        .await
        .expect("database init failed");

    let state = state::AppState::new(pool, data_dir.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, data_dir = %data_dir.display(), "matboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
