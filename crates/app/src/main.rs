use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_bot={level},telegram_bot={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let model = settings.budget.into_model()?;
    tracing::info!(
        "Loaded {} categories, timezone {}",
        model.registry().all_names().len(),
        model.timezone()
    );

    let db = parse_database(&settings.database).await?;
    let engine = Arc::new(engine::Engine::builder().model(model).database(db).build()?);

    if let Some(server) = settings.server {
        let state = server::ServerState::new(engine.clone(), server.api_token);
        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            server::run(state, &format!("{}:{}", bind, server.port)).await;
        });
    }

    if let Some(telegram) = settings.telegram {
        let engine = engine.clone();
        tasks.spawn(async move {
            tracing::info!("Found telegram settings...");
            match telegram_bot::Bot::builder()
                .token(&telegram.token)
                .allowed_users(telegram.allowed_users)
                .engine(engine)
                .build()
            {
                Ok(bot) => bot.run().await,
                Err(err) => tracing::error!("failed to initialize telegram bot: {err}"),
            }
        });
    }

    if tasks.is_empty() {
        tracing::warn!("Neither [server] nor [telegram] is configured, nothing to run");
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("Database ready");
    Ok(database)
}
