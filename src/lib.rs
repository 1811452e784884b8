pub mod booking;
pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod event;
pub mod featured;
pub mod models;
pub mod normalize;
pub mod service;

use anyhow::Context;

pub use booking::{prepare_booking, EventLookup};
pub use config::AppConfig;
pub use connection::ConnectionManager;
pub use db::{Collection, Database, Filter};
pub use error::{ConnectionError, DataError, DataResult};
pub use event::prepare_event;
pub use models::*;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let path = config.prepare_database_dir();

    let manager = ConnectionManager::new(path);
    let db = manager
        .init()
        .await
        .with_context(|| format!("cannot open database {:?}", manager.path()))?;

    if config.seed_featured {
        featured::seed_if_empty(&db)
            .await
            .context("failed to seed featured events")?;
    }

    let cards = service::list_event_cards(&db).await?;
    println!("Events");
    println!("meetup, socials and conferences");
    println!();
    println!("Featured");
    if cards.is_empty() {
        println!("  (no events yet)");
    }
    for card in &cards {
        println!("  {} {}  {}", card.date, card.time, card.title);
        println!("      {}  {}  {}", card.location, card.image, card.href());
    }

    manager.close().await;
    Ok(())
}
