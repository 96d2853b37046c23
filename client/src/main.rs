//! Shelf - print one collection as the client would show it.
//!
//! Usage: `shelf <collection> [query] [category] [sort-field] [asc|desc]`
//!
//! Each visible item is written to stdout as one JSON line, with favorite,
//! note and selection flags merged in.

use shelf_client::{ClientConfig, CollectionSession, HttpCollectionApi};
use shelf_engine::{SortCriteria, SortDirection, SortField};
use std::io::Write;
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; stdout is reserved for the JSON lines
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelf_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ClientConfig::from_env()?;

    let mut args = std::env::args().skip(1);
    let collection = args
        .next()
        .ok_or("usage: shelf <collection> [query] [category] [sort-field] [asc|desc]")?;
    let query = args.next();
    let category = args.next();
    let field: Option<SortField> = args.next().map(|s| s.parse()).transpose()?;
    let direction: Option<SortDirection> = args.next().map(|s| s.parse()).transpose()?;

    tracing::info!(api = %config.api_base_url, collection = %collection, "Opening collection");

    let api = Rc::new(HttpCollectionApi::new(&config.api_base_url)?);
    let session = CollectionSession::new(api, collection, &config);
    session.load().await?;

    if let Some(query) = query {
        session.search(&query).await;
    }
    if let Some(category) = category {
        session.set_category(&category);
    }
    if let Some(field) = field {
        let direction = direction.unwrap_or(match field {
            SortField::DateAdded => SortDirection::Desc,
            SortField::Name | SortField::Category => SortDirection::Asc,
        });
        session.set_sort(SortCriteria::new(field, direction));
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    session.with_decorated_view(|items| -> Result<(), Box<dyn std::error::Error>> {
        for item in items {
            writeln!(out, "{}", serde_json::to_string(item)?)?;
        }
        Ok(())
    })?;

    Ok(())
}
