use dorm_listings::config::{build_source, load_config};
use dorm_listings::PropertyStore;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Dorm Listings");
    info!("================");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    let source = build_source(&config.source)?;
    info!("Loading listings from {}...", source.source_name());
    let records = source.fetch().await?;

    let report = PropertyStore::load(&records);
    for (index, error) in &report.failures {
        warn!("❌ Record {} rejected: {}", index, error);
    }

    let properties = if config.filter.is_empty() {
        report.store.into_vec()
    } else {
        info!("Applying filter: {:?}", config.filter);
        report.store.filter(&config.filter)
    };

    info!("\n✅ {} properties ready\n", properties.len());

    for (i, property) in properties.iter().enumerate() {
        println!("{}. {} (HK${} / {})", i + 1, property.title, property.price, property.unit);
        println!("   {} · {}", property.district, property.address);
        println!("   Status: {}", property.status);
        if !property.location.nearby_mtr.is_empty() {
            println!("   MTR: {}", property.location.nearby_mtr.join(", "));
        }
        println!("   ID: {}", property.property_id);
        println!("   Amenities: {}", property.amenities.join(", "));
        println!();
    }

    let json = serde_json::to_string_pretty(&properties)?;
    tokio::fs::write(&config.output.path, json).await?;
    info!("💾 Saved {} properties to {}", properties.len(), config.output.path.display());

    Ok(())
}
