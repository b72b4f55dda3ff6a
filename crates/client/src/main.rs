use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use board_content::ContentFactory;
use board_core::UserId;
use tabletop_client::{ClientConfig, run_demo, setup_logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging()?;

    let config = ClientConfig::from_env();
    let factory = ContentFactory::new(&config.data_dir);
    let runtime = config
        .runtime
        .clone()
        .with_board(factory.load_config()?)
        .overlay_env();
    let spec = Arc::new(factory.load_spec(&config.game_spec)?);
    info!(
        data_dir = %config.data_dir.display(),
        game_spec = %spec.id,
        pieces = spec.piece_count(),
        "content loaded"
    );

    let users = [UserId::new("alice"), UserId::new("bob")];
    let report = run_demo(spec, &users, &runtime).await?;

    println!("match {}", report.match_id);
    for seat in &report.seats {
        println!(
            "  {:<8} {:>3} animations, {} pieces",
            seat.user,
            seat.animations,
            seat.state.len()
        );
    }
    Ok(())
}
