// Budgify - Web Server
// Marketing pages, auth screens, dashboard and JSON API with Axum

use anyhow::Result;
use budgify::config::{init_tracing, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    println!("🌐 Budgify - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("\n🚀 Server running on {}", config.site_url);
    println!("   API: {}/api/summary", config.site_url);
    println!("   UI:  {}", config.site_url);
    println!("\n   Press Ctrl+C to stop\n");

    budgify::server::serve(config).await
}
