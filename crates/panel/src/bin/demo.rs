use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use domain::{PostId, SortMode};
use panel::{config::Settings, PanelController, SubmitOutcome};
use remote::{HttpBackend, HttpConfig};
use storage::Db;

const POST: &str = "hello-panel";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new().context("Failed to load configuration")?;
    println!("Starting comment panel demo against {}...", settings.api.base_url);

    let backend = HttpBackend::new(HttpConfig {
        base_url: settings.api.base_url.clone(),
        timeout: Duration::from_secs(settings.api.timeout_secs),
        bearer_token: settings.api.bearer_token.clone(),
    })?;
    let drafts = Db::new(&settings.database.url).await?;

    let mut ctl = PanelController::new(
        Arc::new(backend),
        drafts,
        chrono::Duration::hours(settings.drafts.ttl_hours),
        Duration::from_millis(settings.drafts.debounce_ms),
    );

    // 宿主文章视图会这样订阅计数变化
    let mut changes = BroadcastStream::new(ctl.subscribe_changes());
    tokio::spawn(async move {
        while let Some(Ok(change)) = changes.next().await {
            println!("   [badge] comment {} changed", change.comment_id());
        }
    });

    println!("\n[1/5] Opening post '{}'...", POST);
    ctl.open_post(PostId::new(POST).map_err(anyhow::Error::msg)?)
        .await?;
    println!("   -> {} comment(s), sorted '{:?}'", ctl.comment_count(), ctl.sort_mode());
    for c in ctl.visible_comments() {
        println!("      - [{}] {}: {}", c.created_at, c.author.display_name, c.content);
    }

    println!("\n[2/5] Typing a draft (debounced write-through)...");
    ctl.expand_composer().await;
    ctl.composer_input("This is a message from the panel demo!");
    tokio::time::sleep(Duration::from_millis(settings.drafts.debounce_ms + 200)).await;
    println!("   -> Draft persisted, would survive a reload for 12h");

    println!("\n[3/5] Submitting...");
    match ctl.submit().await? {
        SubmitOutcome::Posted(c) => println!("   -> ✅ Posted as {} by {}", c.id, c.author.display_name),
        SubmitOutcome::Ignored => println!("   -> Skipped (empty or already in flight)"),
    }

    println!("\n[4/5] Switching sort mode to 'recent'...");
    ctl.set_sort_mode(SortMode::Recent);
    for c in ctl.visible_comments().iter().take(3) {
        println!("      - [{}] {}", c.created_at, c.content);
    }

    println!("\n[5/5] Editing and deleting the newest comment...");
    if let Some(newest) = ctl.visible_comments().first().map(|c| c.id.clone()) {
        if ctl.start_edit(&newest).await {
            ctl.composer_input("Edited from the demo client.");
            ctl.submit().await?;
            println!("   -> Edited {} in place", newest);
        }
        ctl.request_delete(&newest);
        if ctl.confirm_delete().await? {
            println!("   -> Deleted {} after server confirmation", newest);
        }
    }

    ctl.close_post().await;
    println!("\nDone.");
    Ok(())
}
