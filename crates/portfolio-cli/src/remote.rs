//! Commands that talk to the catalog service.

use std::path::Path;
use std::time::Duration;

use portfolio_client::{AiQuery, CatalogClient};
use portfolio_core::{count_by_status, ActionStatus, AppConfig, Catalog, ProductAction};

fn client(config: &AppConfig) -> anyhow::Result<CatalogClient> {
    Ok(CatalogClient::from_config(config)?)
}

/// Download products, feedback and actions into a snapshot file.
pub(crate) async fn run_fetch(config: &AppConfig, output: &Path) -> anyhow::Result<()> {
    let client = client(config)?;
    let (products, feedback, actions) = tokio::try_join!(
        client.fetch_products(),
        client.fetch_feedback(),
        client.fetch_actions(None),
    )?;

    let catalog = Catalog {
        products,
        feedback,
        actions,
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, serde_json::to_vec_pretty(&catalog)?)?;

    println!(
        "saved {} products, {} feedback items, {} actions to {}",
        catalog.products.len(),
        catalog.feedback.len(),
        catalog.actions.len(),
        output.display()
    );
    Ok(())
}

/// Print actions with a per-status tally.
pub(crate) fn print_actions(actions: &[ProductAction]) {
    if actions.is_empty() {
        println!("no actions found");
        return;
    }
    let tally = count_by_status(actions)
        .iter()
        .map(|(status, count)| format!("{status}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{tally}");
    println!();
    println!("{:<10}{:<10}{:<13}{:<18}TITLE", "ID", "PRODUCT", "STATUS", "UPDATED");
    for action in actions {
        println!(
            "{:<10}{:<10}{:<13}{:<18}{}",
            action.id,
            action.product_id,
            action.status.to_string(),
            action.updated_at.format("%Y-%m-%d %H:%M"),
            action.title
        );
        if let Some(note) = &action.description {
            println!("{:<10}note: {note}", "");
        }
    }
}

pub(crate) async fn run_actions_list_remote(
    config: &AppConfig,
    product_id: Option<&str>,
) -> anyhow::Result<()> {
    let actions = client(config)?.fetch_actions(product_id).await?;
    print_actions(&actions);
    Ok(())
}

/// Move an action forward. The current status is read from the service so
/// the transition check runs against fresh state.
pub(crate) async fn run_actions_advance(
    config: &AppConfig,
    action_id: &str,
    next: ActionStatus,
) -> anyhow::Result<()> {
    let client = client(config)?;
    let actions = client.fetch_actions(None).await?;
    let action = actions
        .iter()
        .find(|a| a.id == action_id)
        .ok_or_else(|| anyhow::anyhow!("action '{action_id}' not found"))?;

    let updated = client.advance_action(action, next).await?;
    println!("{}: {} -> {}", updated.id, action.status, updated.status);
    Ok(())
}

pub(crate) async fn run_actions_note(
    config: &AppConfig,
    action_id: &str,
    note: &str,
) -> anyhow::Result<()> {
    let updated = client(config)?.save_action_note(action_id, note).await?;
    match &updated.description {
        Some(note) => println!("{}: note saved: {note}", updated.id),
        None => println!("{}: note cleared", updated.id),
    }
    Ok(())
}

/// Upload a document and, unless `wait` is false, poll its ingestion job.
pub(crate) async fn run_upload(
    config: &AppConfig,
    path: &Path,
    product_id: Option<&str>,
    wait: bool,
) -> anyhow::Result<()> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("'{}' has no usable file name", path.display()))?;
    let bytes = std::fs::read(path)?;

    let client = client(config)?;
    let job = client.upload_document(filename, product_id, bytes).await?;
    println!("queued {filename} as ingestion job {}", job.id);
    if !wait {
        return Ok(());
    }

    let job = client
        .wait_for_ingestion(
            &job.id,
            Duration::from_millis(config.ingest_poll_interval_ms),
            config.ingest_max_polls,
        )
        .await?;
    match job.document_id {
        Some(document_id) => println!("ingestion complete: document {document_id}"),
        None => println!("ingestion complete"),
    }
    Ok(())
}

pub(crate) async fn run_ask(
    config: &AppConfig,
    question: &str,
    product_id: Option<&str>,
) -> anyhow::Result<()> {
    let answer = client(config)?
        .ask(&AiQuery {
            question: question.to_owned(),
            product_id: product_id.map(str::to_owned),
        })
        .await?;

    println!("{}", answer.answer);
    if !answer.sources.is_empty() {
        println!();
        println!("sources:");
        for source in &answer.sources {
            println!("  - {source}");
        }
    }
    Ok(())
}
