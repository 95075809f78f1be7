use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::cli::output::{print_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::cli::selector::{build_selectable_list, interactive_select};
use crate::core::api::{ApiClient, ApiError};
use crate::core::models::optimization::Optimization;

pub async fn list(client: &ApiClient, opts: &OutputOptions) -> Result<()> {
    let summary = match client.fetch_optimizations().await {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(error = %e, "failed to load optimizations");
            None
        }
    };

    match opts.format {
        OutputFormat::Text => match &summary {
            Some(s) => println!("{}", renderer::render_optimizations(s, opts.use_color)),
            None => println!("Optimization data unavailable"),
        },
        OutputFormat::Json => print_json(&summary, opts)?,
    }
    Ok(())
}

fn transition_error(e: ApiError, verb: &str, id: i64) -> anyhow::Error {
    if e.status() == Some(404) {
        anyhow::anyhow!("Optimization #{} not found", id)
    } else {
        anyhow::Error::new(e).context(format!("Could not {} optimization #{}", verb, id))
    }
}

fn print_updated(updated: &Optimization, opts: &OutputOptions) -> Result<()> {
    match opts.format {
        OutputFormat::Text => {
            println!("{}\n", renderer::render_optimization(updated, opts.use_color));
            Ok(())
        }
        OutputFormat::Json => print_json(updated, opts),
    }
}

pub async fn apply(client: &ApiClient, id: i64, opts: &OutputOptions) -> Result<()> {
    let updated = client
        .apply_optimization(id)
        .await
        .map_err(|e| transition_error(e, "apply", id))?;
    info!(id, savings = updated.estimated_savings, "optimization applied");
    print_updated(&updated, opts)?;

    if matches!(opts.format, OutputFormat::Text) {
        list(client, opts).await?;
    }
    Ok(())
}

pub async fn ignore(client: &ApiClient, id: i64, opts: &OutputOptions) -> Result<()> {
    let updated = client
        .ignore_optimization(id)
        .await
        .map_err(|e| transition_error(e, "ignore", id))?;
    info!(id, "optimization ignored");
    print_updated(&updated, opts)?;

    if matches!(opts.format, OutputFormat::Text) {
        list(client, opts).await?;
    }
    Ok(())
}

pub async fn generate(client: &ApiClient, opts: &OutputOptions) -> Result<()> {
    let result = client
        .generate_optimizations()
        .await
        .context("Could not generate optimizations")?;
    info!(message = %result.message, "optimizations generated");

    match opts.format {
        OutputFormat::Text => {
            println!("{}\n", result.message);
            list(client, opts).await
        }
        OutputFormat::Json => print_json(&result, opts),
    }
}

/// Pick pending recommendations interactively and apply each one.
/// A failed apply is logged and the rest still run.
pub async fn review(client: &ApiClient, opts: &OutputOptions) -> Result<()> {
    let summary = client
        .fetch_optimizations()
        .await
        .context("Could not load optimizations")?;

    let items = build_selectable_list(&summary);
    if items.is_empty() {
        println!("No pending recommendations to review.");
        return Ok(());
    }

    let selected = match interactive_select("Select recommendations to apply", &items)? {
        Some(ids) => ids,
        None => anyhow::bail!("`optimize review` needs an interactive terminal; use `optimize apply <ID>`"),
    };
    if selected.is_empty() {
        println!("Nothing selected.");
        return Ok(());
    }

    let (applied, failed) = apply_each(client, &selected).await;
    println!("Applied {} of {} recommendations", applied, applied + failed);

    list(client, opts).await
}

async fn apply_each(client: &ApiClient, ids: &[i64]) -> (usize, usize) {
    let mut applied = 0;
    let mut failed = 0;
    for &id in ids {
        match client.apply_optimization(id).await {
            Ok(o) => {
                info!(id, savings = o.estimated_savings, "optimization applied");
                applied += 1;
            }
            Err(e) => {
                error!(id, error = %e, "failed to apply optimization");
                failed += 1;
            }
        }
    }
    (applied, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn optimization_body(id: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id, "title": "Rightsize", "description": "", "estimated_savings": 12.5,
            "status": status, "service": "EC2", "provider": "AWS",
            "created_at": "2024-01-01T00:00:00"
        })
    }

    #[tokio::test]
    async fn apply_each_continues_after_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/optimization/1/apply"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/optimization/2/apply"))
            .respond_with(ResponseTemplate::new(200).set_body_json(optimization_body(2, "applied")))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        assert_eq!(apply_each(&client, &[1, 2]).await, (1, 1));
    }

    #[tokio::test]
    async fn apply_reports_missing_optimization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/optimization/99/apply"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let opts = OutputOptions {
            format: OutputFormat::Json,
            pretty: false,
            use_color: false,
            verbose: false,
        };
        let err = apply(&client, 99, &opts).await.unwrap_err();
        assert_eq!(err.to_string(), "Optimization #99 not found");
    }

    #[tokio::test]
    async fn ignore_keeps_server_error_as_source() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/optimization/5/ignore"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let opts = OutputOptions {
            format: OutputFormat::Json,
            pretty: false,
            use_color: false,
            verbose: false,
        };
        let err = ignore(&client, 5, &opts).await.unwrap_err();
        assert_eq!(err.to_string(), "Could not ignore optimization #5");
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.status(), Some(500));
    }
}
