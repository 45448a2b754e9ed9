//! Relay smoke test.
//!
//! Posts the canonical test incident to a running relay, mirroring the
//! paging service's double-wrapped webhook shape, and reports pass/fail.
//! Intended for post-deploy verification; it files a real ticket.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

/// Send a test incident through a running relay.
#[derive(Parser)]
#[command(name = "relay-smoke", about = "Send a test incident through a running relay")]
struct Cli {
    /// Relay webhook URL (e.g. http://localhost:8080/webhooks/pagerduty)
    url: String,

    /// Incident summary to file
    #[arg(long, default_value = "Test Incident")]
    summary: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let payload = json!({
        "body": {
            "incident": {
                "id": "123456",
                "summary": cli.summary,
                "html_url": "https://www.pagerduty.com/"
            }
        }
    });

    let client = reqwest::Client::new();
    let response = client
        .post(&cli.url)
        .json(&payload)
        .send()
        .await
        .context("Failed to reach relay")?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.is_success() {
        println!("Test passed");
        println!("Response: {body}");
        Ok(())
    } else {
        println!("Test failed Status Code: {status}, Response: {body}");
        std::process::exit(1);
    }
}
