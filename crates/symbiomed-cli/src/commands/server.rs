use anyhow::Result;
use colored::Colorize;
use symbiomed_client::TerminologyClient;

use crate::cli::OutputFormat;
use crate::output::print_json;

pub async fn health(client: &TerminologyClient, format: OutputFormat) -> Result<()> {
    let (code, body) = client.health().await?;
    let healthy = (200..300).contains(&code);

    if format == OutputFormat::Json {
        let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        print_json(&serde_json::json!({
            "server": client.base_url(),
            "status": code,
            "healthy": healthy,
            "body": body,
        }));
        return ensure_healthy(code);
    }

    let server = client.base_url();
    if healthy {
        println!("{} {} is {}", "✓".green(), server.cyan(), "healthy".green());
        if !body.is_empty() {
            println!("  {body}");
        }
    } else {
        println!(
            "{} {} returned {} {}",
            "✗".red(),
            server.cyan(),
            code.to_string().red(),
            body
        );
    }
    ensure_healthy(code)
}

fn ensure_healthy(code: u16) -> Result<()> {
    if !(200..300).contains(&code) {
        anyhow::bail!("Health check failed: HTTP {code}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use symbiomed_client::ClientConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with_health(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_unhealthy_server_is_an_error() {
        let server = server_with_health(503, "down").await;
        let client = TerminologyClient::new(ClientConfig::new(server.uri())).unwrap();

        let err = health(&client, OutputFormat::Text).await.unwrap_err();
        assert_eq!(err.to_string(), "Health check failed: HTTP 503");
        assert!(health(&client, OutputFormat::Json).await.is_err());
    }

    #[tokio::test]
    async fn test_healthy_server() {
        let server = server_with_health(200, r#"{"status":"ok"}"#).await;
        let client = TerminologyClient::new(ClientConfig::new(server.uri())).unwrap();
        assert!(health(&client, OutputFormat::Text).await.is_ok());
    }
}
