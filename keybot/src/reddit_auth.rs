//! OAuth code flow helper: prints the authorize URL, waits for Reddit's redirect on a local port
//! and exchanges the code for a token.

use anyhow::{Context, Result};
use reddit_client::RedditClient;
use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::RedditConfig;

const SCOPES: &[&str] = &["identity", "read"];
const MAX_REQUEST_BYTES: usize = 8192;

/// Authorization code from the callback's request line; checks `state` and Reddit's `error`.
pub fn parse_callback(request_line: &str, expected_state: &str) -> Result<String> {
    let mut parts = request_line.split_whitespace();
    let (Some("GET"), Some(target)) = (parts.next(), parts.next()) else {
        anyhow::bail!("Unexpected callback request: {}", request_line);
    };
    let url = Url::parse(&format!("http://localhost{}", target))
        .with_context(|| format!("Invalid callback target: {}", target))?;

    let param = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    };
    if let Some(error) = param("error") {
        anyhow::bail!("Reddit denied access: {}", error);
    }
    if param("state").as_deref() != Some(expected_state) {
        anyhow::bail!("State mismatch in callback");
    }
    param("code").context("Callback has no code")
}

/// Accepts one connection, answers it, and returns the authorization code.
pub async fn accept_callback(listener: &TcpListener, expected_state: &str) -> Result<String> {
    let (mut stream, peer) = listener.accept().await?;
    info!(peer = %peer, "Callback connection");

    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        buf.extend_from_slice(&chunk[..n]);
        if n == 0 || buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() >= MAX_REQUEST_BYTES {
            break;
        }
    }
    let request = String::from_utf8_lossy(&buf);
    let request_line = request.lines().next().unwrap_or_default();

    let result = parse_callback(request_line, expected_state);
    let body = match &result {
        Ok(_) => "Authorized. You can close this page.".to_string(),
        Err(e) => format!("Authorization failed: {}", e),
    };
    let status = if result.is_ok() { "200 OK" } else { "400 Bad Request" };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    if let Err(e) = stream.write_all(response.as_bytes()).await {
        warn!(error = %e, "Failed to answer callback");
    }
    let _ = stream.shutdown().await;
    result
}

/// Runs the whole flow against the configured Reddit app.
pub async fn run_reddit_auth(reddit: &RedditConfig, port: u16) -> Result<()> {
    let (client_id, client_secret) = reddit.credentials()?;
    let client = RedditClient::new(&reddit.user_agent)?;
    let state = uuid::Uuid::new_v4().to_string();
    let redirect_uri = format!("http://localhost:{}/", port);

    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to listen on port {}", port))?;
    let url = client.authorize_url(client_id, &state, &redirect_uri, SCOPES)?;
    println!("Open this URL in a browser and allow access:\n{}", url);
    println!("Waiting for the redirect on {} ...", redirect_uri);

    let code = accept_callback(&listener, &state).await?;
    let session = client
        .authenticate_with_code(client_id, client_secret, &code, &redirect_uri)
        .await?;
    match session.refresh_token() {
        Some(_) => println!("Authorized; a refresh token was issued."),
        None => println!("Authorized; no refresh token was issued."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpStream;

    #[test]
    fn test_parse_callback_ok() {
        let code = parse_callback("GET /?state=abc&code=xyz HTTP/1.1", "abc").unwrap();
        assert_eq!(code, "xyz");
    }

    #[test]
    fn test_parse_callback_state_mismatch() {
        let err = parse_callback("GET /?state=other&code=xyz HTTP/1.1", "abc").unwrap_err();
        assert!(err.to_string().contains("State mismatch"));
    }

    #[test]
    fn test_parse_callback_denied() {
        let err = parse_callback("GET /?state=abc&error=access_denied HTTP/1.1", "abc").unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn test_parse_callback_rejects_other_methods() {
        assert!(parse_callback("POST /?state=abc&code=x HTTP/1.1", "abc").is_err());
        assert!(parse_callback("", "abc").is_err());
    }

    /// **Test: One callback connection yields the code and gets a 200 answer.**
    #[tokio::test]
    async fn test_accept_callback() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream
                .write_all(b"GET /?state=s1&code=c1 HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .await
                .unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).await.unwrap();
            response
        });

        let code = accept_callback(&listener, "s1").await.unwrap();
        let response = client.await.unwrap();

        assert_eq!(code, "c1");
        assert!(response.starts_with("HTTP/1.1 200 OK"));
    }
}
