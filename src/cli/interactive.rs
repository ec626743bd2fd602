use super::input::{Command, HELP};
use super::ui;
use crate::core::{ConversionProvider, Converter, Currency};
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

pub async fn run(provider: Arc<dyn ConversionProvider>, from: Currency, to: Currency) -> Result<()> {
    let mut converter = Converter::new(provider, from, to);
    let stdin = BufReader::new(tokio::io::stdin());
    session(&mut converter, stdin, &mut std::io::stdout()).await
}

/// Drives the form from `input` until `quit` or end of input.
///
/// Requests resolve while the session keeps reading, so a slow response never blocks
/// typing. After end of input the outstanding request, if any, is allowed to land.
pub async fn session<R, W>(converter: &mut Converter, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", ui::render_card(converter.state()))?;
    writeln!(out, "{}", ui::style_text(HELP, ui::StyleType::Subtle))?;

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => {
                        info!("Session ended by user");
                        return Ok(());
                    }
                    Ok(Command::Help) => writeln!(out, "{HELP}")?,
                    Ok(Command::Show) => writeln!(out, "{}", ui::render_card(converter.state()))?,
                    Ok(Command::Amount(amount)) => {
                        converter.set_amount(amount);
                        writeln!(out, "{}", ui::render_output(&converter.view()))?;
                    }
                    Ok(Command::From(currency)) => {
                        converter.set_from(currency);
                        writeln!(out, "{}", ui::render_output(&converter.view()))?;
                    }
                    Ok(Command::To(currency)) => {
                        converter.set_to(currency);
                        writeln!(out, "{}", ui::render_output(&converter.view()))?;
                    }
                    Err(e) => writeln!(out, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?,
                }
            }
            Some(completion) = converter.next_completion() => {
                match converter.reconcile(completion) {
                    Err(e) if e.is_superseded() => {
                        debug!(error = %e, "Ignoring stale completion");
                        continue;
                    }
                    // Failures already cleared the result and were logged.
                    _ => writeln!(out, "{}", ui::render_output(&converter.view()))?,
                }
            }
        }
    }

    debug!("Input closed, waiting for outstanding request");
    if let Err(e) = converter.settle().await {
        debug!(error = %e, "Last request failed before exit");
    }
    writeln!(out, "{}", ui::render_card(converter.state()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::frankfurter::FrankfurterProvider;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_rate(server: &MockServer, amount: &str, body: &str, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("amount", amount))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }

    async fn run_session(server: &MockServer, script: &str) -> String {
        let provider = Arc::new(FrankfurterProvider::new(&server.uri()));
        let mut converter = Converter::new(provider, Currency::Usd, Currency::Eur);
        let mut out = Vec::new();
        session(&mut converter, script.as_bytes(), &mut out)
            .await
            .unwrap();
        console::strip_ansi_codes(&String::from_utf8(out).unwrap()).into_owned()
    }

    #[tokio::test]
    async fn test_session_converts_amount() {
        let server = MockServer::start().await;
        mount_rate(&server, "100", r#"{"rates":{"EUR":95}}"#, Duration::ZERO).await;

        let output = run_session(&server, "amount 100\n").await;
        assert!(output.contains("Converting..."));
        assert!(output.contains("EUR 95"));
    }

    #[tokio::test]
    async fn test_session_only_shows_latest_amount() {
        let server = MockServer::start().await;
        mount_rate(
            &server,
            "100",
            r#"{"rates":{"EUR":95}}"#,
            Duration::from_millis(300),
        )
        .await;
        mount_rate(&server, "50", r#"{"rates":{"EUR":47.5}}"#, Duration::ZERO).await;

        let output = run_session(&server, "amount 100\namount 50\n").await;
        assert!(output.contains("EUR 47.5"));
        assert!(!output.contains("EUR 95"));
    }

    #[tokio::test]
    async fn test_session_same_currency_never_calls_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let output = run_session(&server, "to usd\namount 100\n").await;
        assert!(output.contains("Enter an amount to see results"));
        assert!(!output.contains("Converting..."));
    }

    #[tokio::test]
    async fn test_session_failure_shows_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let output = run_session(&server, "amount 100\n").await;
        let last_line = output.lines().rev().find(|l| l.contains("Enter an amount"));
        assert!(last_line.is_some());
        assert!(!output.contains("EUR 9"));
    }

    #[tokio::test]
    async fn test_session_reports_bad_input_and_quits() {
        let server = MockServer::start().await;
        let output = run_session(&server, "from GBP\nbogus\nquit\namount 100\n").await;
        assert!(output.contains("Unsupported currency: GBP"));
        assert!(output.contains("Unknown command: bogus"));
        assert!(!output.contains("Converting..."));
    }
}
