//! Headless SDUI client
//!
//! Usage:
//!   sdui-client                          # WebSocket, default app
//!   sdui-client --app trek               # Separate app state, same process
//!   sdui-client --once                   # One HTTP round trip, print, exit
//!
//! Interactive input, one line per command:
//!   <action> [key=value ...]   send an action
//!   click <n>                  click the n-th clickable element
//!   input <selector> <value>   set an input's value
//!   grid                       toggle the flow-zone grid
//!   show                       print the node tree
//!   quit

use anyhow::{Context, Result};
use clap::Parser;
use sdui_client::{
    ClientConfig, ClientEvent, ClientView, Connectivity, HttpChannel, InstanceIds, Interpreter,
    SocketClient, Transport,
};
use sdui_types::ActionMessage;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sdui-client")]
#[command(about = "Render a server-driven UI as text")]
struct Args {
    /// WebSocket base URL (overrides SDUI_SERVER_URL)
    #[arg(long)]
    server: Option<String>,

    /// HTTP base URL (overrides SDUI_HTTP_URL)
    #[arg(long)]
    http: Option<String>,

    /// App to address
    #[arg(short = 'a', long, default_value = "default")]
    app: String,

    /// Full instance string; generated when absent
    #[arg(short = 'i', long)]
    instance: Option<String>,

    /// Action sent when the channel opens
    #[arg(long, default_value = sdui_client::transport::BOOTSTRAP_ACTION)]
    bootstrap: String,

    /// One HTTP request, print the result and exit
    #[arg(long)]
    once: bool,

    /// Start with the grid overlay on
    #[arg(long)]
    grid: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sdui_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::from_env().context("invalid client configuration")?;
    if let Some(server) = args.server {
        config.server_url = server;
    }
    if let Some(http) = args.http {
        config.http_url = http;
    }

    let instance = args
        .instance
        .unwrap_or_else(|| InstanceIds::new().for_app(&args.app));
    tracing::info!("Instance: {}", instance);

    let bootstrap = ActionMessage::new(args.bootstrap);

    if args.once {
        return run_once(&config, &instance, &bootstrap, args.grid).await;
    }

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (actions_tx, actions_rx) = mpsc::channel::<ActionMessage>(32);
    let client = SocketClient::new(config, instance)
        .with_bootstrap(bootstrap)
        .with_events(events_tx);
    let view = client.view();
    view.lock().await.set_show_grid(args.grid);

    let driver = tokio::spawn(client.run(actions_rx));

    let printer_view = view.clone();
    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                ClientEvent::Rendered(_) => print_view(&*printer_view.lock().await),
                ClientEvent::State(state) => println!("[channel {}]", state),
                ClientEvent::Probe(Ok(status)) => {
                    println!("[probe] server {} ({})", status.status, status.environment)
                }
                ClientEvent::Probe(Err(e)) => println!("[probe] unreachable: {}", e),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut words = line.split_whitespace();
        match words.next() {
            Some("quit") | Some("exit") => break,
            Some("show") => print_view(&*view.lock().await),
            Some("grid") => {
                let mut view = view.lock().await;
                view.toggle_grid();
                print_view(&view);
            }
            Some("input") => {
                let selector = words.next().unwrap_or_default();
                let value = words.collect::<Vec<_>>().join(" ");
                if !view.lock().await.input(selector, &value) {
                    println!("No element matches {}", selector);
                }
            }
            Some("click") => {
                let index = words.next().and_then(|n| n.parse::<usize>().ok());
                let action = {
                    let mut view = view.lock().await;
                    let clickable = view.clickable();
                    match index.and_then(|i| clickable.get(i).copied()) {
                        Some(node) => view.click(node),
                        None => {
                            println!("Clickable elements: 0..{}", clickable.len());
                            None
                        }
                    }
                };
                if let Some(action) = action {
                    if actions_tx.send(action).await.is_err() {
                        break;
                    }
                }
            }
            Some(_) => match parse_action_line(line) {
                Some(action) => {
                    if actions_tx.send(action).await.is_err() {
                        break;
                    }
                }
                None => println!("Could not parse: {}", line),
            },
            None => {}
        }
    }

    drop(actions_tx);
    let state = driver.await.context("channel task failed")?;
    printer.abort();
    tracing::info!("Channel finished in state {}", state);
    Ok(())
}

async fn run_once(
    config: &ClientConfig,
    instance: &str,
    bootstrap: &ActionMessage,
    grid: bool,
) -> Result<()> {
    let http = HttpChannel::new(config.http_base(), instance);
    let commands = http
        .send(bootstrap)
        .await
        .with_context(|| format!("{} request failed", bootstrap.action))?;

    let mut view = ClientView::standard();
    view.set_connectivity(Connectivity::Connected(Transport::Http));
    view.set_show_grid(grid);
    Interpreter::standard().interpret(&mut view, &commands);
    print_view(&view);
    Ok(())
}

fn print_view(view: &ClientView) {
    println!("{}", view.outline());
    for (i, node) in view.clickable().into_iter().enumerate() {
        let label = view.document().text_content(node);
        let action = view
            .click_action(node)
            .map(|a| a.action.as_str())
            .unwrap_or_default();
        println!("  [{}] {} -> {}", i, label.trim(), action);
    }
    for diagnostic in view.diagnostics() {
        println!("  ({:?}) {}", diagnostic.level, diagnostic.message);
    }
}

/// `<action> [key=value ...]`; values that parse as JSON keep their type,
/// dotted keys stay flat for the server to nest.
fn parse_action_line(line: &str) -> Option<ActionMessage> {
    let mut words = line.split_whitespace();
    let mut action = ActionMessage::new(words.next()?);
    for pair in words {
        let (key, value) = pair.split_once('=')?;
        if key.is_empty() {
            return None;
        }
        let value = serde_json::from_str::<Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        if !action.insert(key, value) {
            return None;
        }
    }
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_action_line() {
        let action = parse_action_line("set-course dir=3 warp=1.5 note=fast").unwrap();
        assert_eq!(action.action, "set-course");
        assert_eq!(action.data["dir"], json!(3));
        assert_eq!(action.data["warp"], json!(1.5));
        assert_eq!(action.data["note"], json!("fast"));
    }

    #[test]
    fn test_parse_rejects_bare_words() {
        assert!(parse_action_line("select-panel src").is_none());
        assert!(parse_action_line("").is_none());
        assert!(parse_action_line("select-panel action=x").is_none());
    }
}
