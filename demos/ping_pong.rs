use requester::{ChannelTransport, FnResponder, RequesterConfig, attach};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (left, right) = ChannelTransport::create_pair("demo");

    let (client, _client_listener) = attach(
        Arc::new(left),
        FnResponder::new(|data: Value| async move {
            println!("[Client] Post received: {}", data);
            Ok(Value::Null)
        }),
        RequesterConfig::default(),
    );

    let (server, _server_listener) = attach(
        Arc::new(right),
        FnResponder::new(|data: Value| async move {
            println!("[Server] Handling: {}", data);
            match data.get("op").and_then(Value::as_str) {
                Some("ping") => Ok(json!("pong")),
                Some(op) => Ok(json!({ "error": format!("unknown op: {}", op) })),
                None => Ok(Value::Null),
            }
        }),
        RequesterConfig::new().with_timeout(Duration::from_secs(5)),
    );

    println!("[Client] Sending ping");
    let reply = client.request(json!({ "op": "ping" }), None).await?;
    println!("[Client] Reply: {}\n", reply);

    println!("[Server] Posting a log line");
    server.post(json!({ "op": "log", "line": "hello" }), None).await?;

    // Expires before the reply can arrive; the late reply is dropped as stale.
    let err = client
        .request_with_timeout(json!({ "op": "ping" }), None, Duration::from_millis(0))
        .await;
    println!("[Client] Zero timeout: {:?}\n", err.err().map(|e| e.to_string()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("{}", client.stats());
    println!("{}", server.stats());
    Ok(())
}
