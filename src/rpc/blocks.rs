use futures_util::{stream, SinkExt, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

use super::http::{HeaderDto, HttpRpcClient};
use super::BlockStream;
use crate::error::{Error, Result};
use crate::types::BlockHeader;

#[derive(Debug, Deserialize)]
struct SubscriptionParams {
    result: HeaderDto,
}

/// Messages the node sends on a `newHeads` subscription socket
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WsMessage {
    /// `eth_subscription` notification carrying a header
    Notification { params: SubscriptionParams },
    /// Reply to the `eth_subscribe` request
    Reply {
        #[serde(default)]
        result: Option<String>,
        #[serde(default)]
        error: Option<serde_json::Value>,
    },
}

fn parse_ws_text(text: &str) -> Option<Result<BlockHeader>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<WsMessage>(trimmed) {
        Ok(WsMessage::Notification { params }) => Some(Ok(params.result.into())),
        Ok(WsMessage::Reply {
            error: Some(error), ..
        }) => Some(Err(Error::WebSocket(format!(
            "eth_subscribe failed: {}",
            error
        )))),
        Ok(WsMessage::Reply { result, .. }) => {
            debug!(subscription = ?result, "subscribed to new heads");
            None
        }
        Err(e) => {
            warn!(
                message = %trimmed.chars().take(200).collect::<String>(),
                "unexpected subscription message"
            );
            Some(Err(Error::Json(e)))
        }
    }
}

/// Subscribe to `newHeads` over a WebSocket
pub(super) async fn subscribe_new_heads(ws_url: &str) -> Result<BlockStream> {
    let (ws_stream, _) = connect_async(ws_url).await?;
    let (mut write, read) = ws_stream.split();

    let subscribe = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_subscribe",
        "params": ["newHeads"],
    });
    write
        .send(Message::Text(subscribe.to_string()))
        .await
        .map_err(|e| Error::WebSocket(e.to_string()))?;

    // Nothing else is written on this socket
    drop(write);

    let stream = read.filter_map(|msg| async move {
        match msg {
            Ok(Message::Text(text)) => parse_ws_text(&text),
            Ok(Message::Close(_)) => Some(Err(Error::ConnectionClosed)),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => None,
            Ok(Message::Binary(_)) => Some(Err(Error::WebSocket(
                "Unexpected binary message".to_string(),
            ))),
            Err(e) => Some(Err(Error::WebSocket(e.to_string()))),
        }
    });

    Ok(Box::pin(stream))
}

/// Poll the latest block every `interval`, yielding each block number once
pub(super) fn poll_new_blocks(client: HttpRpcClient, interval: Duration) -> BlockStream {
    let stream = stream::unfold((client, None::<u64>), move |(client, last)| async move {
        loop {
            match client.latest_block().await {
                Ok(header) if last.map_or(true, |seen| header.number > seen) => {
                    let number = header.number;
                    return Some((Ok(header), (client, Some(number))));
                }
                Ok(_) => {}
                Err(e) => return Some((Err(e), (client, last))),
            }
            tokio::time::sleep(interval).await;
        }
    });
    Box::pin(stream)
}
