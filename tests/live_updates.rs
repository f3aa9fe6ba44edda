//! Live updates over a real WebSocket

use activity_calendar::calendar::ActivityStore;
use activity_calendar::config::ApiConfig;
use activity_calendar::model::ActivityId;
use activity_calendar::websocket::{ActivitySubscription, EventSink, TungsteniteConnector};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Frames the server pushes to every client, in order
fn script() -> Vec<Message> {
    vec![
        Message::Text(
            r#"{"event":"created","activity":{"id":1,"title":"Gym","date":"2024-06-10","time":"07:00","pillar":"vida_sana"}}"#
                .to_string(),
        ),
        Message::Text("{\"event\":\"renamed\"}".to_string()),
        Message::Binary(
            br#"{"event":"created","activity":{"id":2,"title":"Read","date":"2024-06-10","pillar":"crecimiento_intelectual"}}"#
                .to_vec(),
        ),
        Message::Text(
            r#"{"event":"updated","activity":{"id":1,"title":"Gym","date":"2024-06-10","time":"08:00","pillar":"vida_sana"}}"#
                .to_string(),
        ),
    ]
}

async fn push_script(mut socket: WebSocket, done: mpsc::UnboundedSender<()>) {
    for frame in script() {
        if socket.send(frame).await.is_err() {
            return;
        }
    }
    // Hold the socket open until the client closes it
    while let Some(Ok(message)) = socket.recv().await {
        if matches!(message, Message::Close(_)) {
            break;
        }
    }
    let _ = done.send(());
}

async fn spawn_server() -> (String, mpsc::UnboundedReceiver<()>) {
    let (done_tx, done_rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/ws/activities",
        get(move |ws: WebSocketUpgrade| {
            let done = done_tx.clone();
            async move { ws.on_upgrade(move |socket| push_script(socket, done)) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), done_rx)
}

#[tokio::test]
async fn test_events_reach_the_store() {
    let (base_url, mut server_done) = spawn_server().await;
    let ws_url = ApiConfig::new(base_url).ws_url();
    assert!(ws_url.starts_with("ws://127.0.0.1:"));
    assert!(ws_url.ends_with("/ws/activities"));

    let store = ActivityStore::new();
    let sink: Arc<dyn EventSink> = Arc::new(store.clone());
    let mut subscription = ActivitySubscription::new(ws_url);
    subscription
        .connect(&TungsteniteConnector, sink)
        .await
        .unwrap();
    assert!(subscription.is_connected());

    let mut settled = false;
    for _ in 0..200 {
        let gym = store.get(&ActivityId::Int(1)).await;
        if store.len().await == 2 && gym.map(|a| a.chip_label()) == Some("08:00 Gym".to_string()) {
            settled = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(settled, "store never caught up: {:?}", store.snapshot().await);

    subscription.disconnect().await;
    assert!(!subscription.is_connected());

    let closed = tokio::time::timeout(Duration::from_secs(2), server_done.recv()).await;
    assert!(matches!(closed, Ok(Some(()))));
}
