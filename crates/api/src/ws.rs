use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use runtime::RunEvent;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::state::AppState;

pub async fn events_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

/// Streams run events to one viewer. Inbound frames other than close are
/// ignored; viewers only listen.
async fn stream_events(mut socket: WebSocket, state: AppState) {
    // Subscribe first so no event between the greeting and the loop is lost.
    let mut events = state.driver().subscribe();

    if send_event(&mut socket, &greeting(&state)).await.is_err() {
        return;
    }

    loop {
        let event = tokio::select! {
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => continue,
            },
            event = next_event(&mut events, &state) => match event {
                Some(event) => event,
                None => return,
            },
        };
        if send_event(&mut socket, &event).await.is_err() {
            return;
        }
    }
}

/// Next event for the viewer. A viewer that fell behind gets a fresh
/// `connected` greeting instead of the dropped events, which makes it
/// refetch the current snapshot.
async fn next_event(
    events: &mut broadcast::Receiver<RunEvent>,
    state: &AppState,
) -> Option<RunEvent> {
    match events.recv().await {
        Ok(event) => Some(event),
        Err(RecvError::Lagged(skipped)) => {
            tracing::debug!(skipped, "viewer fell behind, resyncing");
            Some(greeting(state))
        }
        Err(RecvError::Closed) => None,
    }
}

fn greeting(state: &AppState) -> RunEvent {
    RunEvent::connected(state.driver().read(|session| session.run_id()))
}

async fn send_event(socket: &mut WebSocket, event: &RunEvent) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(payload) => socket.send(Message::Text(payload)).await,
        Err(err) => {
            tracing::warn!(error = %err, "run event could not be encoded");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use core_sim::{SimulationConfig, SimulationOptions};
    use futures_util::StreamExt;
    use runtime::RunMode;
    use serde_json::Value;
    use tokio::net::{TcpListener, TcpStream};
    use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

    use super::next_event;
    use crate::{app_with_state, AppState};

    async fn next_json(socket: &mut WebSocketStream<MaybeTlsStream<TcpStream>>) -> Value {
        loop {
            let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
                .await
                .expect("event should arrive")
                .expect("socket should stay open")
                .unwrap();
            if let Message::Text(text) = message {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn socket_greets_then_streams_run_events() {
        let state = AppState::seeded_for_test(3, Duration::from_millis(5));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = app_with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let (mut socket, _) = connect_async(format!("ws://{addr}/ws/events"))
            .await
            .unwrap();
        let greeting = next_json(&mut socket).await;
        assert_eq!(greeting["event_type"], "connected");
        assert!(greeting["run_id"].is_null());

        let config = SimulationConfig::new(SimulationOptions {
            terminal_tick: 2,
            ..SimulationOptions::default()
        })
        .unwrap();
        let run_id = state.start_run(RunMode::Both, config, None).unwrap();

        let mut kinds = Vec::new();
        for _ in 0..4 {
            let event = next_json(&mut socket).await;
            assert_eq!(event["run_id"], run_id);
            kinds.push(event["event_type"].as_str().unwrap().to_owned());
        }

        assert_eq!(kinds, ["run_started", "tick", "tick", "run_completed"]);
    }

    #[tokio::test(start_paused = true)]
    async fn lagging_viewer_is_resynced_with_a_greeting() {
        let state = AppState::seeded_for_test(9, Duration::from_millis(1));
        let mut events = state.driver().subscribe();
        let config = SimulationConfig::new(SimulationOptions {
            terminal_tick: 400,
            ..SimulationOptions::default()
        })
        .unwrap();

        let run_id = state.start_run(RunMode::Both, config, None).unwrap();
        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(state.snapshot().is_complete);

        match next_event(&mut events, &state).await {
            Some(runtime::RunEvent::Connected { run_id: resynced }) => {
                assert_eq!(resynced, Some(run_id));
            }
            other => panic!("expected a resync greeting, got {other:?}"),
        }
        assert!(matches!(
            next_event(&mut events, &state).await,
            Some(runtime::RunEvent::Tick { .. })
        ));
    }
}
