//! Server-Sent Events handler for real-time updates

use crate::state::{AppState, ServerEvent};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// SSE endpoint for real-time updates
pub async fn sync_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    let stream = BroadcastStream::new(rx);

    let event_stream = stream.filter_map(|result| {
        match result {
            Ok(event) => {
                let (event_type, data) = match event {
                    ServerEvent::AnnotationToggled {
                        uid,
                        kind,
                        reference,
                        set,
                    } => (
                        "annotation_toggled",
                        serde_json::json!({
                            "uid": uid,
                            "kind": kind,
                            "reference": reference,
                            "set": set,
                        })
                        .to_string(),
                    ),
                    ServerEvent::SignedIn { uid } => {
                        ("signed_in", serde_json::json!({ "uid": uid }).to_string())
                    }
                    ServerEvent::SignedOut { uid } => {
                        ("signed_out", serde_json::json!({ "uid": uid }).to_string())
                    }
                };

                Some(Ok(Event::default().event(event_type).data(data)))
            }
            Err(_) => None, // Lagged, skip
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
