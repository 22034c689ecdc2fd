// Speech listener behavior against a local stand-in recognizer: the happy
// path and the retry-once-then-degrade path, driven through the audio
// channel with a scripted backend instead of a microphone.

use anyhow::Result;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use meeting_scribe::audio::{AudioBackend, AudioFrame};
use meeting_scribe::speech::{AzureSpeechClient, SpeechListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Backend that replays a fixed sequence of frames and then closes the
/// channel.
struct ScriptedBackend {
    frames: Vec<AudioFrame>,
}

#[async_trait::async_trait]
impl AudioBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let (tx, rx) = mpsc::channel(self.frames.len().max(1));
        for frame in self.frames.drain(..) {
            tx.send(frame).await.expect("receiver is held");
        }
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// 100 Hz mono keeps one recognition chunk at 800 samples.
fn frame(samples: usize) -> AudioFrame {
    AudioFrame {
        samples: vec![0i16; samples],
        sample_rate: 100,
        channels: 1,
        timestamp_ms: 0,
    }
}

/// Local recognizer that always answers with the given status and body,
/// counting the requests it sees.
async fn recognizer_stub(
    status: StatusCode,
    body: serde_json::Value,
) -> Result<(String, Arc<AtomicUsize>)> {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let app = Router::new().route(
        "/speech",
        post(move || {
            let counter = Arc::clone(&counter);
            let body = body.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (status, Json(body))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{}/speech", addr), hits))
}

#[tokio::test]
async fn recognized_text_is_emitted_as_an_event() -> Result<()> {
    let (endpoint, hits) = recognizer_stub(
        StatusCode::OK,
        serde_json::json!({"RecognitionStatus": "Success", "DisplayText": "Hello there."}),
    )
    .await?;
    let client = AzureSpeechClient::with_endpoint(endpoint, "test-key");

    let backend = ScriptedBackend {
        frames: vec![frame(400), frame(400)],
    };
    let mut listener = SpeechListener::new(Box::new(backend), client);
    let mut events = listener.start().await?;

    let event = events.recv().await.expect("one recognized utterance");
    assert_eq!(event.text, "Hello there.");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    listener.stop().await?;
    Ok(())
}

#[tokio::test]
async fn transport_failure_is_retried_once_then_degrades() -> Result<()> {
    let (endpoint, hits) = recognizer_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({}),
    )
    .await?;
    let client = AzureSpeechClient::with_endpoint(endpoint, "test-key");

    let backend = ScriptedBackend {
        frames: vec![frame(400), frame(400)],
    };
    let mut listener = SpeechListener::new(Box::new(backend), client);
    let mut events = listener.start().await?;

    // The failing chunk is sent exactly twice (original + one retry), then
    // the event channel closes without an event.
    assert!(events.recv().await.is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // Teardown still works after degradation.
    listener.stop().await?;
    Ok(())
}
