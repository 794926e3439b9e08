// Chat feedback through the proxy bridge (fire-and-forget)

use crate::client::BridgeClient;
use radium_core::domain::PlayerId;
use radium_core::port::Messenger;
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct MessageRequest {
    text: String,
}

/// `POST /players/{id}/message`, sent on a spawned task
pub struct HttpMessenger {
    client: BridgeClient,
}

impl HttpMessenger {
    pub fn new(client: BridgeClient) -> Self {
        Self { client }
    }
}

impl Messenger for HttpMessenger {
    fn send_message(&self, player_id: PlayerId, text: &str) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(player = %player_id, "No async runtime, dropping chat message");
            return;
        };

        let client = self.client.clone();
        let path = format!("/players/{}/message", player_id);
        let request = MessageRequest {
            text: text.to_string(),
        };
        runtime.spawn(async move {
            if let Err(e) = client.post_unit(&path, &request).await {
                debug!(player = %player_id, error = %e, "Chat message not delivered");
            }
        });
    }
}
