use shared::message::{EventType, HandshakePayload, NotificationPayload, PROTOCOL_VERSION, PushMessage};
use shared::types::EntityId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::transport::{TcpTransport, Transport};
use crate::config::NotificationConfig;
use crate::error::{ClientError, ClientResult};

/// Listens on the push channel and fans events out to subscribers
#[derive(Debug)]
pub struct NotificationListener {
    event_tx: broadcast::Sender<NotificationPayload>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl NotificationListener {
    /// Connect over TCP and start listening
    pub async fn connect(
        addr: &str,
        config: &NotificationConfig,
        user_id: Option<EntityId>,
    ) -> ClientResult<Self> {
        let transport = TcpTransport::connect(addr, config.connect_timeout).await?;
        tracing::info!(addr, "notification channel connected");
        Self::start(Arc::new(transport), config, user_id).await
    }

    /// Send the handshake and spawn the read loop
    pub async fn start<T: Transport + 'static>(
        transport: Arc<T>,
        config: &NotificationConfig,
        user_id: Option<EntityId>,
    ) -> ClientResult<Self> {
        let handshake = HandshakePayload {
            version: PROTOCOL_VERSION,
            client_name: Some(env!("CARGO_PKG_NAME").to_string()),
            client_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            user_id,
        };
        let msg = PushMessage::handshake(&handshake)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        transport.write_message(&msg).await?;

        let (event_tx, _) = broadcast::channel(config.buffer_size.max(1));
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(run(
            transport,
            event_tx.clone(),
            shutdown.clone(),
            config.heartbeat_interval,
        ));

        Ok(Self {
            event_tx,
            shutdown,
            task,
        })
    }

    /// Subscribe to incoming notifications
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationPayload> {
        self.event_tx.subscribe()
    }

    /// False once the server hung up or the stream broke
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop listening and close the connection
    pub async fn close(mut self) {
        self.shutdown.cancel();
        if let Err(e) = (&mut self.task).await {
            tracing::warn!(error = %e, "notification task ended abnormally");
        }
    }
}

impl Drop for NotificationListener {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run<T: Transport + 'static>(
    transport: Arc<T>,
    event_tx: broadcast::Sender<NotificationPayload>,
    shutdown: CancellationToken,
    heartbeat: Duration,
) {
    // Reads are not cancel safe, so heartbeats go out from their own task
    let stop_heartbeat = shutdown.child_token();
    let heartbeat_task = (!heartbeat.is_zero()).then(|| {
        tokio::spawn(send_heartbeats(
            transport.clone(),
            stop_heartbeat.clone(),
            heartbeat,
        ))
    });

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            msg = transport.read_message() => match msg {
                Ok(msg) => dispatch(&event_tx, msg),
                Err(e) => {
                    tracing::error!(error = %e, "notification channel closed");
                    break;
                }
            },
        }
    }

    stop_heartbeat.cancel();
    if let Some(task) = heartbeat_task {
        let _ = task.await;
    }
    if let Err(e) = transport.close().await {
        tracing::debug!(error = %e, "close after shutdown");
    }
}

async fn send_heartbeats<T: Transport>(transport: Arc<T>, stop: CancellationToken, every: Duration) {
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = stop.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = transport.write_message(&PushMessage::heartbeat()).await {
                    tracing::warn!(error = %e, "heartbeat failed");
                    break;
                }
            }
        }
    }
}

fn dispatch(event_tx: &broadcast::Sender<NotificationPayload>, msg: PushMessage) {
    match msg.event_type {
        EventType::Notification => match msg.parse_payload::<NotificationPayload>() {
            Ok(payload) => {
                tracing::debug!(title = %payload.title, "notification received");
                if event_tx.send(payload).is_err() {
                    tracing::debug!("no notification subscribers");
                }
            }
            Err(e) => tracing::warn!(id = %msg.id, error = %e, "malformed notification dropped"),
        },
        EventType::Heartbeat => tracing::trace!("heartbeat"),
        EventType::Handshake => tracing::debug!(id = %msg.id, "unexpected handshake from server"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::FRAME_HEADER_LEN;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_handshake_then_notifications() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut header = [0u8; FRAME_HEADER_LEN];
            socket.read_exact(&mut header).await.unwrap();
            let (event_type, _, len) = PushMessage::decode_header(&header).unwrap();
            assert_eq!(event_type, EventType::Handshake);
            let mut body = vec![0u8; len];
            socket.read_exact(&mut body).await.unwrap();
            let handshake: HandshakePayload = serde_json::from_slice(&body).unwrap();
            assert_eq!(handshake.user_id, Some(4));

            socket.write_all(&PushMessage::heartbeat().encode().unwrap()).await.unwrap();
            let payload = NotificationPayload::new("PO approved", "PO-0007 approved").with_id(31);
            let frame = PushMessage::notification(&payload).unwrap().encode().unwrap();
            socket.write_all(&frame).await.unwrap();
            socket
        });

        let config = NotificationConfig::default().with_heartbeat_interval(Duration::ZERO);
        let listener = NotificationListener::connect(&addr, &config, Some(4)).await.unwrap();
        let mut rx = listener.subscribe();

        let received = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.title, "PO approved");
        assert_eq!(received.notification_id, Some(31));

        let _socket = server.await.unwrap();
        listener.close().await;
    }

    #[tokio::test]
    async fn test_listener_stops_when_server_hangs_up() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut header = [0u8; FRAME_HEADER_LEN];
            socket.read_exact(&mut header).await.unwrap();
            drop(socket);
        });

        let config = NotificationConfig::default().with_heartbeat_interval(Duration::ZERO);
        let listener = NotificationListener::connect(&addr, &config, None).await.unwrap();
        server.await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), async {
            while listener.is_running() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_heartbeats_are_sent() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut events = Vec::new();
            for _ in 0..2 {
                let mut header = [0u8; FRAME_HEADER_LEN];
                socket.read_exact(&mut header).await.unwrap();
                let (event_type, _, len) = PushMessage::decode_header(&header).unwrap();
                let mut body = vec![0u8; len];
                socket.read_exact(&mut body).await.unwrap();
                events.push(event_type);
            }
            events
        });

        let config = NotificationConfig::default().with_heartbeat_interval(Duration::from_millis(20));
        let listener = NotificationListener::connect(&addr, &config, None).await.unwrap();

        let events = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(events, vec![EventType::Handshake, EventType::Heartbeat]);
        listener.close().await;
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = NotificationListener::connect(&addr, &NotificationConfig::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }
}
