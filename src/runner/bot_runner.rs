use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{error, info, warn};

use crate::config::BotConfig;
use crate::coords::Coordinates;
use crate::error::{Error, Result};
use crate::events::EventEnvelope;
use crate::instance::Instance;
use crate::runner::EventConsumer;
use crate::sdk::{EventKind, Sdk};

/// How long each `wait` on the SDK thread blocks before checking for
/// actions and shutdown.
const PUMP_WAIT_MS: i32 = 100;

/// Events forwarded to consumers.
pub const BRIDGED_EVENTS: &[EventKind] = &[
    EventKind::AvatarAdd,
    EventKind::AvatarChange,
    EventKind::AvatarDelete,
    EventKind::Chat,
    EventKind::Teleport,
    EventKind::WorldDisconnect,
    EventKind::UniverseDisconnect,
];

/// Requests consumers send back to the SDK thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    Say(String),
    Whisper { session: i32, message: String },
    MoveTo(Coordinates),
}

/// Create an instance, log in, enter the configured world and move to the
/// configured position. The SDK must already be initialized.
pub fn connect(sdk: Arc<dyn Sdk>, config: &BotConfig) -> Result<Instance> {
    let mut instance = Instance::create(sdk, config.bot_name.as_str(), &config.universe)?;
    instance
        .login(config.citizen_number, &config.password)?
        .move_to(config.coordinates)?
        .enter_world(&config.world_name)?;
    Ok(instance)
}

fn perform(instance: &mut Instance, action: BotAction) -> Result<()> {
    match action {
        BotAction::Say(message) => instance.say(&message).map(|_| ()),
        BotAction::Whisper { session, message } => {
            instance.whisper(session, &message).map(|_| ())
        }
        BotAction::MoveTo(coords) => instance.move_to(coords).map(|_| ()),
    }
}

fn drain_actions(instance: &mut Instance, action_rx: &mut mpsc::UnboundedReceiver<BotAction>) {
    while let Ok(action) = action_rx.try_recv() {
        if let Err(e) = perform(instance, action.clone()) {
            warn!("Failed to perform {:?}: {}", action, e);
        }
    }
}

/// Body of the SDK thread. Every vendor call for this bot happens here.
fn pump(
    sdk: Arc<dyn Sdk>,
    config: BotConfig,
    ready_tx: oneshot::Sender<Result<broadcast::Receiver<EventEnvelope>>>,
    mut action_rx: mpsc::UnboundedReceiver<BotAction>,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    let setup = || -> Result<(Instance, broadcast::Receiver<EventEnvelope>)> {
        let instance = connect(sdk.clone(), &config)?;
        let event_rx = instance.channel();
        for &kind in BRIDGED_EVENTS {
            instance.events().hook(kind)?;
        }
        if let Some(greeting) = &config.greeting {
            instance.say(greeting)?;
        }
        Ok((instance, event_rx))
    };

    if let Err(e) = sdk.init(config.build) {
        let _ = ready_tx.send(Err(Error::NotReady));
        return Err(e);
    }
    let mut instance = match setup() {
        Ok((instance, event_rx)) => {
            let _ = ready_tx.send(Ok(event_rx));
            instance
        }
        Err(e) => {
            let _ = ready_tx.send(Err(Error::NotReady));
            sdk.term();
            return Err(e);
        }
    };

    info!("{} is running in {}", config.bot_name, config.world_name);
    let outcome = loop {
        if *shutdown_rx.borrow() {
            info!("Bot received shutdown signal");
            break Ok(());
        }
        drain_actions(&mut instance, &mut action_rx);
        if let Err(e) = instance.wait(PUMP_WAIT_MS) {
            error!("SDK wait failed: {}", e);
            break Err(e);
        }
    };
    drain_actions(&mut instance, &mut action_rx);

    drop(instance);
    sdk.term();
    info!("{} stopped", config.bot_name);
    outcome
}

/// Run one bot until `shutdown_rx` turns true or the SDK fails.
///
/// The vendor library is driven from a dedicated blocking thread. Events in
/// [`BRIDGED_EVENTS`] are copied onto a broadcast channel and handed to the
/// consumers on an async task; consumers act on the bot through the
/// [`BotAction`] sender they are built with.
pub async fn run_bot<F>(
    sdk: Arc<dyn Sdk>,
    config: BotConfig,
    make_consumers: F,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<()>
where
    F: FnOnce(mpsc::UnboundedSender<BotAction>) -> Vec<Box<dyn EventConsumer>>,
{
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = oneshot::channel();
    let mut consumers = make_consumers(action_tx);

    let pump_task =
        tokio::task::spawn_blocking(move || pump(sdk, config, ready_tx, action_rx, shutdown_rx));

    let mut event_rx = match ready_rx.await {
        Ok(Ok(event_rx)) => event_rx,
        // The pump reports the real cause through its own result.
        Ok(Err(_)) | Err(_) => return pump_task.await?,
    };

    let event_task = tokio::spawn(async move {
        info!(target: "events", "Event handler task started");
        loop {
            match event_rx.recv().await {
                Ok(envelope) => {
                    for consumer in consumers.iter_mut() {
                        consumer.handle_event(envelope.clone());
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    error!(target: "events", "Event receiver lagged, {} messages were skipped", skipped);
                }
                Err(RecvError::Closed) => {
                    info!(target: "events", "Event channel closed");
                    break;
                }
            }
        }
        info!(target: "events", "Event handler task stopped");
    });

    let outcome = pump_task.await?;

    // Wait for event handler task to finish with a timeout
    match tokio::time::timeout(Duration::from_secs(1), event_task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(target: "events", "Event handler task panicked: {}", e),
        Err(_) => {
            info!(target: "events", "Event handler task did not finish within timeout, continuing shutdown")
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Universe;
    use crate::sdk::{Attribute, FakeSdk};
    use std::path::PathBuf;

    fn config() -> BotConfig {
        BotConfig {
            bot_name: "Korth".to_string(),
            citizen_number: 1,
            password: "pw".to_string(),
            world_name: "Alpha".to_string(),
            coordinates: Coordinates::new(10, 0, 20),
            greeting: None,
            sdk_path: PathBuf::from("aw64.dll"),
            universe: Universe::default(),
            build: 134,
        }
    }

    #[test]
    fn test_connect_orders_calls() {
        let fake = Arc::new(FakeSdk::new());
        fake.init(134).unwrap();
        let instance = connect(fake.clone(), &config()).unwrap();

        let calls = fake.calls();
        let pos = |name: &str| calls.iter().position(|c| c.starts_with(name)).unwrap();
        assert!(pos("aw_create") < pos("aw_login"));
        assert!(pos("aw_login") < pos("aw_enter"));
        assert!(pos("aw_enter") < pos("aw_state_change"));
        assert_eq!(instance.world_name(), Some("Alpha"));
        assert_eq!(fake.int(Attribute::MyZ), 20);
    }

    #[tokio::test]
    async fn test_setup_failure_is_returned() {
        let fake = Arc::new(FakeSdk::new());
        fake.fail_next("aw_login", 3);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let err = run_bot(fake.clone(), config(), |_| Vec::new(), shutdown_rx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Sdk { call: "aw_login", .. }));
        assert_eq!(fake.live_instances(), 0);
    }

    #[tokio::test]
    async fn test_already_shut_down_bot_exits_cleanly() {
        let fake = Arc::new(FakeSdk::new());
        let (_shutdown_tx, shutdown_rx) = watch::channel(true);

        run_bot(fake.clone(), config(), |_| Vec::new(), shutdown_rx)
            .await
            .unwrap();
        assert!(fake.calls().contains(&"aw_term()".to_string()));
        assert_eq!(fake.live_instances(), 0);
    }
}
