// Integration tests for the bot runner, driven by the in-memory SDK

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use korth_spirit::config::BotConfig;
use korth_spirit::runner::{self, EventConsumer, LoggingConsumer, WelcomeConsumer};
use korth_spirit::{Attribute, Coordinates, EventEnvelope, EventKind, FakeSdk, Sdk, Universe};
use tokio::sync::{mpsc, watch};

fn bot_config(greeting: Option<&str>) -> BotConfig {
    BotConfig {
        bot_name: "Korth".to_string(),
        citizen_number: 318855,
        password: "secret".to_string(),
        world_name: "AWTeen".to_string(),
        coordinates: Coordinates::new(1000, 0, -1000),
        greeting: greeting.map(str::to_string),
        sdk_path: PathBuf::from("aw64.dll"),
        universe: Universe::default(),
        build: 134,
    }
}

/// Forwards every envelope to the test
struct ForwardingConsumer(mpsc::UnboundedSender<EventEnvelope>);

impl EventConsumer for ForwardingConsumer {
    fn handle_event(&mut self, envelope: EventEnvelope) {
        let _ = self.0.send(envelope);
    }
}

async fn wait_for(fake: &FakeSdk, call: &str) -> bool {
    for _ in 0..200 {
        if fake.calls().iter().any(|c| c == call) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_bot_lifecycle() {
    let fake = Arc::new(FakeSdk::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();

    fake.push_event(
        EventKind::Chat,
        vec![
            (Attribute::AvatarName, "Visitor".into()),
            (Attribute::ChatMessage, "hello bot".into()),
            (Attribute::ChatSession, 12.into()),
        ],
    );

    let bot = tokio::spawn(runner::run_bot(
        fake.clone(),
        bot_config(Some("Hi there")),
        move |_| -> Vec<Box<dyn EventConsumer>> {
            vec![Box::new(LoggingConsumer), Box::new(ForwardingConsumer(seen_tx))]
        },
        shutdown_rx,
    ));

    let envelope = tokio::time::timeout(Duration::from_secs(5), seen_rx.recv())
        .await
        .expect("no event within timeout")
        .expect("channel closed");
    assert_eq!(envelope.kind, EventKind::Chat);
    assert_eq!(envelope.string(Attribute::ChatMessage), Some("hello bot"));
    assert_eq!(envelope.string(Attribute::AvatarName), Some("Visitor"));

    shutdown_tx.send(true).unwrap();
    bot.await.unwrap().unwrap();

    let calls = fake.calls();
    assert!(calls.contains(&"aw_init(134)".to_string()));
    assert!(calls.contains(&"aw_enter(AWTeen)".to_string()));
    assert!(calls.contains(&"aw_say(Hi there)".to_string()));
    assert_eq!(calls.last().map(String::as_str), Some("aw_term()"));
    assert_eq!(fake.live_instances(), 0);
    assert_eq!(fake.int(Attribute::MyX), 1000);
}

#[tokio::test]
async fn test_consumers_act_through_the_sdk_thread() {
    let fake = Arc::new(FakeSdk::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let bot = tokio::spawn(runner::run_bot(
        fake.clone(),
        bot_config(None),
        |action_tx| -> Vec<Box<dyn EventConsumer>> {
            vec![Box::new(WelcomeConsumer::new("Welcome!", action_tx))]
        },
        shutdown_rx,
    ));

    assert!(wait_for(&fake, "aw_enter(AWTeen)").await);
    fake.push_event(
        EventKind::AvatarAdd,
        vec![
            (Attribute::AvatarSession, 77.into()),
            (Attribute::AvatarName, "Newcomer".into()),
        ],
    );

    assert!(
        wait_for(&fake, "aw_whisper(77, Welcome!)").await,
        "greeting was never whispered: {:?}",
        fake.calls()
    );

    shutdown_tx.send(true).unwrap();
    bot.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unbridged_events_are_not_forwarded() {
    let fake = Arc::new(FakeSdk::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let seen = Arc::new(Mutex::new(Vec::new()));

    struct Recorder(Arc<Mutex<Vec<EventKind>>>);
    impl EventConsumer for Recorder {
        fn handle_event(&mut self, envelope: EventEnvelope) {
            self.0.lock().unwrap().push(envelope.kind);
        }
    }

    let recorder = seen.clone();
    let bot = tokio::spawn(runner::run_bot(
        fake.clone(),
        bot_config(None),
        move |_| -> Vec<Box<dyn EventConsumer>> { vec![Box::new(Recorder(recorder))] },
        shutdown_rx,
    ));

    assert!(wait_for(&fake, "aw_enter(AWTeen)").await);
    fake.push_event(EventKind::ObjectClick, Vec::new());
    fake.push_event(EventKind::AvatarDelete, vec![(Attribute::AvatarName, "Gone".into())]);

    for _ in 0..200 {
        if !seen.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    shutdown_tx.send(true).unwrap();
    bot.await.unwrap().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![EventKind::AvatarDelete]);
    assert!(!fake.has_handler(EventKind::ObjectClick));
}
