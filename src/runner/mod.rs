mod bot_runner;
mod event_consumer;

pub use bot_runner::{connect, run_bot, BotAction, BRIDGED_EVENTS};
pub use event_consumer::{EventConsumer, LoggingConsumer, WelcomeConsumer};
