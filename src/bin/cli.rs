use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::watch;
use tracing::{error, info};

use korth_spirit::config::{default_config_path, AggregateConfig, BotConfig, ConfigLayer};
use korth_spirit::logging::init_logging;
use korth_spirit::runner::{self, EventConsumer, LoggingConsumer, WelcomeConsumer};
use korth_spirit::{Coordinates, Instance, NativeSdk, Sdk, ValueKind};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enables debug mode
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    /// Config file to read instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write logs to the data directory
    #[arg(long)]
    log_file: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

/// Settings that take priority over the environment and the config file
#[derive(clap::Args)]
struct Overrides {
    #[arg(long, global = true)]
    bot_name: Option<String>,

    #[arg(long, global = true)]
    citizen: Option<i32>,

    #[arg(long, global = true)]
    world: Option<String>,

    /// "x,y,z" or "x,y,z,yaw"
    #[arg(long, global = true)]
    coords: Option<Coordinates>,

    /// Path to the SDK library
    #[arg(long, global = true)]
    sdk: Option<PathBuf>,
}

impl Overrides {
    fn into_layer(self) -> ConfigLayer {
        ConfigLayer {
            bot_name: self.bot_name,
            citizen_number: self.citizen,
            world_name: self.world,
            world_coordinates: self.coords,
            sdk_path: self.sdk,
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Enter the world and log events until Ctrl+C
    Run,
    /// List the objects in the 3x3 sector block around a sector
    Query { x: i32, z: i32 },
    /// List every object in the world
    Scan,
    /// Print a world attribute, e.g. `world-attr size`
    WorldAttr {
        name: String,
        #[arg(long, value_enum, default_value_t = Kind::String)]
        kind: Kind,
    },
    /// Print the world rights of a citizen
    Rights { citizen: i32 },
    /// Write an example config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Int,
    Bool,
    Float,
    String,
    Data,
}

impl From<Kind> for ValueKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Int => ValueKind::Int,
            Kind::Bool => ValueKind::Bool,
            Kind::Float => ValueKind::Float,
            Kind::String => ValueKind::String,
            Kind::Data => ValueKind::Data,
        }
    }
}

fn init_config(path: &Path, force: bool) -> Result<(), Box<dyn Error>> {
    if path.exists() && !force {
        return Err(format!("{} already exists, pass --force to overwrite", path.display()).into());
    }
    ConfigLayer::template().save(path)?;
    eprintln!("Config file created at: {}", path.display());
    eprintln!("Please edit it with your citizen number and password.");
    Ok(())
}

/// Initialize the SDK, connect, run `f` against the instance, then tear
/// everything down again.
fn with_instance<T>(
    config: &BotConfig,
    f: impl FnOnce(&Instance) -> korth_spirit::Result<T>,
) -> Result<T, Box<dyn Error>> {
    let sdk: Arc<dyn Sdk> = Arc::new(NativeSdk::load(&config.sdk_path)?);
    sdk.init(config.build)?;
    let result = runner::connect(sdk.clone(), config).and_then(|instance| f(&instance));
    sdk.term();
    Ok(result?)
}

async fn run(config: BotConfig) -> Result<(), Box<dyn Error>> {
    let sdk: Arc<dyn Sdk> = Arc::new(NativeSdk::load(&config.sdk_path)?);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down gracefully...");
            let _ = shutdown_tx.send(true);
        }
    });

    let greeting = config.greeting.clone();
    runner::run_bot(
        sdk,
        config,
        move |action_tx| {
            let mut consumers: Vec<Box<dyn EventConsumer>> = vec![Box::new(LoggingConsumer)];
            if let Some(greeting) = greeting {
                consumers.push(Box::new(WelcomeConsumer::new(greeting, action_tx)));
            }
            consumers
        },
        shutdown_rx,
    )
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _guard = init_logging("korth", cli.debug, cli.log_file)?;

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    if let Command::InitConfig { force } = cli.command {
        return init_config(&config_path, force);
    }

    let config = AggregateConfig::new()
        .with_layer("command line", cli.overrides.into_layer())
        .with_env()
        .with_file(&config_path)?
        .resolve()
        .inspect_err(|e| {
            error!("{}", e);
            eprintln!("Run `korth init-config` to create {}", config_path.display());
        })?;

    match cli.command {
        Command::Run => run(config).await?,
        Command::Query { x, z } => {
            let objects = with_instance(&config, |instance| instance.query(x, z))?;
            for object in &objects {
                println!(
                    "#{} {} at {},{},{} (owner {})",
                    object.number, object.model, object.x, object.y, object.z, object.owner
                );
            }
            println!("{} object(s)", objects.len());
        }
        Command::Scan => {
            let count = with_instance(&config, |instance| {
                let mut count = 0;
                for object in instance.world().objects()? {
                    match object {
                        Ok(object) => {
                            count += 1;
                            println!("#{} {} at {}", object.number, object.model, object.position);
                        }
                        Err(e) => error!("Query failed: {}", e),
                    }
                }
                Ok(count)
            })?;
            println!("{} object(s)", count);
        }
        Command::WorldAttr { name, kind } => {
            let value = with_instance(&config, |instance| {
                instance.world().get_attribute(name.as_str(), kind.into())
            })?;
            println!("{} = {}", name, value);
        }
        Command::Rights { citizen } => {
            let avatar = with_instance(&config, |instance| instance.avatar(citizen))?;
            for (right, held) in avatar.rights() {
                println!("{:<40} {}", right.name(), if held { "yes" } else { "no" });
            }
        }
        Command::InitConfig { .. } => {}
    }

    Ok(())
}
