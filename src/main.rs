//! Activity Calendar CLI
//!
//! Terminal client for the activity calendar service:
//! - Interactive shell with the month calendar and the assistant chat
//! - One-shot commands for each API operation
//! - Live update feed

use activity_calendar::calendar::{ActivityForm, FormField, MonthCursor, MonthGrid};
use activity_calendar::config::{generate_default_config, ApiConfig, Config, LoggingConfig};
use activity_calendar::model::{Activity, ActivityId, Pillar};
use activity_calendar::platform::{Clock, Confirm, FixedConfirm, StdinConfirm, SystemClock};
use activity_calendar::shell::{self, Shell, ShellOutcome};
use activity_calendar::websocket::{
    ActivityEvent, ActivitySubscription, EventSink, TungsteniteConnector,
};
use activity_calendar::{ApiClient, CalendarApi, CalendarView, ChatView, ProcessEnv};
use anyhow::Context;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "calendar")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal activity calendar with an AI assistant")]
#[command(long_about = "Organize your activities by pillar on a month calendar.\nAsk the assistant about your schedule or request changes.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: user config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Calendar service URL (overrides config and environment)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive calendar and chat shell (default)
    Shell,

    /// Print a month grid
    Month {
        /// Month as YYYY-MM (default: current month)
        month: Option<MonthCursor>,
    },

    /// Show one activity
    Show {
        id: ActivityId,
    },

    /// Create an activity
    Add {
        #[arg(short, long)]
        title: String,
        /// Date as YYYY-MM-DD
        #[arg(short, long)]
        date: String,
        #[command(flatten)]
        fields: OptionalFields,
    },

    /// Update an activity; only the given fields change
    Edit {
        id: ActivityId,
        #[arg(short, long)]
        title: Option<String>,
        /// Date as YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        #[command(flatten)]
        fields: OptionalFields,
    },

    /// Delete an activity
    Delete {
        id: ActivityId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Ask the assistant one question
    Chat {
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Print live activity events until Ctrl-C or the server closes the stream
    Watch,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct OptionalFields {
    /// Time as HH:MM (empty to clear)
    #[arg(long)]
    pub time: Option<String>,
    /// vida_sana, crecimiento_intelectual or habitos_personales
    #[arg(short, long)]
    pub pillar: Option<Pillar>,
    /// Free text (empty to clear)
    #[arg(long)]
    pub description: Option<String>,
}

impl OptionalFields {
    fn apply(&self, form: &mut ActivityForm) -> anyhow::Result<()> {
        if let Some(time) = &self.time {
            form.set(FormField::Time, time)?;
        }
        if let Some(pillar) = self.pillar {
            form.pillar = pillar;
        }
        if let Some(description) = &self.description {
            form.set(FormField::Description, description)?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path, &ProcessEnv)?,
        None => Config::load_default(&ProcessEnv),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_tracing(&config.logging);

    let command = cli.command.unwrap_or(Commands::Shell);
    if let Commands::Config { output } = &command {
        return write_default_config(output.as_deref());
    }

    config.api.validate()?;
    tracing::debug!(base_url = %config.api.base(), "Using calendar service");

    let api_config = config.api.clone();
    let api: Arc<dyn CalendarApi> = Arc::new(ApiClient::new(config.api)?);

    match command {
        Commands::Shell => run_shell(api, &api_config).await,
        Commands::Month { month } => {
            let today = SystemClock.today();
            let month = month.unwrap_or_else(|| MonthCursor::containing(today));
            let activities = api
                .get_activities()
                .await
                .context("Failed to load activities")?;
            print!("{}", shell::render_grid(&MonthGrid::build(month, &activities, today)));
            Ok(())
        }
        Commands::Show { id } => {
            let activity = api.get_activity(&id).await?;
            print_activity(&activity);
            Ok(())
        }
        Commands::Add {
            title,
            date,
            fields,
        } => {
            let mut form = ActivityForm::default();
            form.set(FormField::Title, &title)?;
            form.set(FormField::Date, &date)?;
            fields.apply(&mut form)?;

            let created = api
                .create_activity(&form.to_draft()?)
                .await
                .context("Failed to save activity")?;
            println!("Created activity #{}", created.id);
            print_activity(&created);
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            date,
            fields,
        } => {
            let current = api.get_activity(&id).await?;
            let mut form = ActivityForm::edit(&current);
            if let Some(title) = &title {
                form.set(FormField::Title, title)?;
            }
            if let Some(date) = &date {
                form.set(FormField::Date, date)?;
            }
            fields.apply(&mut form)?;

            let updated = api
                .update_activity(&id, &form.to_draft()?)
                .await
                .context("Failed to save activity")?;
            println!("Updated activity #{}", updated.id);
            print_activity(&updated);
            Ok(())
        }
        Commands::Delete { id, yes } => {
            let confirm: Box<dyn Confirm> = if yes {
                Box::new(FixedConfirm(true))
            } else {
                Box::new(StdinConfirm)
            };
            if !confirm.confirm(activity_calendar::calendar::DELETE_PROMPT) {
                println!("Cancelled");
                return Ok(());
            }

            let ack = api
                .delete_activity(&id)
                .await
                .context("Failed to delete activity")?;
            println!(
                "{}",
                ack.message
                    .unwrap_or_else(|| format!("Deleted activity #{}", id))
            );
            Ok(())
        }
        Commands::Chat { message } => {
            let reply = api.send_chat_message(&message.join(" ")).await?;
            println!("{}", reply.response);
            Ok(())
        }
        Commands::Watch => watch(&api_config).await,
        Commands::Config { .. } => Ok(()),
    }
}

/// Install the subscriber: `RUST_LOG` wins, otherwise the configured level for this crate
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("activity_calendar={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_default_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_activity(activity: &Activity) {
    println!("  id:          {}", activity.id);
    println!("  title:       {}", activity.title);
    println!("  date:        {}", activity.date.format("%Y-%m-%d"));
    if let Some(time) = activity.time {
        println!("  time:        {}", time);
    }
    println!("  pillar:      {} ({})", activity.pillar, activity.pillar.label());
    if let Some(description) = &activity.description {
        println!("  description: {}", description);
    }
}

async fn run_shell(api: Arc<dyn CalendarApi>, config: &ApiConfig) -> anyhow::Result<()> {
    let calendar = CalendarView::new(
        api.clone(),
        Arc::new(StdinConfirm),
        Arc::new(SystemClock),
        config.ws_url(),
    );
    let mut shell = Shell::new(calendar, ChatView::new(api));

    // Load failures show in the banner
    let _ = shell.calendar_mut().mount(&TungsteniteConnector).await;

    let mut stdout = std::io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "{}\n> ", shell.render().await)?;
        stdout.flush()?;

        line.clear();
        let read = tokio::task::block_in_place(|| std::io::stdin().lock().read_line(&mut line))?;
        if read == 0 {
            break;
        }

        match shell.handle_line(&line).await {
            ShellOutcome::Quit => break,
            ShellOutcome::Continue(Some(notice)) => writeln!(stdout, "{}", notice)?,
            ShellOutcome::Continue(None) => {}
        }
    }

    shell.calendar_mut().unmount().await;
    tracing::info!("Shell closed");
    Ok(())
}

struct PrintSink;

#[async_trait]
impl EventSink for PrintSink {
    async fn deliver(&self, event: ActivityEvent) {
        println!(
            "{:<8} #{} {} {}",
            event.event.as_str(),
            event.id(),
            event.activity.date.format("%Y-%m-%d"),
            event.activity.chip_label()
        );
    }
}

async fn watch(config: &ApiConfig) -> anyhow::Result<()> {
    let mut subscription = ActivitySubscription::new(config.ws_url());
    subscription
        .connect(&TungsteniteConnector, Arc::new(PrintSink))
        .await?;
    println!("Watching {} (Ctrl-C to stop)", subscription.url());

    let interrupted = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            true
        }
        _ = subscription.closed() => false,
    };

    if interrupted {
        subscription.disconnect().await;
    } else {
        println!("Live update stream closed by the server");
    }
    Ok(())
}
