mod console;

use clap::{Parser, Subcommand};
use console::{ConsoleHost, TerminalToasts};
use nudge_core::history::MetricSummary;
use nudge_core::messages::format_value;
use nudge_core::store::{GoalPatch, NewGoal, NewReminder};
use nudge_core::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nudge")]
#[command(about = "Progress-driven health reminders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one smart reminder check
    Check {
        /// Ignore the throttle window
        #[arg(long)]
        force: bool,
    },

    /// Check now and then periodically until interrupted
    Watch,

    /// Record a metric value for today
    Log {
        /// Metric (water, steps, sleep, calories_burn, ...)
        metric: GoalType,

        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Replace today's value instead of adding to it
        #[arg(long)]
        set: bool,
    },

    /// Show today's progress toward active goals
    Status,

    /// Manage goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Manage reminders
    Reminder {
        #[command(subcommand)]
        command: ReminderCommands,
    },

    /// Summarize recent days
    History {
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Also write the window to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Send a test notification
    NotifyTest,

    /// Notification permission
    Permission {
        #[command(subcommand)]
        command: PermissionCommands,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Set the active goal for a metric
    Set {
        goal_type: GoalType,
        target: f64,
        #[arg(long, default_value = "daily")]
        period: GoalPeriod,
    },
    /// List all goals
    List,
}

#[derive(Subcommand)]
enum ReminderCommands {
    /// Add a smart reminder
    AddSmart {
        reminder_type: ReminderType,
        trigger: SmartTrigger,
        #[arg(long)]
        title: Option<String>,
    },
    /// Replace smart reminders from the presets
    Setup {
        /// Use the recommended trigger of every preset
        #[arg(long, conflicts_with = "pick")]
        recommended: bool,

        /// Pick a trigger for a type, e.g. water=below_50
        #[arg(long, value_parser = parse_pick)]
        pick: Vec<(ReminderType, SmartTrigger)>,
    },
    /// List all reminders
    List,
}

#[derive(Subcommand)]
enum PermissionCommands {
    /// Ask for permission to show notifications
    Request,
}

fn parse_pick(s: &str) -> std::result::Result<(ReminderType, SmartTrigger), String> {
    let (kind, trigger) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=TRIGGER, got '{}'", s))?;
    let kind = kind.parse::<ReminderType>().map_err(|e| e.to_string())?;
    let trigger = trigger.parse::<SmartTrigger>().map_err(|e| e.to_string())?;
    Ok((kind, trigger))
}

/// Everything a command may need, built from the config
struct App {
    config: Config,
    config_path: PathBuf,
    store: Arc<FileStore>,
    service: Arc<NotificationService>,
}

impl App {
    fn new(cli_data_dir: Option<PathBuf>, cli_config: Option<PathBuf>) -> Result<Self> {
        let config_path = cli_config.unwrap_or_else(Config::default_config_path);
        let config = if config_path.exists() {
            Config::load_from(&config_path)?
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Config::default()
        };

        let data_dir = cli_data_dir.unwrap_or_else(|| config.data.data_dir.clone());
        let store = Arc::new(FileStore::new(data_dir));

        let host = Arc::new(ConsoleHost::new(
            config.notifications.native,
            config.notifications.permission,
        ));
        let service = Arc::new(NotificationService::new(
            host,
            Arc::new(TerminalToasts),
            Arc::new(SystemClock),
            Arc::new(ThreadRandom),
            config.notifications.clone(),
        ));

        Ok(Self {
            config,
            config_path,
            store,
            service,
        })
    }

    fn evaluator(&self) -> Arc<SmartReminderEvaluator> {
        Arc::new(SmartReminderEvaluator::new(
            self.service.clone(),
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.config.reminders.throttle(),
        ))
    }

    fn today(&self) -> chrono::NaiveDate {
        self.service.clock().today()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    nudge_core::logging::init_with_level("warn");

    let cli = Cli::parse();
    let app = App::new(cli.data_dir, cli.config)?;

    match cli.command {
        Commands::Check { force } => cmd_check(&app, force).await,
        Commands::Watch => cmd_watch(&app).await,
        Commands::Log { metric, value, set } => cmd_log(&app, metric, value, set).await,
        Commands::Status => cmd_status(&app).await,
        Commands::Goal { command } => match command {
            GoalCommands::Set {
                goal_type,
                target,
                period,
            } => cmd_goal_set(&app, goal_type, target, period).await,
            GoalCommands::List => cmd_goal_list(&app).await,
        },
        Commands::Reminder { command } => match command {
            ReminderCommands::AddSmart {
                reminder_type,
                trigger,
                title,
            } => cmd_reminder_add_smart(&app, reminder_type, trigger, title).await,
            ReminderCommands::Setup { recommended, pick } => {
                cmd_reminder_setup(&app, recommended, pick).await
            }
            ReminderCommands::List => cmd_reminder_list(&app).await,
        },
        Commands::History { days, export } => cmd_history(&app, days, export.as_deref()).await,
        Commands::NotifyTest => cmd_notify_test(&app),
        Commands::Permission {
            command: PermissionCommands::Request,
        } => cmd_permission_request(&app).await,
    }
}

async fn cmd_check(app: &App, force: bool) -> Result<()> {
    let evaluator = app.evaluator();
    let outcome = if force {
        evaluator.force_cycle().await
    } else {
        evaluator.run_cycle_once().await
    };

    match outcome {
        CycleOutcome::Throttled => {
            println!("Checked recently, skipping. Use --force to check anyway.");
            Ok(())
        }
        CycleOutcome::Aborted { reason } => Err(Error::Store(reason)),
        CycleOutcome::Completed(report) => {
            display_report(&report);
            Ok(())
        }
    }
}

fn display_report(report: &CycleReport) {
    println!();
    println!("✓ Smart reminder check complete");
    println!("  Fired: {}", report.fired.len());
    for fired in &report.fired {
        println!(
            "  → {} at {}%: {}",
            fired.reminder_type,
            fired.progress.round() as i64,
            fired.message
        );
        if !fired.persisted {
            println!("    (could not save trigger time, it may fire again today)");
        }
    }
    println!("  Skipped: {}", report.skipped.len());
    for (id, reason) in &report.skipped {
        println!("  · {}: {}", id, describe_skip(*reason));
    }
}

fn describe_skip(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NoTrigger => "no trigger configured",
        SkipReason::NoGoal => "no active goal",
        SkipReason::NoTarget => "goal has no target",
        SkipReason::BandMismatch => "progress outside trigger band",
        SkipReason::AlreadyToday => "already triggered today",
        SkipReason::NoMessage => "no message for this progress",
    }
}

async fn cmd_watch(app: &App) -> Result<()> {
    let interval = app.config.reminders.interval();
    let schedule = app.evaluator().start(interval)?;
    println!(
        "Watching smart reminders every {} minutes. Press Ctrl-C to stop.",
        app.config.reminders.interval_minutes
    );

    tokio::signal::ctrl_c().await?;
    schedule.stop();
    println!("\nStopped.");
    Ok(())
}

async fn cmd_log(app: &App, metric: GoalType, value: f64, set: bool) -> Result<()> {
    let change = if set {
        MetricChange::Set(value)
    } else {
        MetricChange::Add(value)
    };
    let record = record_metric(app.store.as_ref(), app.today(), metric, change).await?;

    println!(
        "✓ Logged {}: {} → {} {}",
        metric,
        format_value(record.previous),
        format_value(record.current),
        metric.unit()
    );

    let goals = app.store.filter_active().await?;
    let target = goals
        .iter()
        .find(|g| g.goal_type == metric)
        .map(|g| g.target_value)
        .or_else(|| fallback_target(metric));

    let mut notifier = ProgressNotifier::new(app.service.clone());
    notifier.on_metric_updated(metric, record.current, target, Some(record.previous));
    Ok(())
}

/// Target assumed for celebrations when no goal is set
fn fallback_target(metric: GoalType) -> Option<f64> {
    match metric {
        GoalType::Steps | GoalType::Water => Some(metric.default_target()),
        _ => None,
    }
}

async fn cmd_status(app: &App) -> Result<()> {
    let today = app.today();
    let (metrics, goals) = tokio::try_join!(
        app.store.filter(MetricFilter::Date(today)),
        app.store.filter_active(),
    )?;
    let snapshot = metrics.first();

    println!("\nToday ({})", today.format("%Y-%m-%d"));
    if goals.is_empty() {
        println!("  No active goals. Set one with `nudge goal set <type> <target>`.");
        return Ok(());
    }

    for goal in &goals {
        let current = snapshot.map(|s| s.value_for(goal.goal_type)).unwrap_or(0.0);
        let progress = if goal.target_value > 0.0 {
            current / goal.target_value * 100.0
        } else {
            0.0
        };
        println!(
            "  {:<16} {} / {} {} ({}%, {})",
            goal.goal_type.label(),
            format_value(current),
            format_value(goal.target_value),
            goal.unit,
            progress.round() as i64,
            SmartTrigger::for_progress(progress)
        );
    }
    println!();
    Ok(())
}

async fn cmd_goal_set(
    app: &App,
    goal_type: GoalType,
    target: f64,
    period: GoalPeriod,
) -> Result<()> {
    let store = app.store.as_ref();
    for previous in store
        .filter_active()
        .await?
        .iter()
        .filter(|g| g.goal_type == goal_type)
    {
        GoalStore::update(
            store,
            &previous.id,
            GoalPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;
    }

    let goal = GoalStore::create(
        store,
        NewGoal {
            goal_type,
            target_value: target,
            period,
        },
    )
    .await?;

    println!(
        "✓ {} goal set to {} {}",
        goal.goal_type.label(),
        format_value(goal.target_value),
        goal.unit
    );
    Ok(())
}

async fn cmd_goal_list(app: &App) -> Result<()> {
    let goals = GoalStore::list(app.store.as_ref()).await?;
    if goals.is_empty() {
        println!("No goals yet.");
        return Ok(());
    }
    for goal in &goals {
        println!(
            "{} {:<16} {} {} ({:?}) {}",
            if goal.is_active { "●" } else { "○" },
            goal.goal_type.as_str(),
            format_value(goal.target_value),
            goal.unit,
            goal.period,
            goal.id
        );
    }
    Ok(())
}

async fn cmd_reminder_add_smart(
    app: &App,
    reminder_type: ReminderType,
    trigger: SmartTrigger,
    title: Option<String>,
) -> Result<()> {
    if reminder_type.goal_type().is_none() {
        eprintln!(
            "Note: {} reminders have no goal to measure and will never fire.",
            reminder_type
        );
    }
    let title = title.unwrap_or_else(|| {
        presets::preset_for(reminder_type)
            .map(|p| p.title.to_string())
            .unwrap_or_else(|| "Smart reminder".to_string())
    });

    let reminder = ReminderStore::create(
        app.store.as_ref(),
        NewReminder::smart(reminder_type, trigger, title),
    )
    .await?;

    println!(
        "✓ Added smart reminder '{}' ({} {})",
        reminder.title, reminder.reminder_type, trigger
    );
    Ok(())
}

async fn cmd_reminder_setup(
    app: &App,
    recommended: bool,
    pick: Vec<(ReminderType, SmartTrigger)>,
) -> Result<()> {
    let selection = if recommended {
        recommended_selection()
    } else {
        let mut selection = SmartSelection::default();
        for (kind, trigger) in pick {
            selection.select(kind, trigger);
        }
        selection
    };

    if selection.is_empty() {
        println!("Nothing selected. Pass --recommended or --pick TYPE=TRIGGER.");
        return Ok(());
    }

    // Unchanged picks keep their reminder and its last trigger date
    let current = SmartSelection::from_existing(&ReminderStore::list(app.store.as_ref()).await?);
    let selection = selection.changes_from(&current);
    if selection.is_empty() {
        println!("✓ Smart reminders already configured");
        return Ok(());
    }

    let created = apply_smart_setup(app.store.as_ref(), &selection).await?;
    println!("✓ Configured {} smart reminders", created.len());
    for reminder in &created {
        if let Some(trigger) = reminder.smart_trigger {
            println!("  → {} ({})", reminder.title, trigger);
        }
    }
    Ok(())
}

async fn cmd_reminder_list(app: &App) -> Result<()> {
    let reminders = ReminderStore::list(app.store.as_ref()).await?;
    if reminders.is_empty() {
        println!("No reminders yet.");
        return Ok(());
    }
    let clock = app.service.clock();
    for reminder in &reminders {
        let trigger = reminder
            .smart_trigger
            .map(|t| t.to_string())
            .or_else(|| reminder.time.clone())
            .unwrap_or_else(|| "-".to_string());
        let last = reminder
            .last_triggered
            .map(|at| clock.date_of(at).format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{} {:<8} {:<10} {} (last: {})",
            if reminder.is_active { "●" } else { "○" },
            reminder.reminder_type,
            trigger,
            reminder.title,
            last
        );
    }
    Ok(())
}

async fn cmd_history(app: &App, days: u32, export: Option<&Path>) -> Result<()> {
    let history = load_history(app.store.as_ref(), app.today(), days).await?;
    let goals = app.store.filter_active().await?;

    println!("\nLast {} days ({} with data)", days, history.len());
    for summary in summarize(&history, &goals) {
        display_summary(&summary);
    }

    if let Some(path) = export {
        let rows = export_csv(&history, path)?;
        println!("\n✓ Exported {} days to {}", rows, path.display());
    }
    Ok(())
}

fn display_summary(summary: &MetricSummary) {
    let unit = summary.metric.unit();
    print!(
        "  {:<10} total {} {}, avg {} {}",
        summary.metric.label(),
        format_value(summary.total),
        unit,
        format_value(summary.average),
        unit
    );
    if let Some((date, best)) = summary.best_day {
        print!(", best {} on {}", format_value(best), date.format("%a %d"));
    }
    if let Some(met) = summary.days_goal_met {
        print!(", goal met {} of {} days", met, summary.days_with_data);
    }
    println!();
}

fn cmd_notify_test(app: &App) -> Result<()> {
    match app.service.send_test_notification() {
        DispatchOutcome::Native => println!("Sent as a native notification."),
        DispatchOutcome::Toast => {
            println!("Shown as a toast. Run `nudge permission request` for native notifications.")
        }
        DispatchOutcome::FellBack => println!("Native notification failed, shown as a toast."),
    }
    Ok(())
}

async fn cmd_permission_request(app: &App) -> Result<()> {
    let granted = app.service.request_permission().await;

    let permission = app.service.permission();
    if permission != app.config.notifications.permission && app.service.is_supported() {
        let mut config = app.config.clone();
        config.notifications.permission = permission;
        config.save_to(&app.config_path)?;
    }

    if granted {
        println!("Notifications are enabled.");
    }
    Ok(())
}
