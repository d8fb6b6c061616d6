//! JobQuest CLI - progression for a job-application tracker.

use std::path::PathBuf;
use std::time::Duration;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use jobquest_core::{ProgressSnapshot, XpAction};
use jobquest_progress::{
    ApplicationActivity, AwardReport, BroadcastNotifier, LoginCheck, ProgressionEngine,
};
use jobquest_storage::JsonStorage;

#[derive(Parser)]
#[command(name = "jobquest")]
#[command(about = "Track levels, streaks and quests for your job search", long_about = None)]
struct Cli {
    /// Directory holding progression data
    #[arg(long, default_value = ".jobquest")]
    data_dir: PathBuf,
    /// User to act as
    #[arg(long, default_value = "default")]
    user: String,
    /// Timeout for each storage operation, in milliseconds
    #[arg(long, default_value = "5000")]
    storage_timeout_ms: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, streak, achievements and quests
    Status,
    /// Show today's login streak
    ///
    /// Every command already counts today's login when it starts, so this
    /// re-check only reports what that login did.
    Login,
    /// Award XP for an action
    Award {
        /// Action name, e.g. application_created
        action: XpAction,
        /// Override the catalog amount
        #[arg(long)]
        amount: Option<u64>,
    },
    /// Record something done to an application
    Activity {
        /// What happened
        #[arg(value_enum)]
        kind: ActivityKind,
    },
    /// Feed progress to quests listening to a tag
    QuestProgress {
        /// Progress tag, e.g. applications_today
        tag: String,
        /// Units of progress
        #[arg(long, default_value = "1")]
        by: u32,
    },
    /// Claim the reward of a completed quest
    Claim {
        /// Quest ID
        quest_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ActivityKind {
    Created,
    StatusChanged,
    NotesAdded,
    InterviewScheduled,
    InterviewCompleted,
}

impl From<ActivityKind> for ApplicationActivity {
    fn from(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Created => ApplicationActivity::Created,
            ActivityKind::StatusChanged => ApplicationActivity::StatusChanged,
            ActivityKind::NotesAdded => ApplicationActivity::NotesAdded,
            ActivityKind::InterviewScheduled => ApplicationActivity::InterviewScheduled,
            ActivityKind::InterviewCompleted => ApplicationActivity::InterviewCompleted,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Open storage
    let storage = JsonStorage::new(&cli.data_dir)
        .await?
        .with_timeout(Duration::from_millis(cli.storage_timeout_ms));

    let notifier = BroadcastNotifier::default();
    let mut events = notifier.subscribe();
    let engine = ProgressionEngine::new(storage).with_notifier(notifier);

    // Initializing also counts today's login
    let snapshot = engine.initialize(cli.user.as_str()).await?;

    match cli.command {
        Commands::Status => print_status(&snapshot),
        Commands::Login => {
            let report = engine.check_daily_login().await?;
            match report.check {
                LoginCheck::AlreadyCounted => println!(
                    "Logged in today, streak {} days (longest {})",
                    snapshot.stats.current_streak, snapshot.stats.longest_streak
                ),
                LoginCheck::Continued { streak } => println!("Streak continued: {} days", streak),
                LoginCheck::Restarted => println!("New streak started"),
            }
            for award in &report.awards {
                print_award(award);
            }
        }
        Commands::Award { action, amount } => {
            let report = engine.award_xp(action, amount).await?;
            if report.award.is_none() {
                println!("Nothing awarded");
            }
            print_award(&report);
        }
        Commands::Activity { kind } => {
            let report = engine.record_application_activity(kind.into()).await?;
            for quest in &report.completed_quests {
                println!("Quest completed: {} ({} XP to claim)", quest.name, quest.xp_reward);
            }
            for achievement in &report.unlocked {
                println!("Achievement unlocked: {} {}", achievement.icon, achievement.name);
            }
        }
        Commands::QuestProgress { tag, by } => {
            let completed = engine.update_quest_progress(&tag, by).await?;
            if completed.is_empty() {
                println!("No quest completed");
            }
            for quest in completed {
                println!("Quest completed: {} ({} XP to claim)", quest.name, quest.xp_reward);
            }
        }
        Commands::Claim { quest_id } => {
            let claim = engine.claim_quest_reward(&quest_id).await?;
            println!("Claimed {}", claim.quest.name);
            print_award(&claim.report);
        }
    }

    let last = engine.dispose().await?;
    info!(
        "Saved progression for {} (level {}, {} XP)",
        last.stats.user_id, last.stats.level, last.stats.total_xp
    );

    while let Ok(event) = events.try_recv() {
        info!(event = event.name(), "{}", serde_json::to_string(&event)?);
    }

    Ok(())
}

fn print_award(report: &AwardReport) {
    if let Some(award) = &report.award {
        println!("+{} XP ({})", award.amount, award.action);
    }
    for (achievement, reward) in report.unlocked.iter().zip(&report.rewards) {
        println!(
            "Achievement unlocked: {} {} (+{} XP)",
            achievement.icon, achievement.name, reward.amount
        );
    }
    if let Some(last) = report.award.iter().chain(&report.rewards).last() {
        if report.leveled_up() {
            println!("Level up! Now level {} - {}", last.level, last.title);
        }
    }
}

fn print_status(snapshot: &ProgressSnapshot) {
    let stats = &snapshot.stats;
    let progress = &snapshot.level_progress;

    println!("JobQuest Status for {}", stats.user_id);
    println!("  Level {} - {}", stats.level, stats.title);
    println!(
        "  XP: {}/{} ({:.0}%), {} total",
        progress.current, progress.required, progress.percentage, stats.total_xp
    );
    println!(
        "  Streak: {} days (longest {})",
        stats.current_streak, stats.longest_streak
    );
    println!(
        "  Applications: {}, interviews: {} ({} completed)",
        stats.total_applications, stats.total_interviews, stats.completed_interviews
    );
    println!(
        "  Achievements: {}/{}",
        snapshot.achievements.unlocked, snapshot.achievements.total
    );

    let boards = [("Daily", &snapshot.quests.daily), ("Weekly", &snapshot.quests.weekly)];
    for (label, quests) in boards {
        println!("{} quests", label);
        for quest in quests.iter() {
            let state = if quest.claimed_reward {
                "CLAIMED"
            } else if quest.completed {
                "DONE"
            } else {
                "OPEN"
            };
            println!(
                "  {} | {} | {}/{} | {} XP - {}",
                quest.id, state, quest.progress, quest.target, quest.xp_reward, quest.name
            );
        }
    }
}
