//! The progression engine - single owner of a user's progression session.

use std::collections::VecDeque;
use std::sync::Arc;
use jobquest_core::{
    AchievementDefinition, AchievementRecord, AchievementSummary, ProgressEvent, ProgressSnapshot,
    QuestBoard, QuestCadence, QuestInstance, QuestTemplate, UserId, UserStats, XpAction, XpGained,
};
use jobquest_storage::Storage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::achievements::AchievementEvaluator;
use crate::clock::{Clock, SystemClock};
use crate::error::{ProgressError, Result};
use crate::level::{LevelCalculator, LevelConfig};
use crate::notify::{NoopNotifier, Notifier};
use crate::quests::{QuestScheduler, DEFAULT_QUEST_SLOTS};
use crate::streak::{LoginCheck, StreakTracker};

/// Configuration for the progression engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Level curve
    pub level: LevelConfig,
    /// Active quests per cadence
    pub quest_slots: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            level: LevelConfig::default(),
            quest_slots: DEFAULT_QUEST_SLOTS,
        }
    }
}

/// Something the user did to their job applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationActivity {
    /// A new application was added
    Created,
    /// An application moved to another status
    StatusChanged,
    /// Notes were added to an application
    NotesAdded,
    /// An interview was scheduled
    InterviewScheduled,
    /// An interview took place
    InterviewCompleted,
}

impl ApplicationActivity {
    /// Quest progress tags this activity feeds.
    pub fn quest_tags(self) -> &'static [&'static str] {
        match self {
            ApplicationActivity::Created => &["applications_today", "applications_this_week"],
            ApplicationActivity::StatusChanged => {
                &["status_updates_today", "status_updates_this_week"]
            }
            ApplicationActivity::NotesAdded => &["notes_added_today"],
            ApplicationActivity::InterviewScheduled => {
                &["interviews_scheduled_today", "interviews_scheduled_this_week"]
            }
            ApplicationActivity::InterviewCompleted => &["interviews_completed_this_week"],
        }
    }

    fn bump_counter(self, stats: &mut UserStats) {
        match self {
            ApplicationActivity::Created => stats.total_applications += 1,
            ApplicationActivity::InterviewScheduled => stats.total_interviews += 1,
            ApplicationActivity::InterviewCompleted => stats.completed_interviews += 1,
            ApplicationActivity::StatusChanged | ApplicationActivity::NotesAdded => {}
        }
    }
}

/// Quest tags fed by a counted daily login.
const LOGIN_TAGS: &[&str] = &["logins_this_week", "logins_today"];

/// Everything one `award_xp` call did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AwardReport {
    /// The requested award, `None` if it resolved to zero XP
    pub award: Option<XpGained>,
    /// Achievements unlocked by the evaluation pass that followed
    pub unlocked: Vec<AchievementRecord>,
    /// Reward awards for those achievements, in unlock order
    pub rewards: Vec<XpGained>,
}

impl AwardReport {
    /// Total XP added, rewards included.
    pub fn xp_gained(&self) -> u64 {
        self.award.iter().chain(self.rewards.iter()).map(|g| g.amount).sum()
    }

    /// Whether any award in this report crossed a level boundary.
    pub fn leveled_up(&self) -> bool {
        self.award.iter().chain(self.rewards.iter()).any(|g| g.leveled_up)
    }
}

/// Result of a daily login check.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginReport {
    /// What happened to the streak
    pub check: LoginCheck,
    /// Streak and login awards, in order
    pub awards: Vec<AwardReport>,
    /// Quests completed by the login
    pub completed_quests: Vec<QuestInstance>,
    /// Cadences whose quests were regenerated
    pub regenerated: Vec<QuestCadence>,
}

/// Result of recording an application activity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityReport {
    /// Quests completed by the activity
    pub completed_quests: Vec<QuestInstance>,
    /// Achievements unlocked by the activity
    pub unlocked: Vec<AchievementRecord>,
    /// Reward awards for those achievements
    pub rewards: Vec<XpGained>,
}

/// Result of a successful quest claim.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestClaim {
    /// The claimed quest
    pub quest: QuestInstance,
    /// The reward award and anything it unlocked
    pub report: AwardReport,
}

/// In-memory state of the active user.
#[derive(Debug, Clone)]
struct Session {
    user: UserId,
    stats: UserStats,
    achievements: Vec<AchievementRecord>,
    quests: QuestBoard,
}

impl Session {
    fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            stats: self.stats.clone(),
            achievements: AchievementSummary::from_records(&self.achievements),
            quests: self.quests.clone(),
            level_progress: self.stats.level_progress(),
        }
    }
}

struct Inner<S> {
    storage: S,
    session: Option<Session>,
    rng: StdRng,
}

/// The progression engine.
///
/// One engine serves one user session at a time, between `initialize` and
/// `dispose`. Every operation holds a single lock for its whole
/// mutate-persist-notify sequence, so concurrent callers sharing the engine
/// through an `Arc` are serialized. Achievement rewards are applied from a
/// FIFO queue inside the same locked operation.
///
/// A failed write is returned as [`ProgressError::Persistence`] and is not
/// rolled back: memory is then ahead of storage.
pub struct ProgressionEngine<S: Storage> {
    inner: Mutex<Inner<S>>,
    levels: LevelCalculator,
    evaluator: AchievementEvaluator,
    scheduler: QuestScheduler,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl<S: Storage> ProgressionEngine<S> {
    /// Create an engine with the default catalogs, wall clock and no
    /// notification sink.
    pub fn new(storage: S) -> Self {
        let config = EngineConfig::default();
        Self {
            inner: Mutex::new(Inner {
                storage,
                session: None,
                rng: StdRng::from_entropy(),
            }),
            levels: LevelCalculator::new(config.level),
            evaluator: AchievementEvaluator::default(),
            scheduler: QuestScheduler::default().with_slots(config.quest_slots),
            notifier: Arc::new(NoopNotifier),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.levels = LevelCalculator::new(config.level);
        self.scheduler = self.scheduler.with_slots(config.quest_slots);
        self.config = config;
        self
    }

    /// Set the notification sink.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Set the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Make quest draws deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.inner.get_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace the achievement catalog.
    pub fn with_achievements(mut self, catalog: Vec<AchievementDefinition>) -> Self {
        self.evaluator = AchievementEvaluator::new(catalog);
        self
    }

    /// Replace the quest template pools.
    pub fn with_quest_templates(
        mut self,
        daily: Vec<QuestTemplate>,
        weekly: Vec<QuestTemplate>,
    ) -> Self {
        self.scheduler = QuestScheduler::new(daily, weekly).with_slots(self.config.quest_slots);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The level calculator in use.
    pub fn levels(&self) -> &LevelCalculator {
        &self.levels
    }

    /// Consume the engine and hand back its storage.
    pub fn into_storage(self) -> S {
        self.inner.into_inner().storage
    }

    /// Whether a session is active.
    pub async fn is_initialized(&self) -> bool {
        self.inner.lock().await.session.is_some()
    }

    // === Session lifecycle ===

    /// Start a session for `user`.
    ///
    /// Loads stats, achievements and quests, seeding whatever is missing,
    /// regenerates stale quests, counts today's login, and publishes
    /// `initialized`. Replaces any session that was already active.
    pub async fn initialize(&self, user: impl Into<UserId>) -> Result<ProgressSnapshot> {
        let user = user.into();
        let mut guard = self.inner.lock().await;
        let Inner { storage, session, rng } = &mut *guard;

        if let Some(previous) = session.take() {
            debug!("Replacing session of {}", previous.user);
        }

        let stats = match storage.load_stats(&user).await? {
            Some(stats) => stats,
            None => {
                let stats = self.fresh_stats(&user);
                storage.save_stats(&stats).await?;
                info!("Created progression state for {}", user);
                stats
            }
        };

        let achievements = match storage.load_achievements(&user).await? {
            Some(mut list) if !list.is_empty() => {
                if self.evaluator.reconcile(&mut list) {
                    storage.save_achievements(&user, &list).await?;
                }
                list
            }
            _ => {
                let list = self.evaluator.seed();
                storage.save_achievements(&user, &list).await?;
                list
            }
        };

        let mut quests = storage.load_quests(&user).await?.unwrap_or_default();
        let today = self.clock.today();
        if !self.scheduler.refresh(&mut quests, today, rng).is_empty() {
            storage.save_quests(&user, &quests).await?;
        }

        let mut active = Session {
            user,
            stats,
            achievements,
            quests,
        };
        self.daily_login(storage, &mut active, rng).await?;

        let snapshot = active.snapshot();
        info!(
            "Initialized progression for {} (level {}, {} XP)",
            active.user, active.stats.level, active.stats.total_xp
        );
        *session = Some(active);

        self.notifier.publish(ProgressEvent::Initialized {
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }

    /// End the session, returning its final state.
    pub async fn dispose(&self) -> Result<ProgressSnapshot> {
        let mut guard = self.inner.lock().await;
        let session = guard.session.take().ok_or(ProgressError::NotInitialized)?;
        info!("Disposed progression session of {}", session.user);
        Ok(session.snapshot())
    }

    /// Current state of the session.
    pub async fn snapshot(&self) -> Result<ProgressSnapshot> {
        let guard = self.inner.lock().await;
        guard
            .session
            .as_ref()
            .map(Session::snapshot)
            .ok_or(ProgressError::NotInitialized)
    }

    // === Operations ===

    /// Award XP for `action`.
    ///
    /// The amount is `explicit_amount` if given, else the action's catalog
    /// amount. A zero amount does nothing. The award is followed by one
    /// achievement evaluation pass whose rewards do not trigger another
    /// pass.
    pub async fn award_xp(
        &self,
        action: XpAction,
        explicit_amount: Option<u64>,
    ) -> Result<AwardReport> {
        let amount = explicit_amount.unwrap_or_else(|| action.base_xp());
        let mut guard = self.inner.lock().await;
        let Inner { storage, session, .. } = &mut *guard;
        let session = session.as_mut().ok_or(ProgressError::NotInitialized)?;

        self.award(storage, session, action, amount).await
    }

    /// Count today's login if it has not been counted yet.
    ///
    /// Also rotates quests when the calendar moved on since they were drawn.
    pub async fn check_daily_login(&self) -> Result<LoginReport> {
        let mut guard = self.inner.lock().await;
        let Inner { storage, session, rng } = &mut *guard;
        let session = session.as_mut().ok_or(ProgressError::NotInitialized)?;

        self.daily_login(storage, session, rng).await
    }

    /// Feed `increment` units to every open quest listening to `tag`.
    ///
    /// Returns the quests this update completed.
    pub async fn update_quest_progress(
        &self,
        tag: &str,
        increment: u32,
    ) -> Result<Vec<QuestInstance>> {
        let mut guard = self.inner.lock().await;
        let Inner { storage, session, .. } = &mut *guard;
        let session = session.as_mut().ok_or(ProgressError::NotInitialized)?;

        self.progress_quests(storage, session, &[tag], increment).await
    }

    /// Claim the reward of a completed quest.
    pub async fn claim_quest_reward(&self, quest_id: &str) -> Result<QuestClaim> {
        let mut guard = self.inner.lock().await;
        let Inner { storage, session, .. } = &mut *guard;
        let session = session.as_mut().ok_or(ProgressError::NotInitialized)?;

        let quest = QuestScheduler::claim(&mut session.quests, quest_id).map_err(|reason| {
            ProgressError::QuestClaim {
                quest_id: quest_id.to_string(),
                reason,
            }
        })?;

        let action = match quest.cadence {
            QuestCadence::Daily => XpAction::QuestDailyCompleted,
            QuestCadence::Weekly => XpAction::QuestWeeklyCompleted,
        };
        info!("{} claimed {} quest {}", session.user, quest.cadence, quest.id);
        let report = self.award(storage, session, action, quest.xp_reward).await?;

        // Counted after the award; its evaluation pass sees the previous count
        session.stats.quests_completed += 1;
        persist_stats(storage, &session.stats).await?;
        persist_quests(storage, &session.user, &session.quests).await?;

        Ok(QuestClaim { quest, report })
    }

    /// Record an application activity: bump its counter, feed its quest
    /// tags, and run one achievement evaluation pass.
    ///
    /// No action XP is awarded here; callers award e.g.
    /// [`XpAction::ApplicationCreated`] separately.
    pub async fn record_application_activity(
        &self,
        activity: ApplicationActivity,
    ) -> Result<ActivityReport> {
        let mut guard = self.inner.lock().await;
        let Inner { storage, session, .. } = &mut *guard;
        let session = session.as_mut().ok_or(ProgressError::NotInitialized)?;

        activity.bump_counter(&mut session.stats);
        let completed_quests = self
            .progress_quests(storage, session, activity.quest_tags(), 1)
            .await?;
        persist_stats(storage, &session.stats).await?;

        let (unlocked, rewards) = self.evaluation_pass(storage, session).await?;
        Ok(ActivityReport {
            completed_quests,
            unlocked,
            rewards,
        })
    }

    // === Internals ===

    fn fresh_stats(&self, user: &UserId) -> UserStats {
        UserStats::new(user.clone(), self.levels.xp_for_level(1), self.levels.title_for(1))
    }

    /// Apply one award, persist, notify, then evaluate achievements once.
    async fn award(
        &self,
        storage: &mut S,
        session: &mut Session,
        action: XpAction,
        amount: u64,
    ) -> Result<AwardReport> {
        if amount == 0 {
            return Ok(AwardReport::default());
        }

        let award = self.apply_award(storage, session, action, amount).await?;
        let (unlocked, rewards) = self.evaluation_pass(storage, session).await?;

        Ok(AwardReport {
            award: Some(award),
            unlocked,
            rewards,
        })
    }

    /// Add XP, persist stats in one write, publish `xp_gained`.
    async fn apply_award(
        &self,
        storage: &mut S,
        session: &mut Session,
        action: XpAction,
        amount: u64,
    ) -> Result<XpGained> {
        let gained = self.levels.apply_xp(&mut session.stats, action, amount);
        if gained.leveled_up {
            info!(
                "{} reached level {} ({})",
                session.user, gained.level, gained.title
            );
        } else {
            debug!("{} +{} XP for {}", session.user, amount, action);
        }

        persist_stats(storage, &session.stats).await?;
        self.notifier.publish(ProgressEvent::XpGained(gained.clone()));
        Ok(gained)
    }

    /// Unlock every achievement whose condition now holds and pay out their
    /// rewards in unlock order.
    ///
    /// Reward awards go through a FIFO queue and never start another pass,
    /// so an achievement that only becomes reachable through reward XP
    /// waits for the next award.
    async fn evaluation_pass(
        &self,
        storage: &mut S,
        session: &mut Session,
    ) -> Result<(Vec<AchievementRecord>, Vec<XpGained>)> {
        let unlocked =
            self.evaluator
                .evaluate(&session.stats, &mut session.achievements, self.clock.now());
        if unlocked.is_empty() {
            return Ok((unlocked, Vec::new()));
        }

        let mut pending: VecDeque<(XpAction, u64)> = VecDeque::with_capacity(unlocked.len());
        for achievement in &unlocked {
            info!("{} unlocked achievement {}", session.user, achievement.id);
            session.stats.achievements_unlocked += 1;
            pending.push_back((XpAction::AchievementUnlocked, achievement.xp_reward));
        }

        let mut rewards = Vec::with_capacity(pending.len());
        while let Some((action, amount)) = pending.pop_front() {
            if amount == 0 {
                continue;
            }
            rewards.push(self.apply_award(storage, session, action, amount).await?);
        }

        storage
            .save_achievements(&session.user, &session.achievements)
            .await
            .map_err(|e| {
                warn!("Failed to persist achievements for {}: {}", session.user, e);
                e
            })?;
        self.notifier.publish(ProgressEvent::AchievementsUnlocked {
            achievements: unlocked.clone(),
        });

        Ok((unlocked, rewards))
    }

    async fn daily_login(
        &self,
        storage: &mut S,
        session: &mut Session,
        rng: &mut StdRng,
    ) -> Result<LoginReport> {
        let today = self.clock.today();

        let regenerated = self.scheduler.refresh(&mut session.quests, today, rng);
        if !regenerated.is_empty() {
            persist_quests(storage, &session.user, &session.quests).await?;
        }

        let check = StreakTracker::check_in(&mut session.stats, today);
        let mut awards = Vec::new();
        match check {
            LoginCheck::AlreadyCounted => {
                return Ok(LoginReport {
                    check,
                    awards,
                    completed_quests: Vec::new(),
                    regenerated,
                });
            }
            LoginCheck::Continued { streak } => {
                info!("{} kept a {}-day streak", session.user, streak);
                let amount = XpAction::StreakMaintained.base_xp();
                awards.push(
                    self.award(storage, session, XpAction::StreakMaintained, amount)
                        .await?,
                );
            }
            LoginCheck::Restarted => {
                debug!("{} started a new streak", session.user);
            }
        }

        // The streak change and login date are persisted by this award
        awards.push(
            self.award(storage, session, XpAction::DailyLogin, XpAction::DailyLogin.base_xp())
                .await?,
        );

        let completed_quests = self.progress_quests(storage, session, LOGIN_TAGS, 1).await?;
        Ok(LoginReport {
            check,
            awards,
            completed_quests,
            regenerated,
        })
    }

    /// Feed tags to the quest board; persist if anything moved and publish
    /// one `quests_completed` for the whole batch.
    async fn progress_quests(
        &self,
        storage: &mut S,
        session: &mut Session,
        tags: &[&str],
        increment: u32,
    ) -> Result<Vec<QuestInstance>> {
        let progress = QuestScheduler::update_many(&mut session.quests, tags, increment);
        if progress.advanced == 0 {
            return Ok(progress.completed);
        }

        persist_quests(storage, &session.user, &session.quests).await?;
        if !progress.completed.is_empty() {
            for quest in &progress.completed {
                info!("{} completed {} quest {}", session.user, quest.cadence, quest.id);
            }
            self.notifier.publish(ProgressEvent::QuestsCompleted {
                quests: progress.completed.clone(),
            });
        }
        Ok(progress.completed)
    }
}

async fn persist_stats<S: Storage>(storage: &mut S, stats: &UserStats) -> Result<()> {
    storage.save_stats(stats).await.map_err(|e| {
        warn!("Failed to persist stats for {}: {}", stats.user_id, e);
        ProgressError::from(e)
    })
}

async fn persist_quests<S: Storage>(
    storage: &mut S,
    user: &UserId,
    quests: &QuestBoard,
) -> Result<()> {
    storage.save_quests(user, quests).await.map_err(|e| {
        warn!("Failed to persist quests for {}: {}", user, e);
        ProgressError::from(e)
    })
}
