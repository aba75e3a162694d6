use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    CoreResult, InfiniteRunEndedEvent, LevelCompletedEvent, ProgressStore,
    timestamp_now,
};
use nebula_types::{Achievement, PlayerAchievements, PlayerProgress};

/// Immutable template of a catalog achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub target: i32,
}

impl AchievementDefinition {
    /// Locked per-player instance of this definition.
    pub fn instantiate(&self) -> Achievement {
        Achievement {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            unlocked: false,
            progress: 0,
            target: self.target,
            unlocked_at: None,
        }
    }
}

/// Every achievement a player can earn, in display order.
pub const ACHIEVEMENT_CATALOG: [AchievementDefinition; 12] = [
    AchievementDefinition {
        id: "first-steps",
        name: "First Steps",
        description: "Complete your first level",
        icon: "🌟",
        target: 1,
    },
    AchievementDefinition {
        id: "rising-star",
        name: "Rising Star",
        description: "Complete 5 levels",
        icon: "⭐",
        target: 5,
    },
    AchievementDefinition {
        id: "cosmic-explorer",
        name: "Cosmic Explorer",
        description: "Complete 10 levels",
        icon: "🚀",
        target: 10,
    },
    AchievementDefinition {
        id: "nebula-master",
        name: "Nebula Master",
        description: "Complete 25 levels",
        icon: "🌌",
        target: 25,
    },
    AchievementDefinition {
        id: "transcendent",
        name: "Transcendent",
        description: "Complete all 50 levels",
        icon: "✨",
        target: 50,
    },
    AchievementDefinition {
        id: "perfect-shot",
        name: "Perfect Shot",
        description: "Complete a level with 3 stars",
        icon: "🎯",
        target: 1,
    },
    AchievementDefinition {
        id: "star-collector",
        name: "Star Collector",
        description: "Earn 50 stars total",
        icon: "⭐",
        target: 50,
    },
    AchievementDefinition {
        id: "cosmic-perfectionist",
        name: "Cosmic Perfectionist",
        description: "Earn 100 stars total",
        icon: "💫",
        target: 100,
    },
    AchievementDefinition {
        id: "high-scorer",
        name: "High Scorer",
        description: "Score 50,000 points in a single level",
        icon: "💯",
        target: 50000,
    },
    AchievementDefinition {
        id: "infinite-warrior",
        name: "Infinite Warrior",
        description: "Reach wave 10 in Infinite mode",
        icon: "⚔️",
        target: 10,
    },
    AchievementDefinition {
        id: "endless-champion",
        name: "Endless Champion",
        description: "Score 100,000 points in Infinite mode",
        icon: "🏆",
        target: 100000,
    },
    // No rule feeds this one: nothing reports popped bubbles to the service.
    AchievementDefinition {
        id: "bubble-destroyer",
        name: "Bubble Destroyer",
        description: "Pop 1000 bubbles total",
        icon: "💥",
        target: 1000,
    },
];

/// Facts a level-completion rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct LevelContext {
    pub completed_levels: i32,
    pub total_stars: i32,
    pub event: LevelCompletedEvent,
}

impl LevelContext {
    pub fn new(progress: &PlayerProgress, event: &LevelCompletedEvent) -> Self {
        Self {
            completed_levels: progress.completed_levels() as i32,
            total_stars: progress.total_stars,
            event: *event,
        }
    }
}

/// A rule yields the measured quantity when its condition holds.
pub type Rule<C> = fn(&C) -> Option<i32>;

pub const LEVEL_RULES: [(&str, Rule<LevelContext>); 9] = [
    ("first-steps", |ctx| at_least(ctx.completed_levels, 1)),
    ("rising-star", |ctx| at_least(ctx.completed_levels, 5)),
    ("cosmic-explorer", |ctx| at_least(ctx.completed_levels, 10)),
    ("nebula-master", |ctx| at_least(ctx.completed_levels, 25)),
    ("transcendent", |ctx| at_least(ctx.completed_levels, 50)),
    ("perfect-shot", |ctx| (ctx.event.stars == 3).then_some(1)),
    ("star-collector", |ctx| at_least(ctx.total_stars, 50)),
    ("cosmic-perfectionist", |ctx| at_least(ctx.total_stars, 100)),
    ("high-scorer", |ctx| at_least(ctx.event.score, 50000)),
];

pub const INFINITE_RULES: [(&str, Rule<InfiniteRunEndedEvent>); 2] = [
    ("infinite-warrior", |run| at_least(run.wave, 10)),
    ("endless-champion", |run| at_least(run.score, 100000)),
];

fn at_least(measured: i32, threshold: i32) -> Option<i32> {
    (measured >= threshold).then_some(measured)
}

/// Fresh record with every catalog achievement locked.
pub fn seed_achievements(player_id: &str) -> PlayerAchievements {
    PlayerAchievements {
        player_id: player_id.to_string(),
        achievements: ACHIEVEMENT_CATALOG
            .iter()
            .map(AchievementDefinition::instantiate)
            .collect(),
        updated_at: timestamp_now(),
    }
}

/// Rebuild a stored record in catalog order, keeping existing entries and
/// adding locked ones for any the record lacks. Ids the catalog no longer
/// knows stay at the end. Returns whether the record changed.
pub fn reconcile_with_catalog(record: &mut PlayerAchievements) -> bool {
    let before: Vec<String> = record.achievements.iter().map(|a| a.id.clone()).collect();
    let mut stored = std::mem::take(&mut record.achievements);

    let mut ordered = Vec::with_capacity(ACHIEVEMENT_CATALOG.len());
    for definition in &ACHIEVEMENT_CATALOG {
        match stored.iter().position(|a| a.id == definition.id) {
            Some(index) => ordered.push(stored.remove(index)),
            None => ordered.push(definition.instantiate()),
        }
    }
    ordered.extend(stored);

    record.achievements = ordered;
    !record.achievements.iter().map(|a| &a.id).eq(before.iter())
}

/// Run `rules` over every still-locked achievement, in record order, and
/// unlock those whose rule holds. Returns the newly unlocked achievements.
///
/// Records from [`AchievementEngine::get_or_create`] are in catalog order.
pub fn unlock_matching<C>(
    record: &mut PlayerAchievements,
    rules: &[(&str, Rule<C>)],
    context: &C,
    now: &str,
) -> Vec<Achievement> {
    let mut unlocked = Vec::new();

    for achievement in record.achievements.iter_mut() {
        if achievement.unlocked {
            continue;
        }

        let Some((_, rule)) = rules.iter().find(|(id, _)| *id == achievement.id) else {
            continue;
        };

        if let Some(measured) = rule(context) {
            achievement.unlocked = true;
            achievement.progress = measured;
            achievement.unlocked_at = Some(now.to_string());
            unlocked.push(achievement.clone());
        }
    }

    unlocked
}

/// Owns every mutation of [`PlayerAchievements`] records. Reads progress, never writes it.
pub struct AchievementEngine {
    store: Arc<dyn ProgressStore>,
}

impl AchievementEngine {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Load the player's achievements, seeding the full catalog on first access.
    ///
    /// Not a pure read: a missing or outdated record is written back.
    pub async fn get_or_create(&self, player_id: &str) -> CoreResult<PlayerAchievements> {
        match self.store.get_achievements(player_id).await? {
            Some(mut record) => {
                if reconcile_with_catalog(&mut record) {
                    debug!("Reconciled achievements for player {} with catalog", player_id);
                    record = self.store.upsert_achievements(player_id, record).await?;
                }
                Ok(record)
            }
            None => {
                let record = seed_achievements(player_id);
                Ok(self.store.upsert_achievements(player_id, record).await?)
            }
        }
    }

    pub async fn evaluate_level_event(
        &self,
        player_id: &str,
        progress: &PlayerProgress,
        event: &LevelCompletedEvent,
    ) -> CoreResult<Vec<Achievement>> {
        let context = LevelContext::new(progress, event);
        self.evaluate_rules(player_id, &LEVEL_RULES, &context).await
    }

    pub async fn evaluate_infinite_event(
        &self,
        player_id: &str,
        event: &InfiniteRunEndedEvent,
    ) -> CoreResult<Vec<Achievement>> {
        self.evaluate_rules(player_id, &INFINITE_RULES, event).await
    }

    async fn evaluate_rules<C>(
        &self,
        player_id: &str,
        rules: &[(&str, Rule<C>)],
        context: &C,
    ) -> CoreResult<Vec<Achievement>>
    where
        C: Sync,
    {
        let mut record = self.get_or_create(player_id).await?;
        let unlocked = unlock_matching(&mut record, rules, context, &timestamp_now());

        if !unlocked.is_empty() {
            let ids: Vec<&str> = unlocked.iter().map(|a| a.id.as_str()).collect();
            info!("Player {} unlocked achievements: {}", player_id, ids.join(", "));
            self.store.upsert_achievements(player_id, record).await?;
        }

        Ok(unlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProgressEngine, apply_level_completion};

    const NOW: &str = "2025-03-01T12:00:00+00:00";
    const LATER: &str = "2025-03-02T12:00:00+00:00";

    fn level_event(level_id: i32, score: i32, stars: i32) -> LevelCompletedEvent {
        LevelCompletedEvent {
            level_id,
            score,
            stars,
            shots: 0,
        }
    }

    fn ids(achievements: &[Achievement]) -> Vec<&str> {
        achievements.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_catalog_ids_are_unique_and_ordered() {
        let catalog_ids: Vec<&str> = ACHIEVEMENT_CATALOG.iter().map(|d| d.id).collect();
        assert_eq!(
            catalog_ids,
            vec![
                "first-steps",
                "rising-star",
                "cosmic-explorer",
                "nebula-master",
                "transcendent",
                "perfect-shot",
                "star-collector",
                "cosmic-perfectionist",
                "high-scorer",
                "infinite-warrior",
                "endless-champion",
                "bubble-destroyer",
            ]
        );
    }

    #[test]
    fn test_every_rule_targets_a_catalog_entry() {
        let rule_ids = LEVEL_RULES
            .iter()
            .map(|(id, _)| *id)
            .chain(INFINITE_RULES.iter().map(|(id, _)| *id));

        for id in rule_ids {
            assert!(ACHIEVEMENT_CATALOG.iter().any(|d| d.id == id), "{id}");
        }
    }

    #[test]
    fn test_bubble_destroyer_has_no_rule() {
        assert!(!LEVEL_RULES.iter().any(|(id, _)| *id == "bubble-destroyer"));
        assert!(!INFINITE_RULES.iter().any(|(id, _)| *id == "bubble-destroyer"));
    }

    #[test]
    fn test_seed_is_fully_locked() {
        let record = seed_achievements("player");

        assert_eq!(record.achievements.len(), ACHIEVEMENT_CATALOG.len());
        assert_eq!(record.unlocked_count(), 0);
        assert!(record.achievements.iter().all(|a| a.progress == 0));
    }

    #[test]
    fn test_first_completion_unlocks_first_steps_once() {
        let mut progress = ProgressEngine::new_progress("player");
        let event = level_event(1, 1000, 2);
        apply_level_completion(&mut progress, &event, NOW);
        let mut record = seed_achievements("player");

        let context = LevelContext::new(&progress, &event);
        let first = unlock_matching(&mut record, &LEVEL_RULES, &context, NOW);
        assert_eq!(ids(&first), vec!["first-steps"]);

        let second = unlock_matching(&mut record, &LEVEL_RULES, &context, LATER);
        assert!(second.is_empty());

        let first_steps = record.get("first-steps").unwrap();
        assert!(first_steps.unlocked);
        assert_eq!(first_steps.progress, 1);
        assert_eq!(first_steps.unlocked_at.as_deref(), Some(NOW));
    }

    #[test]
    fn test_perfect_shot_needs_three_stars_on_the_event() {
        let mut progress = ProgressEngine::new_progress("player");
        // Plenty of cumulative stars, but this event only earned two.
        progress.total_stars = 60;
        let mut record = seed_achievements("player");

        let context = LevelContext::new(&progress, &level_event(1, 10, 2));
        let unlocked = unlock_matching(&mut record, &LEVEL_RULES, &context, NOW);
        assert!(!ids(&unlocked).contains(&"perfect-shot"));
        assert!(ids(&unlocked).contains(&"star-collector"));

        let context = LevelContext::new(&progress, &level_event(1, 10, 3));
        let unlocked = unlock_matching(&mut record, &LEVEL_RULES, &context, NOW);
        assert_eq!(ids(&unlocked), vec!["perfect-shot"]);
        assert_eq!(record.get("perfect-shot").unwrap().progress, 1);
    }

    #[test]
    fn test_high_scorer_records_event_score() {
        let progress = ProgressEngine::new_progress("player");
        let mut record = seed_achievements("player");

        let context = LevelContext::new(&progress, &level_event(1, 64000, 1));
        let unlocked = unlock_matching(&mut record, &LEVEL_RULES, &context, NOW);

        assert_eq!(ids(&unlocked), vec!["high-scorer"]);
        assert_eq!(unlocked[0].progress, 64000);
    }

    #[test]
    fn test_infinite_rules_unlock_in_catalog_order() {
        let mut record = seed_achievements("player");
        let run = InfiniteRunEndedEvent {
            score: 150000,
            wave: 12,
        };

        let unlocked = unlock_matching(&mut record, &INFINITE_RULES, &run, NOW);

        assert_eq!(ids(&unlocked), vec!["infinite-warrior", "endless-champion"]);
        assert_eq!(unlocked[0].progress, 12);
        assert_eq!(unlocked[1].progress, 150000);
    }

    #[test]
    fn test_reconcile_restores_missing_entries() {
        let mut record = seed_achievements("player");
        record.achievements.retain(|a| a.id != "endless-champion");

        assert!(reconcile_with_catalog(&mut record));
        assert!(record.get("endless-champion").is_some());
        assert!(!reconcile_with_catalog(&mut record));
    }

    #[test]
    fn test_reconcile_restores_catalog_order() {
        let mut record = seed_achievements("player");
        record.achievements[0].unlocked = true;
        record.achievements[0].progress = 1;
        record.achievements.retain(|a| a.id != "perfect-shot");

        assert!(reconcile_with_catalog(&mut record));

        let catalog_ids: Vec<&str> = ACHIEVEMENT_CATALOG.iter().map(|d| d.id).collect();
        assert_eq!(ids(&record.achievements), catalog_ids);
        assert!(record.get("first-steps").unwrap().unlocked);
        assert!(!record.get("perfect-shot").unwrap().unlocked);

        let progress = ProgressEngine::new_progress("player");
        let context = LevelContext::new(&progress, &level_event(1, 60000, 3));
        let unlocked = unlock_matching(&mut record, &LEVEL_RULES, &context, NOW);
        assert_eq!(ids(&unlocked), vec!["perfect-shot", "high-scorer"]);
    }

    #[test]
    fn test_reconcile_keeps_unknown_ids_last() {
        let mut record = seed_achievements("player");
        let mut retired = record.achievements[0].clone();
        retired.id = "retired".to_string();
        record.achievements.insert(0, retired);

        assert!(reconcile_with_catalog(&mut record));
        assert_eq!(record.achievements.len(), ACHIEVEMENT_CATALOG.len() + 1);
        assert_eq!(record.achievements.last().unwrap().id, "retired");
    }
}
