//! Text shown on the heads-up display.

use std::{fmt::Write as _, time::Duration};

use vr_survival_core::DifficultyTier;

/// Fraction of the Enhanced threshold after which a lost round counts as close.
const SO_CLOSE_FRACTION: f32 = 0.8;

fn whole_seconds(elapsed: Duration) -> u64 {
    elapsed.as_secs()
}

/// Health, round time and, once escalated, the difficulty tier.
pub(crate) fn info_text(health: i32, elapsed: Duration, tier: DifficultyTier) -> String {
    let mut text = format!("Health: {health}\nTime: {}", whole_seconds(elapsed));
    match tier {
        DifficultyTier::Normal => {}
        DifficultyTier::Enhanced => text.push_str("\nDifficulty: Enhanced"),
        DifficultyTier::Extreme => text.push_str("\nDifficulty: EXTREME!"),
    }
    text
}

/// Summary shown once the player has died.
pub(crate) fn game_over_text(
    elapsed: Duration,
    tier: DifficultyTier,
    enhanced_after: Duration,
) -> String {
    let mut text = String::from("Game Over!");
    let _ = write!(
        text,
        "\nYou survived for {} seconds!",
        whole_seconds(elapsed)
    );
    match tier {
        DifficultyTier::Extreme => text.push_str("\nYou reached EXTREME difficulty!"),
        DifficultyTier::Enhanced => text.push_str("\nYou reached Enhanced difficulty!"),
        DifficultyTier::Normal => {
            if elapsed.as_secs_f32() >= enhanced_after.as_secs_f32() * SO_CLOSE_FRACTION {
                text.push_str("\nSo close to Enhanced difficulty!");
            }
        }
    }
    text.push_str("\nPress 'R' to restart.");
    text
}

/// Active notification, otherwise the ammo readout.
pub(crate) fn ammo_text(notification: Option<&str>, ammo_label: String) -> String {
    notification.map_or(ammo_label, str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_text_names_escalated_tiers_only() {
        assert_eq!(
            info_text(100, Duration::from_millis(12_900), DifficultyTier::Normal),
            "Health: 100\nTime: 12"
        );
        assert_eq!(
            info_text(64, Duration::from_secs(61), DifficultyTier::Enhanced),
            "Health: 64\nTime: 61\nDifficulty: Enhanced"
        );
        assert_eq!(
            info_text(7, Duration::from_secs(80), DifficultyTier::Extreme),
            "Health: 7\nTime: 80\nDifficulty: EXTREME!"
        );
    }

    #[test]
    fn game_over_text_encourages_near_misses() {
        let threshold = Duration::from_secs(60);
        assert_eq!(
            game_over_text(Duration::from_millis(48_500), DifficultyTier::Normal, threshold),
            "Game Over!\nYou survived for 48 seconds!\nSo close to Enhanced difficulty!\nPress 'R' to restart."
        );
        assert_eq!(
            game_over_text(Duration::from_secs(30), DifficultyTier::Normal, threshold),
            "Game Over!\nYou survived for 30 seconds!\nPress 'R' to restart."
        );
        assert_eq!(
            game_over_text(Duration::from_secs(77), DifficultyTier::Extreme, threshold),
            "Game Over!\nYou survived for 77 seconds!\nYou reached EXTREME difficulty!\nPress 'R' to restart."
        );
    }

    #[test]
    fn notification_replaces_ammo_label() {
        assert_eq!(ammo_text(None, "Ammo: 3 / 10".to_owned()), "Ammo: 3 / 10");
        assert_eq!(
            ammo_text(Some("PERK: AMMO INCREASED TO 20!"), "Ammo: 20 / 20".to_owned()),
            "PERK: AMMO INCREASED TO 20!"
        );
    }
}
