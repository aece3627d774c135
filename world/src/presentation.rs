//! Presentation state that fades or expires on a timer.

use std::time::Duration;

use glam::Vec3;
use vr_survival_core::{Rgba, TaskQueue};

const MARKER_IDLE: Rgba = Rgba::new(1.0, 1.0, 0.0, 0.7);
const MARKER_ARMED: Rgba = Rgba::new(0.0, 1.0, 0.0, 0.7);

/// Work the world performs once a scheduled delay elapses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Deferred {
    /// Moves the player to the armed teleport destination.
    CompleteTeleport { destination: Vec3 },
    /// Removes the screen flash started with the matching generation.
    ClearFlash { generation: u64 },
    /// Removes the notification shown with the matching generation.
    ClearNotification { generation: u64 },
    /// Silences the background music after its fade.
    StopMusic,
}

#[derive(Clone, Copy, Debug)]
struct Flash {
    color: Rgba,
    generation: u64,
}

#[derive(Clone, Debug)]
struct Notification {
    text: String,
    generation: u64,
}

/// Teleport destination marker.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Marker {
    pub(crate) visible: bool,
    pub(crate) position: Vec3,
    pub(crate) normal: Vec3,
    pub(crate) pending: bool,
}

impl Marker {
    pub(crate) fn color(&self) -> Rgba {
        if self.pending {
            MARKER_ARMED
        } else {
            MARKER_IDLE
        }
    }
}

/// Overlays, marker and music owned by the world.
#[derive(Debug)]
pub(crate) struct Presentation {
    /// Tasks that only advance while gameplay time flows.
    pub(crate) scaled: TaskQueue<Deferred>,
    /// Tasks that keep advancing after the round froze.
    pub(crate) unscaled: TaskQueue<Deferred>,
    pub(crate) marker: Marker,
    flash: Option<Flash>,
    notification: Option<Notification>,
    generation: u64,
    music_volume: f32,
    music_playing: bool,
}

impl Presentation {
    pub(crate) fn new(music_volume: f32) -> Self {
        Self {
            scaled: TaskQueue::new(),
            unscaled: TaskQueue::new(),
            marker: Marker {
                visible: false,
                position: Vec3::ZERO,
                normal: Vec3::Y,
                pending: false,
            },
            flash: None,
            notification: None,
            generation: 0,
            music_volume,
            music_playing: true,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Starts a flash, replacing any flash still fading.
    pub(crate) fn start_flash(&mut self, color: Rgba, duration: Duration) {
        let generation = self.next_generation();
        self.flash = Some(Flash { color, generation });
        self.scaled
            .schedule(duration, Deferred::ClearFlash { generation });
    }

    /// Clears the flash when it still belongs to `generation`.
    pub(crate) fn clear_flash(&mut self, generation: u64) {
        if self.flash.is_some_and(|flash| flash.generation == generation) {
            self.flash = None;
        }
    }

    /// Current overlay colour, alpha fading linearly towards transparent.
    pub(crate) fn flash_overlay(&self) -> Option<Rgba> {
        let flash = self.flash?;
        let fade = self
            .scaled
            .find(|action| *action == Deferred::ClearFlash { generation: flash.generation })
            .map_or(1.0, |task| task.progress());
        Some(flash.color.with_alpha(flash.color.alpha * (1.0 - fade)))
    }

    /// Shows `text`, replacing any notification still on screen.
    pub(crate) fn show_notification(&mut self, text: String, duration: Duration) {
        let generation = self.next_generation();
        self.notification = Some(Notification { text, generation });
        self.scaled
            .schedule(duration, Deferred::ClearNotification { generation });
    }

    /// Clears the notification when it still belongs to `generation`.
    /// Returns whether it was cleared.
    pub(crate) fn clear_notification(&mut self, generation: u64) -> bool {
        let current = self
            .notification
            .as_ref()
            .is_some_and(|notification| notification.generation == generation);
        if current {
            self.notification = None;
        }
        current
    }

    pub(crate) fn notification(&self) -> Option<&str> {
        self.notification
            .as_ref()
            .map(|notification| notification.text.as_str())
    }

    /// Begins fading the music out over `fade`.
    pub(crate) fn fade_music(&mut self, fade: Duration) {
        let fading = self
            .unscaled
            .find(|action| *action == Deferred::StopMusic)
            .is_some();
        if self.music_playing && !fading {
            self.unscaled.schedule(fade, Deferred::StopMusic);
        }
    }

    pub(crate) fn stop_music(&mut self) {
        self.music_playing = false;
    }

    pub(crate) fn music_volume(&self) -> f32 {
        if !self.music_playing {
            return 0.0;
        }
        let fade = self
            .unscaled
            .find(|action| *action == Deferred::StopMusic)
            .map_or(0.0, |task| task.progress());
        self.music_volume * (1.0 - fade)
    }
}
