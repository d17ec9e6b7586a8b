//! Notification sound manager.
//!
//! One sound plays at a time; alerts arriving during playback queue up
//! instead of restarting the sound. Silencing the playing alert
//! ("Coming") advances to the next queued one; silencing a queued
//! alert just removes it from the queue.
//!
//! The manager only decides *what* should happen — `SoundAction` is
//! handed to whatever audio output the host UI owns.

use std::collections::VecDeque;

use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing { alert_id: Uuid },
}

/// Audible change requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundAction {
    /// Begin playback from the start for this alert.
    Start { alert_id: Uuid },
    /// Stop playback and reset position.
    Stop,
    /// No audible change.
    None,
}

#[derive(Debug, Default)]
pub struct SoundManager {
    state: PlaybackState,
    queue: VecDeque<Uuid>,
}

impl SoundManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing { .. })
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// A new alert wants attention.
    pub fn request(&mut self, alert_id: Uuid) -> SoundAction {
        match &self.state {
            PlaybackState::Idle => {
                self.state = PlaybackState::Playing { alert_id };
                SoundAction::Start { alert_id }
            }
            PlaybackState::Playing { alert_id: current } => {
                if *current == alert_id || self.queue.contains(&alert_id) {
                    return SoundAction::None;
                }
                self.queue.push_back(alert_id);
                SoundAction::None
            }
        }
    }

    /// Acknowledge one alert's sound ("Coming").
    pub fn silence(&mut self, alert_id: &Uuid) -> SoundAction {
        match &self.state {
            PlaybackState::Playing { alert_id: current } if current == alert_id => {
                match self.queue.pop_front() {
                    Some(next) => {
                        self.state = PlaybackState::Playing { alert_id: next };
                        SoundAction::Start { alert_id: next }
                    }
                    None => {
                        self.state = PlaybackState::Idle;
                        SoundAction::Stop
                    }
                }
            }
            _ => {
                self.queue.retain(|id| id != alert_id);
                SoundAction::None
            }
        }
    }

    /// Silence everything (dashboard teardown).
    pub fn silence_all(&mut self) -> SoundAction {
        self.queue.clear();
        if self.is_playing() {
            self.state = PlaybackState::Idle;
            SoundAction::Stop
        } else {
            SoundAction::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_starts_playback() {
        let mut sound = SoundManager::new();
        let id = Uuid::new_v4();
        assert_eq!(sound.request(id), SoundAction::Start { alert_id: id });
        assert_eq!(sound.state(), &PlaybackState::Playing { alert_id: id });
    }

    #[test]
    fn second_request_queues_instead_of_restarting() {
        let mut sound = SoundManager::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        sound.request(first);
        assert_eq!(sound.request(second), SoundAction::None);
        assert_eq!(sound.state(), &PlaybackState::Playing { alert_id: first });
        assert_eq!(sound.queued(), 1);
    }

    #[test]
    fn repeated_request_for_same_alert_is_ignored() {
        let mut sound = SoundManager::new();
        let id = Uuid::new_v4();
        sound.request(id);
        assert_eq!(sound.request(id), SoundAction::None);
        assert_eq!(sound.queued(), 0);
    }

    #[test]
    fn silencing_the_playing_alert_advances_the_queue() {
        let mut sound = SoundManager::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        sound.request(first);
        sound.request(second);

        assert_eq!(
            sound.silence(&first),
            SoundAction::Start { alert_id: second }
        );
        assert_eq!(sound.state(), &PlaybackState::Playing { alert_id: second });
        assert_eq!(sound.queued(), 0);
    }

    #[test]
    fn silencing_the_last_alert_stops_playback() {
        let mut sound = SoundManager::new();
        let id = Uuid::new_v4();
        sound.request(id);

        assert_eq!(sound.silence(&id), SoundAction::Stop);
        assert_eq!(sound.state(), &PlaybackState::Idle);
    }

    #[test]
    fn silencing_a_queued_alert_removes_it_quietly() {
        let mut sound = SoundManager::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        sound.request(first);
        sound.request(second);

        assert_eq!(sound.silence(&second), SoundAction::None);
        assert_eq!(sound.state(), &PlaybackState::Playing { alert_id: first });
        assert_eq!(sound.queued(), 0);
    }

    #[test]
    fn silencing_an_unknown_alert_changes_nothing() {
        let mut sound = SoundManager::new();
        let id = Uuid::new_v4();
        sound.request(id);

        assert_eq!(sound.silence(&Uuid::new_v4()), SoundAction::None);
        assert_eq!(sound.state(), &PlaybackState::Playing { alert_id: id });
    }

    #[test]
    fn silence_all_stops_and_clears_queue() {
        let mut sound = SoundManager::new();
        sound.request(Uuid::new_v4());
        sound.request(Uuid::new_v4());

        assert_eq!(sound.silence_all(), SoundAction::Stop);
        assert_eq!(sound.state(), &PlaybackState::Idle);
        assert_eq!(sound.queued(), 0);

        assert_eq!(sound.silence_all(), SoundAction::None);
    }
}
