//! Start / pause / play button state.

/// Playback button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackControls {
    /// Nothing played yet; the first press starts audio
    #[default]
    NotStarted,
    Playing,
    Paused,
}

/// What the owner of the audio output must do after a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Start,
    Pause,
    Resume,
}

impl PlaybackControls {
    /// Advance on a button press
    pub fn press(&mut self) -> PlaybackAction {
        let (next, action) = match self {
            PlaybackControls::NotStarted => (PlaybackControls::Playing, PlaybackAction::Start),
            PlaybackControls::Playing => (PlaybackControls::Paused, PlaybackAction::Pause),
            PlaybackControls::Paused => (PlaybackControls::Playing, PlaybackAction::Resume),
        };
        *self = next;
        action
    }

    /// Button caption for the current state
    pub fn label(self) -> &'static str {
        match self {
            PlaybackControls::NotStarted => "Start",
            PlaybackControls::Playing => "Pause",
            PlaybackControls::Paused => "Play",
        }
    }

    /// Whether the "now playing" indicator is shown
    pub fn is_playing(self) -> bool {
        self == PlaybackControls::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_cycle() {
        let mut controls = PlaybackControls::default();
        assert_eq!(controls.label(), "Start");
        assert!(!controls.is_playing());

        assert_eq!(controls.press(), PlaybackAction::Start);
        assert_eq!(controls.label(), "Pause");
        assert!(controls.is_playing());

        assert_eq!(controls.press(), PlaybackAction::Pause);
        assert_eq!(controls.label(), "Play");

        assert_eq!(controls.press(), PlaybackAction::Resume);
        assert_eq!(controls.label(), "Pause");
    }
}
