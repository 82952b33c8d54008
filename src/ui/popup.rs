//! Small text popups: the interact hint and timed notifications.

use std::time::Duration;

use bevy::prelude::*;

/// How long a timed popup stays up by default.
const DEFAULT_ENABLE_TIME: f32 = 2.0;

/// Text shown by the two popup slots.
#[derive(Resource, Debug)]
pub struct Popups {
    interact: Option<String>,
    message: Option<(String, Timer)>,
    /// Seconds a timed popup stays visible
    pub enable_time: f32,
}

impl Default for Popups {
    fn default() -> Self {
        Self {
            interact: None,
            message: None,
            enable_time: DEFAULT_ENABLE_TIME,
        }
    }
}

impl Popups {
    pub fn show_interact(&mut self, text: impl Into<String>) {
        self.interact = Some(text.into());
    }

    pub fn hide_interact(&mut self) {
        self.interact = None;
    }

    /// Show `text` until the enable time runs out. Replaces any earlier popup.
    pub fn popup(&mut self, text: impl Into<String>) {
        self.message = Some((
            text.into(),
            Timer::from_seconds(self.enable_time, TimerMode::Once),
        ));
    }

    pub fn interact(&self) -> Option<&str> {
        self.interact.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn tick(&mut self, delta: Duration) {
        if let Some((_, timer)) = &mut self.message {
            if timer.tick(delta).finished() {
                self.message = None;
            }
        }
    }
}

/// Marker for the interact hint text.
#[derive(Component)]
pub struct InteractHint;

/// Marker for the timed popup text.
#[derive(Component)]
pub struct PopupMessage;

pub fn tick_popups(time: Res<Time>, mut popups: ResMut<Popups>) {
    popups.tick(time.delta());
}

/// Copy popup text into the HUD.
pub fn sync_popups(
    popups: Res<Popups>,
    mut hints: Query<(&mut Text, &mut Visibility), (With<InteractHint>, Without<PopupMessage>)>,
    mut messages: Query<(&mut Text, &mut Visibility), (With<PopupMessage>, Without<InteractHint>)>,
) {
    for (mut text, mut visibility) in hints.iter_mut() {
        show(popups.interact(), &mut text, &mut visibility);
    }
    for (mut text, mut visibility) in messages.iter_mut() {
        show(popups.message(), &mut text, &mut visibility);
    }
}

fn show(content: Option<&str>, text: &mut Text, visibility: &mut Visibility) {
    match content {
        Some(content) => {
            if text.0 != content {
                text.0 = content.to_string();
            }
            *visibility = Visibility::Inherited;
        }
        None => *visibility = Visibility::Hidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_hides_after_enable_time() {
        let mut popups = Popups {
            enable_time: 1.0,
            ..default()
        };
        popups.popup("Picked up Lantern");
        popups.tick(Duration::from_millis(600));
        assert_eq!(popups.message(), Some("Picked up Lantern"));
        popups.tick(Duration::from_millis(600));
        assert_eq!(popups.message(), None);
    }

    #[test]
    fn new_popup_restarts_timer() {
        let mut popups = Popups {
            enable_time: 1.0,
            ..default()
        };
        popups.popup("first");
        popups.tick(Duration::from_millis(800));
        popups.popup("second");
        popups.tick(Duration::from_millis(800));
        assert_eq!(popups.message(), Some("second"));
    }

    #[test]
    fn interact_hint_is_untimed() {
        let mut popups = Popups::default();
        popups.show_interact("Use Lantern");
        popups.tick(Duration::from_secs(60));
        assert_eq!(popups.interact(), Some("Use Lantern"));
        popups.hide_interact();
        assert_eq!(popups.interact(), None);
    }
}
