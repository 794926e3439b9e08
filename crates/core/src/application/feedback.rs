// Player feedback - renders templates with current settings and sends them

use crate::application::settings::RuntimeSettings;
use crate::domain::{MessageTemplates, PlayerId, Position};
use crate::port::Messenger;
use std::sync::Arc;

/// Renders a template picked from the current settings and messages the player
#[derive(Clone)]
pub struct Feedback {
    messenger: Arc<dyn Messenger>,
    settings: Arc<RuntimeSettings>,
}

impl Feedback {
    pub fn new(messenger: Arc<dyn Messenger>, settings: Arc<RuntimeSettings>) -> Self {
        Self {
            messenger,
            settings,
        }
    }

    pub fn settings(&self) -> &Arc<RuntimeSettings> {
        &self.settings
    }

    /// Send `pick(templates)` rendered with `vars`
    pub fn send<F>(&self, player_id: PlayerId, pick: F, vars: &[(&str, &str)])
    where
        F: FnOnce(&MessageTemplates) -> &str,
    {
        let snapshot = self.settings.snapshot();
        let text = MessageTemplates::render(pick(&snapshot.messages), vars);
        self.messenger.send_message(player_id, &text);
    }

    /// Send a template that carries queue, position and total placeholders
    pub fn send_position<F>(
        &self,
        player_id: PlayerId,
        pick: F,
        queue: &str,
        position: Position,
        extra: &[(&str, &str)],
    ) where
        F: FnOnce(&MessageTemplates) -> &str,
    {
        let snapshot = self.settings.snapshot();
        let shown = snapshot.queue.display_position(position.position);
        let total = position.total.to_string();

        let mut vars: Vec<(&str, &str)> = vec![
            ("queue", queue),
            ("position", shown.as_str()),
            ("total", total.as_str()),
        ];
        vars.extend_from_slice(extra);

        let text = MessageTemplates::render(pick(&snapshot.messages), &vars);
        self.messenger.send_message(player_id, &text);
    }
}
