// Player-facing message templates
// Placeholders are written as {name}; legacy '&' colour codes pass through untouched

use serde::{Deserialize, Serialize};

/// Configurable text for every queue outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    pub joined: String,
    pub bypassed: String,
    pub queue_not_found: String,
    pub already_queued: String,
    pub queue_paused: String,
    pub left: String,
    pub not_queued: String,
    pub paused: String,
    pub already_paused: String,
    pub unpaused: String,
    pub already_unpaused: String,
    pub position_update: String,
    pub sending: String,
    pub transfer_failed: String,
    pub transfer_failed_final: String,
    pub queue_removed: String,
    pub no_permission: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            joined: "&aYou joined the &e{queue} &aqueue as &e{tier}&a. Position &e{position}&a of &e{total}&a.".to_string(),
            bypassed: "&aYou bypassed the &e{queue} &aqueue. Sending you now...".to_string(),
            queue_not_found: "&cThe queue &e{queue} &cdoes not exist.".to_string(),
            already_queued: "&cYou are already queued for &e{queue}&c. Leave it first.".to_string(),
            queue_paused: "&cThe &e{queue} &cqueue is currently paused.".to_string(),
            left: "&eYou left the &6{queue} &equeue.".to_string(),
            not_queued: "&cYou are not in a queue.".to_string(),
            paused: "&eThe &6{queue} &equeue has been paused.".to_string(),
            already_paused: "&cThe &e{queue} &cqueue is already paused.".to_string(),
            unpaused: "&aThe &e{queue} &aqueue has been unpaused.".to_string(),
            already_unpaused: "&cThe &e{queue} &cqueue is not paused.".to_string(),
            position_update: "&eYou are position &6{position} &eof &6{total} &ein the &6{queue} &equeue.".to_string(),
            sending: "&aSending you to &e{queue}&a...".to_string(),
            transfer_failed: "&cCould not send you to &e{queue}&c: {reason}. Position &e{position}&c of &e{total}&c.".to_string(),
            transfer_failed_final: "&cCould not send you to &e{queue}&c: {reason}.".to_string(),
            queue_removed: "&cThe &e{queue} &cqueue was removed. You have been taken out of it.".to_string(),
            no_permission: "&cYou do not have permission to do that.".to_string(),
        }
    }
}

impl MessageTemplates {
    /// Substitute `{key}` placeholders in `template`
    pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
        let mut out = template.to_string();
        for (key, value) in vars {
            out = out.replace(&format!("{{{}}}", key), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_all_placeholders() {
        let text = MessageTemplates::render(
            "{queue}: {position}/{total} ({queue})",
            &[("queue", "practice"), ("position", "2"), ("total", "9")],
        );
        assert_eq!(text, "practice: 2/9 (practice)");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let text = MessageTemplates::render("{queue} {unknown}", &[("queue", "hub")]);
        assert_eq!(text, "hub {unknown}");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let templates: MessageTemplates =
            serde_json::from_value(serde_json::json!({ "left": "bye {queue}" })).unwrap();
        assert_eq!(templates.left, "bye {queue}");
        assert_eq!(templates.not_queued, MessageTemplates::default().not_queued);
    }
}
