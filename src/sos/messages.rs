//! Prompt and message texts of the SOS flow

use serde::{Deserialize, Serialize};

pub const EMERGENCY_TEXT: &str = "SOS! I need help!";
pub const SAFE_TEXT: &str = "I am safe now. Please disregard my SOS alert.";
pub const LOCATION_TEXT: &str = "Sharing my current location.";

/// Answer to a two-choice confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Cancel,
    #[serde(alias = "continue", alias = "confirm", alias = "deactivate")]
    Proceed,
}

/// A confirmation the client must show before the operation takes effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub title: &'static str,
    pub message: String,
    pub cancel_label: &'static str,
    pub proceed_label: &'static str,
}

impl Prompt {
    pub fn activation(countdown_seconds: u32) -> Self {
        Self {
            title: "SOS Activation",
            message: format!(
                "SOS will be activated in {} seconds. Tap Cancel to stop.",
                countdown_seconds
            ),
            cancel_label: "Cancel",
            proceed_label: "Continue",
        }
    }

    pub fn deactivation() -> Self {
        Self {
            title: "Deactivate SOS",
            message: "Are you sure you want to deactivate the SOS alert?".to_string(),
            cancel_label: "Cancel",
            proceed_label: "Deactivate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_accepts_dialog_button_names() {
        for raw in ["\"proceed\"", "\"continue\"", "\"confirm\"", "\"deactivate\""] {
            let choice: Choice = serde_json::from_str(raw).unwrap();
            assert_eq!(choice, Choice::Proceed);
        }
        let cancel: Choice = serde_json::from_str("\"cancel\"").unwrap();
        assert_eq!(cancel, Choice::Cancel);
    }

    #[test]
    fn activation_prompt_names_the_countdown() {
        let prompt = Prompt::activation(5);
        assert_eq!(prompt.message, "SOS will be activated in 5 seconds. Tap Cancel to stop.");
    }
}
