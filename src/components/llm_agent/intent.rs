use chrono::Utc;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use tracing::error;

const SYSTEM_PROMPT: &str = "You are a scheduling assistant. You interpret natural-language requests about calendar events and answer with exactly one JSON object, nothing else.

Available actions:
{\"action\": \"add_event\", \"title\": \"...\", \"date\": \"YYYY-MM-DD\", \"time\": \"HH:MM\", \"duration\": 60, \"description\": \"...\"}
  Use when the user wants to create, add or schedule an event. title, date and time are required. duration is in minutes and defaults to 60. description is optional.

{\"action\": \"list_events\", \"date\": \"YYYY-MM-DD\", \"days\": 7}
  Use when the user wants to see or check their schedule. Give date to show a single day; otherwise give days to show that many days ahead from today (default 7).

{\"action\": \"update_event\", \"event_id\": \"...\", \"title\": \"...\", \"date\": \"YYYY-MM-DD\", \"time\": \"HH:MM\", \"duration\": 60, \"description\": \"...\"}
  Use when the user wants to modify or change an event. event_id is required and comes from an earlier listing; every other field is optional and only the given ones change.

{\"action\": \"delete_event\", \"event_id\": \"...\"}
  Use when the user wants to remove or cancel an event.

{\"action\": \"chat\", \"reply\": \"...\"}
  Use for anything that is not a calendar request. reply is your conversational answer.

Resolve relative dates (today, tomorrow, next Tuesday) against the current date given below. Ensure the output contains only the JSON object, with no introductory text, explanations or code fences.";

/// Build the system preamble, anchoring relative dates to the current day
pub fn build_preamble(timezone: &str) -> String {
    let tz = timezone.parse::<Tz>().unwrap_or(chrono_tz::UTC);
    let now = Utc::now().with_timezone(&tz);
    format!(
        "{}\n\nToday's date is {} ({}). Timezone: {}.",
        SYSTEM_PROMPT,
        now.format("%Y-%m-%d"),
        now.format("%A"),
        timezone
    )
}

/// Structured result of interpreting one user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Interpretation {
    AddEvent {
        title: String,
        date: String,
        time: String,
        #[serde(default)]
        duration: Option<i64>,
        #[serde(default)]
        description: Option<String>,
    },
    ListEvents {
        #[serde(default)]
        date: Option<String>,
        #[serde(default)]
        days: Option<i64>,
    },
    UpdateEvent {
        event_id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        date: Option<String>,
        #[serde(default)]
        time: Option<String>,
        #[serde(default)]
        duration: Option<i64>,
        #[serde(default)]
        description: Option<String>,
    },
    DeleteEvent {
        event_id: String,
    },
    Chat {
        reply: String,
    },
}

/// Attempt to parse an interpretation from the model response
pub fn parse_interpretation(response: &str) -> Interpretation {
    // Try to extract a JSON object from the text
    if let (Some(json_start), Some(json_end)) = (response.find('{'), response.rfind('}')) {
        if json_start < json_end {
            let json_str = &response[json_start..=json_end];
            match from_str::<Interpretation>(json_str) {
                Ok(interpretation) => return interpretation,
                Err(e) => {
                    error!("Failed to parse JSON from response: {}", e);
                }
            }
        }
    }

    // Try to parse the entire response (in case it's already clean JSON)
    match from_str::<Interpretation>(response) {
        Ok(interpretation) => interpretation,
        Err(_) => {
            // A response that is not an action is treated as conversation
            Interpretation::Chat {
                reply: response.trim().to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_event() {
        let response = r#"{"action": "add_event", "title": "Team meeting", "date": "2024-12-25", "time": "14:00", "duration": 30}"#;
        let interpretation = parse_interpretation(response);

        assert_eq!(
            interpretation,
            Interpretation::AddEvent {
                title: "Team meeting".to_string(),
                date: "2024-12-25".to_string(),
                time: "14:00".to_string(),
                duration: Some(30),
                description: None,
            }
        );
    }

    #[test]
    fn test_parse_list_events_defaults() {
        let interpretation = parse_interpretation(r#"{"action": "list_events"}"#);

        assert_eq!(
            interpretation,
            Interpretation::ListEvents {
                date: None,
                days: None,
            }
        );
    }

    #[test]
    fn test_parse_delete_event() {
        let interpretation = parse_interpretation(r#"{"action": "delete_event", "event_id": "abc123"}"#);

        assert_eq!(
            interpretation,
            Interpretation::DeleteEvent {
                event_id: "abc123".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        // Models sometimes wrap the object despite the contract
        let response = "Sure, here you go:\n```json\n{\"action\": \"list_events\", \"days\": 3}\n```";
        let interpretation = parse_interpretation(response);

        assert_eq!(
            interpretation,
            Interpretation::ListEvents {
                date: None,
                days: Some(3),
            }
        );
    }

    #[test]
    fn test_plain_text_falls_back_to_chat() {
        let interpretation = parse_interpretation("Hello! How can I help you today?");

        assert_eq!(
            interpretation,
            Interpretation::Chat {
                reply: "Hello! How can I help you today?".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_action_falls_back_to_chat() {
        let response = r#"{"action": "send_email", "to": "someone"}"#;
        let interpretation = parse_interpretation(response);

        assert_eq!(
            interpretation,
            Interpretation::Chat {
                reply: response.to_string(),
            }
        );
    }

    #[test]
    fn test_build_preamble_mentions_timezone() {
        let preamble = build_preamble("Europe/Helsinki");
        assert!(preamble.contains("Timezone: Europe/Helsinki."));
        assert!(preamble.contains("Today's date is"));
    }
}
