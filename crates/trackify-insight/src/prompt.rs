//! ---
//! tfy_section: "04-insight"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Advisory-text adapter and request sequencing."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use trackify_core::FleetSnapshot;

/// Fixed system instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a professional IoT analyst. Provide concise, high-value insights.";

/// Fixed user instruction sent with every request.
pub const USER_INSTRUCTION: &str = "Based on the device data and alerts, provide 3 short, \
     actionable bullet points for the fleet manager. Focus on safety (speed/SOS) and \
     efficiency (sleep/battery). Keep it under 100 words.";

/// Request body for a `generateContent` call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
}

/// Response body of a `generateContent` call; only the candidate text is
/// consumed.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> String {
        let Some(content) = self.candidates.first().and_then(|c| c.content.as_ref()) else {
            return String::new();
        };
        content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Assemble the full request for one fleet snapshot.
pub fn build_request(snapshot: &FleetSnapshot, temperature: f64) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: Content::text(SYSTEM_INSTRUCTION),
        contents: vec![Content::text(user_prompt(snapshot))],
        generation_config: GenerationConfig { temperature },
    }
}

/// The user turn: the fixed instruction followed by the JSON-embedded fleet
/// snapshot (abbreviated devices plus the most recent alerts).
pub fn user_prompt(snapshot: &FleetSnapshot) -> String {
    let devices = serde_json::to_string(&snapshot.devices).unwrap_or_else(|_| "[]".to_owned());
    let alerts = serde_json::to_string(&snapshot.alerts).unwrap_or_else(|_| "[]".to_owned());
    format!("{USER_INSTRUCTION}\n\nCurrent devices: {devices}\nRecent alerts: {alerts}")
}
