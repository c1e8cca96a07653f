use serde::{Deserialize, Serialize};

use crate::ident::lenient_string;
use crate::tri_state::TriState;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDetail {
    #[serde(default, deserialize_with = "lenient_string")]
    pub game_id: Option<String>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    #[serde(default, deserialize_with = "lenient_string")]
    pub round_id: Option<String>,
    #[serde(default)]
    pub target_card: Option<String>,
    #[serde(default)]
    pub starting_player: Option<String>,
    #[serde(default)]
    pub round_result: Option<RoundResult>,
    #[serde(default)]
    pub history: Vec<PlayEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    #[serde(default)]
    pub bullet_hit: TriState,
    #[serde(default)]
    pub shooter_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub played_cards: Vec<String>,
    #[serde(default)]
    pub behavior: Option<String>,
    #[serde(default)]
    pub play_reason: Option<String>,
    #[serde(default)]
    pub challenge_reason: Option<String>,
    #[serde(default)]
    pub was_challenged: TriState,
    #[serde(default)]
    pub challenge_result: TriState,
    #[serde(default)]
    pub next_player: Option<String>,
}
