//! Pure projections from dashboard data to what the surface shows.

use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime};
use itertools::Itertools;
use types::{PlayEvent, RecordDetail, RecordId, RecordSummary, Round, Summary, TriState};

use crate::supervisor::TaskPhase;

pub const EMPTY_LIST_TEXT: &str = "No game records yet";
pub const EMPTY_DETAIL_TEXT: &str = "No games yet. Start a new game to create the first record.";
const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCard {
    pub id: RecordId,
    pub title: String,
    pub winner: String,
    pub players: String,
    pub rounds: usize,
    pub updated: String,
    pub source: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Placeholder(String),
    Cards(Vec<RecordCard>),
}

impl ListView {
    pub fn active_ids(&self) -> Vec<&RecordId> {
        match self {
            ListView::Placeholder(_) => vec![],
            ListView::Cards(cards) => cards.iter().filter(|c| c.active).map(|c| &c.id).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayView {
    pub player: String,
    pub cards: String,
    pub behavior: Option<String>,
    pub play_reason: Option<String>,
    pub challenged: &'static str,
    pub challenge_result: &'static str,
    pub challenge_reason: Option<String>,
    pub next_player: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundView {
    pub heading: String,
    pub target_card: String,
    pub starting_player: String,
    pub outcome: String,
    pub plays: Vec<PlayView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub record_id: RecordId,
    pub title: String,
    pub winner: String,
    pub players: String,
    pub rounds: Vec<RoundView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPanel {
    Empty(String),
    Loading(RecordId),
    Unavailable { record_id: RecordId, message: String },
    Game(GameView),
}

impl DetailPanel {
    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            DetailPanel::Empty(_) => None,
            DetailPanel::Loading(id) => Some(id),
            DetailPanel::Unavailable { record_id, .. } => Some(record_id),
            DetailPanel::Game(game) => Some(&game.record_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerView {
    pub label: &'static str,
    pub enabled: bool,
}

pub fn summary_cards(summary: &Summary) -> Vec<SummaryCard> {
    let top_winner = summary
        .winner_breakdown
        .first()
        .map(|w| format!("{} ({} wins)", w.name, w.count))
        .unwrap_or_else(|| "none yet".to_string());
    let breakdown = summary
        .winner_breakdown
        .iter()
        .map(|w| format!("{}: {}", w.name, w.count))
        .join(", ");

    vec![
        SummaryCard {
            label: "Games played",
            value: summary.total_records.to_string(),
            detail: None,
        },
        SummaryCard {
            label: "Players",
            value: summary.unique_players.len().to_string(),
            detail: (!summary.unique_players.is_empty())
                .then(|| summary.unique_players.join(", ")),
        },
        SummaryCard {
            label: "Top winner",
            value: top_winner,
            detail: (!breakdown.is_empty()).then_some(breakdown),
        },
    ]
}

pub fn record_list(records: &[RecordSummary], active: Option<&RecordId>) -> ListView {
    if records.is_empty() {
        return ListView::Placeholder(EMPTY_LIST_TEXT.to_string());
    }
    ListView::Cards(
        records
            .iter()
            .map(|record| RecordCard {
                id: record.id.clone(),
                title: record_title(record),
                winner: record.winner.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                players: join_or(&record.players, "no players recorded"),
                rounds: record.round_count,
                updated: format_timestamp(record.updated_at.as_deref()),
                source: record.source.clone(),
                active: active == Some(&record.id),
            })
            .collect(),
    )
}

pub fn empty_detail() -> DetailPanel {
    DetailPanel::Empty(EMPTY_DETAIL_TEXT.to_string())
}

pub fn detail_panel(record_id: &RecordId, detail: &RecordDetail) -> DetailPanel {
    DetailPanel::Game(GameView {
        record_id: record_id.clone(),
        title: match &detail.game_id {
            Some(game_id) => format!("Game {game_id}"),
            None => format!("Record {record_id}"),
        },
        winner: detail.winner.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        players: join_or(&detail.players, "no players recorded"),
        rounds: detail
            .rounds
            .iter()
            .enumerate()
            .map(|(idx, round)| round_view(idx, round))
            .collect(),
    })
}

fn round_view(idx: usize, round: &Round) -> RoundView {
    let outcome = match &round.round_result {
        None => "Result not recorded".to_string(),
        Some(result) => {
            let shooter = result.shooter_name.as_deref().unwrap_or(UNKNOWN);
            let shot = result
                .bullet_hit
                .label("the shot fired", "the chamber was empty", "the shot was not recorded");
            format!("{shooter} pulled the trigger: {shot}")
        }
    };

    RoundView {
        heading: format!(
            "Round {}",
            round.round_id.clone().unwrap_or_else(|| (idx + 1).to_string())
        ),
        target_card: round.target_card.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        starting_player: round
            .starting_player
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        outcome,
        plays: round.history.iter().map(play_view).collect(),
    }
}

fn play_view(event: &PlayEvent) -> PlayView {
    PlayView {
        player: event.player.clone(),
        cards: join_or(&event.played_cards, "no cards"),
        behavior: event.behavior.clone(),
        play_reason: event.play_reason.clone(),
        challenged: challenged_label(event.was_challenged),
        challenge_result: challenge_result_label(event.challenge_result),
        challenge_reason: event.challenge_reason.clone(),
        next_player: event.next_player.clone(),
    }
}

pub fn challenged_label(value: TriState) -> &'static str {
    value.label("challenged", "not challenged", "challenge not recorded")
}

pub fn challenge_result_label(value: TriState) -> &'static str {
    value.label("challenge succeeded", "challenge failed", "result not recorded")
}

pub fn trigger_view(phase: &TaskPhase) -> TriggerView {
    match phase {
        TaskPhase::Idle => TriggerView {
            label: "Start new game",
            enabled: true,
        },
        TaskPhase::Submitting => TriggerView {
            label: "Starting…",
            enabled: false,
        },
        TaskPhase::Polling { .. } => TriggerView {
            label: "Running…",
            enabled: false,
        },
    }
}

/// ISO timestamps are shortened to minutes; anything else is shown as sent.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN.to_string();
    };
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return aware.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

fn record_title(record: &RecordSummary) -> String {
    if !record.name.is_empty() {
        record.name.clone()
    } else if let Some(game_id) = &record.game_id {
        format!("Game {game_id}")
    } else {
        record.id.to_string()
    }
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

impl Display for ListView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListView::Placeholder(text) => writeln!(f, "  ({text})"),
            ListView::Cards(cards) => {
                for card in cards {
                    let marker = if card.active { '*' } else { ' ' };
                    writeln!(
                        f,
                        "{marker} {}  {}  winner: {}  rounds: {}  updated: {}",
                        card.id, card.title, card.winner, card.rounds, card.updated
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl Display for DetailPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailPanel::Empty(text) => writeln!(f, "{text}"),
            DetailPanel::Loading(id) => writeln!(f, "Loading record {id}…"),
            DetailPanel::Unavailable { record_id, message } => {
                writeln!(f, "Record {record_id} is unavailable: {message}")
            }
            DetailPanel::Game(game) => {
                writeln!(f, "{}  (winner: {})", game.title, game.winner)?;
                writeln!(f, "Players: {}", game.players)?;
                for round in &game.rounds {
                    writeln!(
                        f,
                        "\n{}  target: {}  starts: {}",
                        round.heading, round.target_card, round.starting_player
                    )?;
                    for play in &round.plays {
                        write!(f, "  {} played [{}]", play.player, play.cards)?;
                        if let Some(behavior) = &play.behavior {
                            write!(f, " ({behavior})")?;
                        }
                        writeln!(f, "; {}, {}", play.challenged, play.challenge_result)?;
                        if let Some(reason) = &play.play_reason {
                            writeln!(f, "    why: {reason}")?;
                        }
                        if let Some(reason) = &play.challenge_reason {
                            writeln!(f, "    challenge: {reason}")?;
                        }
                    }
                    writeln!(f, "  {}", round.outcome)?;
                }
                Ok(())
            }
        }
    }
}
