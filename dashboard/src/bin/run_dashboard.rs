use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use dashboard::{Dashboard, DashboardConfig, DashboardHandle, Location, TerminalSurface};
use gateway::{Backend, HttpBackend, ScriptedBackend};
use types::{
    PlayEvent, RecordDetail, RecordId, RecordSummary, RecordsPage, Round, RoundResult, Summary,
    TaskStatus, TriState, WinnerCount,
};

#[derive(Parser, Debug)]
struct Params {
    #[arg(long)]
    api_url: Option<String>,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address the dashboard is shown at. Its `record` parameter selects the
    /// record to open first.
    #[arg(long, default_value = "http://localhost/dashboard")]
    location: String,

    #[arg(short, long)]
    record: Option<String>,

    #[arg(long)]
    start_game: bool,

    #[arg(long)]
    once: bool,

    #[arg(long)]
    demo: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let config = DashboardConfig::load(args.api_url.clone(), args.config.as_deref())?;
    let mut location = Location::parse(&args.location)?;
    if let Some(record) = &args.record {
        location.set_record(Some(&RecordId::new(record.as_str())));
    }

    let backend: Arc<dyn Backend> = if args.demo {
        Arc::new(demo_backend())
    } else {
        let http = HttpBackend::new(&config.gateway)?;
        log::info!("Using records API at {}", http.base_url());
        Arc::new(http)
    };

    let mut dashboard = Dashboard::new(backend, TerminalSurface::new(location), config.poll);
    let handle = dashboard.handle();
    dashboard.start();
    if args.start_game {
        handle.start_game();
    }

    if args.once {
        dashboard.run_until_idle().await;
        return Ok(());
    }

    tokio::spawn(read_commands(handle));
    dashboard.run().await;
    Ok(())
}

async fn read_commands(handle: DashboardHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Could not read command: {e}");
                break;
            }
        };
        let mut words = line.split_whitespace();
        let delivered = match (words.next(), words.next()) {
            (None, _) => true,
            (Some("open"), Some(id)) => handle.activate(RecordId::new(id)),
            (Some("start"), None) => handle.start_game(),
            (Some("refresh"), None) => handle.refresh(),
            (Some("quit"), None) => break,
            _ => {
                eprintln!("commands: open <id> | start | refresh | quit");
                true
            }
        };
        if !delivered {
            return;
        }
    }
    handle.shutdown();
}

fn demo_backend() -> ScriptedBackend {
    let first = demo_record("demo-1", "Alice", &["Alice", "Bob", "Carol"], 2);
    let second = demo_record("demo-2", "Bob", &["Alice", "Bob"], 1);
    let fresh = demo_record("demo-3", "Carol", &["Bob", "Carol"], 1);

    let before = demo_page(vec![second.clone(), first.clone()]);
    let after = demo_page(vec![fresh.clone(), second.clone(), first.clone()]);

    let mut backend = ScriptedBackend::new()
        .with_records(before)
        .with_records(after)
        .with_task("demo-task")
        .with_status(TaskStatus::Running)
        .with_status(TaskStatus::Finished {
            record_id: Some(fresh.id.clone()),
        });
    for record in [first, second, fresh] {
        let detail = demo_detail(&record);
        backend = backend.with_detail(record.id, detail);
    }
    backend
}

fn demo_record(id: &str, winner: &str, players: &[&str], rounds: usize) -> RecordSummary {
    RecordSummary {
        id: RecordId::new(id),
        name: format!("Liar's Bar {id}"),
        winner: Some(winner.to_string()),
        players: players.iter().map(|p| p.to_string()).collect(),
        round_count: rounds,
        updated_at: Some("2024-05-31T18:08:37".to_string()),
        source: Some("demo".to_string()),
        game_id: Some(id.to_string()),
    }
}

fn demo_page(records: Vec<RecordSummary>) -> RecordsPage {
    let mut unique_players = records
        .iter()
        .flat_map(|record| record.players.iter().cloned())
        .collect::<Vec<_>>();
    unique_players.sort();
    unique_players.dedup();

    let mut winner_breakdown: Vec<WinnerCount> = Vec::new();
    for winner in records.iter().filter_map(|record| record.winner.as_ref()) {
        match winner_breakdown.iter_mut().find(|count| &count.name == winner) {
            Some(count) => count.count += 1,
            None => winner_breakdown.push(WinnerCount {
                name: winner.clone(),
                count: 1,
            }),
        }
    }

    RecordsPage {
        summary: Summary {
            total_records: records.len(),
            unique_players,
            winner_breakdown,
        },
        records,
    }
}

fn demo_detail(record: &RecordSummary) -> RecordDetail {
    let rounds = (0..record.round_count)
        .map(|n| {
            let player = record.players[n % record.players.len()].clone();
            let next = record.players[(n + 1) % record.players.len()].clone();
            Round {
                round_id: Some((n + 1).to_string()),
                target_card: Some(["Q", "K", "A"][n % 3].to_string()),
                starting_player: Some(player.clone()),
                round_result: Some(RoundResult {
                    bullet_hit: if n + 1 == record.round_count {
                        TriState::Yes
                    } else {
                        TriState::No
                    },
                    shooter_name: Some(player.clone()),
                }),
                history: vec![PlayEvent {
                    player: player.clone(),
                    played_cards: vec!["Q".to_string(), "Joker".to_string()],
                    behavior: Some("Plays calmly".to_string()),
                    play_reason: None,
                    challenge_reason: Some("Two cards is suspicious".to_string()),
                    was_challenged: TriState::Yes,
                    challenge_result: TriState::Unrecorded,
                    next_player: Some(next),
                }],
            }
        })
        .collect();

    RecordDetail {
        game_id: record.game_id.clone(),
        winner: record.winner.clone(),
        players: record.players.clone(),
        rounds,
    }
}
