use types::RecordId;

use crate::error::{Toast, ToastLevel};
use crate::location::Location;
use crate::renderer::{DetailPanel, ListView, SummaryCard, TriggerView};

pub trait Surface {
    fn show_summary(&mut self, cards: Vec<SummaryCard>);
    fn show_list(&mut self, list: ListView);
    fn set_active_card(&mut self, id: Option<&RecordId>);
    fn show_detail(&mut self, panel: DetailPanel);
    fn location(&self) -> &Location;
    fn replace_location(&mut self, location: Location);
    fn show_trigger(&mut self, trigger: TriggerView);
    fn toast(&mut self, toast: Toast);
}

pub struct TerminalSurface {
    location: Location,
}

impl TerminalSurface {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

impl Surface for TerminalSurface {
    fn show_summary(&mut self, cards: Vec<SummaryCard>) {
        let line = cards
            .iter()
            .map(|card| format!("{}: {}", card.label, card.value))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("== {line}");
        for card in cards.iter().filter(|card| card.detail.is_some()) {
            println!("   {} ({})", card.label, card.detail.as_deref().unwrap_or_default());
        }
    }

    fn show_list(&mut self, list: ListView) {
        print!("{list}");
    }

    fn set_active_card(&mut self, id: Option<&RecordId>) {
        if let Some(id) = id {
            println!("> viewing {id}");
        }
    }

    fn show_detail(&mut self, panel: DetailPanel) {
        print!("{panel}");
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn replace_location(&mut self, location: Location) {
        println!("@ {location}");
        self.location = location;
    }

    fn show_trigger(&mut self, trigger: TriggerView) {
        let state = if trigger.enabled { "" } else { " (disabled)" };
        println!("[{}]{state}", trigger.label);
    }

    fn toast(&mut self, toast: Toast) {
        let prefix = match toast.level {
            ToastLevel::Success => "ok",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        };
        eprintln!("{prefix}: {}", toast.message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Summary(Vec<SummaryCard>),
    List(ListView),
    ActiveCard(Option<RecordId>),
    Detail(DetailPanel),
    Location(String),
    Trigger(TriggerView),
    Toast(Toast),
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    location: Location,
    pub events: Vec<SurfaceEvent>,
    pub active_card: Option<RecordId>,
    pub list: Option<ListView>,
    pub detail: Option<DetailPanel>,
    pub trigger: Option<TriggerView>,
}

impl RecordingSurface {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            events: Vec::new(),
            active_card: None,
            list: None,
            detail: None,
            trigger: None,
        }
    }

    pub fn toasts(&self) -> Vec<&Toast> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Toast(toast) => Some(toast),
                _ => None,
            })
            .collect()
    }

    pub fn toasts_at(&self, level: ToastLevel) -> Vec<&Toast> {
        self.toasts()
            .into_iter()
            .filter(|toast| toast.level == level)
            .collect()
    }

    pub fn details_shown(&self) -> Vec<&DetailPanel> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Detail(panel) => Some(panel),
                _ => None,
            })
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl Surface for RecordingSurface {
    fn show_summary(&mut self, cards: Vec<SummaryCard>) {
        self.events.push(SurfaceEvent::Summary(cards));
    }

    fn show_list(&mut self, list: ListView) {
        self.active_card = list.active_ids().first().map(|id| (*id).clone());
        self.list = Some(list.clone());
        self.events.push(SurfaceEvent::List(list));
    }

    fn set_active_card(&mut self, id: Option<&RecordId>) {
        self.active_card = id.cloned();
        if let Some(ListView::Cards(cards)) = &mut self.list {
            for card in cards.iter_mut() {
                card.active = Some(&card.id) == id;
            }
        }
        self.events.push(SurfaceEvent::ActiveCard(id.cloned()));
    }

    fn show_detail(&mut self, panel: DetailPanel) {
        self.detail = Some(panel.clone());
        self.events.push(SurfaceEvent::Detail(panel));
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn replace_location(&mut self, location: Location) {
        self.events.push(SurfaceEvent::Location(location.to_string()));
        self.location = location;
    }

    fn show_trigger(&mut self, trigger: TriggerView) {
        self.trigger = Some(trigger);
        self.events.push(SurfaceEvent::Trigger(trigger));
    }

    fn toast(&mut self, toast: Toast) {
        self.events.push(SurfaceEvent::Toast(toast));
    }
}
