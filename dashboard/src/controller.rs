use std::ops::ControlFlow;
use std::sync::Arc;

use gateway::{Backend, RequestError};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use types::{RecordDetail, RecordId, RecordSummary, RecordsPage};

use crate::error::{DashboardError, Toast};
use crate::message::{DashboardHandle, Message};
use crate::reconciler::{reconcile, Selection, SelectionRequest};
use crate::renderer::{self, DetailPanel, TriggerView};
use crate::state::DashboardState;
use crate::supervisor::{PollPolicy, TaskOutcome, TaskSupervisor};
use crate::surface::Surface;

/// Owns all dashboard state and applies messages to it one at a time.
/// Network calls and timers run as spawned tasks that only ever report back
/// through the message channel.
pub struct Dashboard<S: Surface> {
    backend: Arc<dyn Backend>,
    surface: S,
    state: DashboardState,
    supervisor: TaskSupervisor,
    records: Vec<RecordSummary>,
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
    refresh_seq: u64,
    detail_seq: u64,
    in_flight: usize,
    shown_trigger: Option<TriggerView>,
}

impl<S: Surface> Dashboard<S> {
    pub fn new(backend: Arc<dyn Backend>, surface: S, poll: PollPolicy) -> Self {
        let (tx, rx) = unbounded_channel();
        let supervisor = TaskSupervisor::new(backend.clone(), tx.clone(), poll);
        Self {
            backend,
            surface,
            state: DashboardState::default(),
            supervisor,
            records: Vec::new(),
            tx,
            rx,
            refresh_seq: 0,
            detail_seq: 0,
            in_flight: 0,
            shown_trigger: None,
        }
    }

    pub fn handle(&self) -> DashboardHandle {
        DashboardHandle::new(self.tx.clone())
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn supervisor(&self) -> &TaskSupervisor {
        &self.supervisor
    }

    pub fn records(&self) -> &[RecordSummary] {
        &self.records
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0 || !self.supervisor.is_idle()
    }

    pub fn start(&mut self) {
        self.state.pending_record_id = self.surface.location().record();
        if let Some(pending) = &self.state.pending_record_id {
            log::info!("Location asks for record {pending}");
        }
        self.sync_trigger();
        self.refresh(None, false);
    }

    pub async fn run(&mut self) {
        while let Some(message) = self.rx.recv().await {
            if self.dispatch(message).is_break() {
                break;
            }
        }
    }

    /// Processes messages until nothing is queued or outstanding. Returns
    /// `false` if a `Shutdown` was seen.
    pub async fn run_until_idle(&mut self) -> bool {
        loop {
            while let Ok(message) = self.rx.try_recv() {
                if self.dispatch(message).is_break() {
                    return false;
                }
            }
            if !self.is_busy() {
                return true;
            }
            match self.rx.recv().await {
                Some(message) => {
                    if self.dispatch(message).is_break() {
                        return false;
                    }
                }
                None => return true,
            }
        }
    }

    fn dispatch(&mut self, message: Message) -> ControlFlow<()> {
        match message {
            Message::Refresh { preferred, force } => self.refresh(preferred, force),
            Message::RecordsLoaded {
                seq,
                preferred,
                force,
                result,
            } => self.on_records_loaded(seq, preferred, force, result),
            Message::ActivateRecord(id) => self.activate(id),
            Message::DetailLoaded {
                seq,
                record_id,
                result,
            } => self.on_detail_loaded(seq, record_id, result),
            Message::StartGame => self.start_game(),
            Message::Task(message) => {
                if let Some(outcome) = self.supervisor.handle(message) {
                    self.on_task_outcome(outcome);
                }
                self.sync_trigger();
            }
            Message::Shutdown => {
                log::info!("Shutting down dashboard");
                self.supervisor.cancel();
                self.sync_trigger();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn refresh(&mut self, preferred: Option<RecordId>, force: bool) {
        self.refresh_seq += 1;
        let seq = self.refresh_seq;
        self.in_flight += 1;

        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.list_records().await;
            let _ = tx.send(Message::RecordsLoaded {
                seq,
                preferred,
                force,
                result,
            });
        });
    }

    fn on_records_loaded(
        &mut self,
        seq: u64,
        preferred: Option<RecordId>,
        force: bool,
        result: Result<RecordsPage, RequestError>,
    ) {
        self.in_flight -= 1;
        if seq != self.refresh_seq {
            log::debug!("Dropping superseded record listing #{seq}");
            return;
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                log::warn!("Refresh failed: {e}");
                self.notify(&DashboardError::ListFetch(e));
                return;
            }
        };
        log::info!("Loaded {} records", page.records.len());

        self.surface.show_summary(renderer::summary_cards(&page.summary));

        let request = SelectionRequest::refresh(
            preferred.or_else(|| self.state.pending_record_id.clone()),
            force,
        );
        let outcome = reconcile(&mut self.state, &page.records, request);
        self.records = page.records;

        if let Some(missing) = outcome.missing_preferred {
            self.notify(&DashboardError::NotFound(missing));
        }
        self.surface.show_list(renderer::record_list(
            &self.records,
            self.state.active_record_id.as_ref(),
        ));
        self.apply_selection(outcome.selection);
    }

    fn activate(&mut self, id: RecordId) {
        if !self.state.knows(&id) {
            self.notify(&DashboardError::NotFound(id));
            return;
        }
        let outcome = reconcile(&mut self.state, &self.records, SelectionRequest::explicit(id));
        self.apply_selection(outcome.selection);
    }

    fn apply_selection(&mut self, selection: Selection) {
        match selection {
            Selection::Empty => {
                self.surface.set_active_card(None);
                self.surface.show_detail(renderer::empty_detail());
                self.sync_location(None);
            }
            Selection::Unchanged(id) => self.sync_location(Some(&id)),
            Selection::Activated(id) => {
                self.surface.set_active_card(Some(&id));
                self.sync_location(Some(&id));
                self.load_detail(id);
            }
        }
    }

    fn sync_location(&mut self, record: Option<&RecordId>) {
        let next = self.surface.location().with_record(record);
        if &next != self.surface.location() {
            self.surface.replace_location(next);
        }
    }

    fn load_detail(&mut self, record_id: RecordId) {
        self.detail_seq += 1;
        let seq = self.detail_seq;
        self.in_flight += 1;
        self.surface.show_detail(DetailPanel::Loading(record_id.clone()));

        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.record_detail(&record_id).await;
            let _ = tx.send(Message::DetailLoaded {
                seq,
                record_id,
                result,
            });
        });
    }

    fn on_detail_loaded(
        &mut self,
        seq: u64,
        record_id: RecordId,
        result: Result<RecordDetail, RequestError>,
    ) {
        self.in_flight -= 1;
        // Only the newest request for the record still active may render.
        if seq != self.detail_seq || !self.state.is_active(&record_id) {
            log::debug!("Dropping stale detail for {record_id}");
            return;
        }

        match result {
            Ok(detail) => {
                self.surface
                    .show_detail(renderer::detail_panel(&record_id, &detail));
            }
            Err(source) => {
                let error = DashboardError::DetailFetch {
                    id: record_id.clone(),
                    source,
                };
                self.surface.show_detail(DetailPanel::Unavailable {
                    record_id,
                    message: error.to_string(),
                });
                self.notify(&error);
            }
        }
    }

    fn start_game(&mut self) {
        match self.supervisor.submit() {
            Ok(()) => log::info!("Submitting a new game run"),
            // The trigger is disabled in this state; a stray press is ignored.
            Err(busy) => log::info!("Ignoring start request: {busy}"),
        }
        self.sync_trigger();
    }

    fn on_task_outcome(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Started(task_id) => log::debug!("Polling game run {task_id}"),
            TaskOutcome::Finished { task_id, record_id } => {
                let message = match &record_id {
                    Some(id) => format!("Game finished, showing record {id}"),
                    None => format!("Game run {task_id} finished"),
                };
                self.surface.toast(Toast::success(message));
                if record_id.is_some() {
                    self.state.pending_record_id = record_id.clone();
                }
                self.refresh(record_id, true);
            }
            TaskOutcome::Failed(error) => self.notify(&error),
        }
    }

    fn sync_trigger(&mut self) {
        let trigger = renderer::trigger_view(self.supervisor.phase());
        if self.shown_trigger != Some(trigger) {
            self.shown_trigger = Some(trigger);
            self.surface.show_trigger(trigger);
        }
    }

    fn notify(&mut self, error: &DashboardError) {
        self.surface.toast(Toast::from(error));
    }
}
