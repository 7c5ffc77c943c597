// TUI application state
//
// Owns the three pages, the backend handle, and the UI-only state (current
// view, selection, search mode, toast). Backend calls run on spawned tasks
// and come back as `Outcome` messages, so the event loop never blocks on the
// network.

use super::components::Toast;
use super::theme::Theme;
use crate::api::{ApiError, FarmApi};
use crate::farm::feed::PendingConsumption;
use crate::farm::{
    today, FeedConsumptionRecord, FeedForm, FeedInventoryItem, FeedPage, FieldKind, Flock,
    FlockPage, FormState, Notice, SalesPage,
};
use crate::logging::ActivityLog;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Capacity of the outcome channel
const OUTCOME_BUFFER: usize = 64;

const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Flocks,
    Feed,
    Sales,
}

impl View {
    pub const ALL: [View; 3] = [View::Flocks, View::Feed, View::Sales];

    pub fn name(&self) -> &'static str {
        match self {
            View::Flocks => "Flocks",
            View::Feed => "Feed",
            View::Sales => "Sales",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Flocks => 0,
            View::Feed => 1,
            View::Sales => 2,
        }
    }
}

/// The form currently shown in the form panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenForm {
    CreateFlock,
    AddFeed,
    RecordConsumption,
    RecordSale,
}

impl OpenForm {
    pub fn title(&self) -> &'static str {
        match self {
            OpenForm::CreateFlock => "New flock",
            OpenForm::AddFeed => "Add feed",
            OpenForm::RecordConsumption => "Record consumption",
            OpenForm::RecordSale => "New sale",
        }
    }
}

/// Result of a spawned backend call
#[derive(Debug)]
pub enum Outcome {
    FlocksLoaded(Result<Vec<Flock>, ApiError>),
    InventoryLoaded(Result<Vec<FeedInventoryItem>, ApiError>),
    ConsumptionLoaded(Result<Vec<FeedConsumptionRecord>, ApiError>),
    FlockCreated(Result<Flock, ApiError>),
    FeedAdded(Result<FeedInventoryItem, ApiError>),
    ConsumptionRecorded(PendingConsumption, Result<FeedConsumptionRecord, ApiError>),
}

pub struct App {
    pub view: View,
    pub flocks: FlockPage,
    pub feed: FeedPage,
    pub sales: SalesPage,

    /// Row selected in the (filtered) flock table
    pub flock_selected: usize,
    /// Typing goes to the flock search box
    pub searching: bool,

    pub toast: Option<Toast>,
    pub theme: Theme,
    pub activity: ActivityLog,
    /// Shown in the status bar
    pub backend_label: String,
    pub should_quit: bool,

    /// Backend calls in flight
    pub pending: usize,
    spinner_frame: usize,
    pub start_time: Instant,

    api: Arc<dyn FarmApi>,
    outcome_tx: mpsc::Sender<Outcome>,
}

impl App {
    /// Build the app and the receiver its spawned calls report to
    pub fn new(
        api: Arc<dyn FarmApi>,
        sales: SalesPage,
        theme: Theme,
        activity: ActivityLog,
        backend_label: impl Into<String>,
    ) -> (Self, mpsc::Receiver<Outcome>) {
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_BUFFER);
        let app = Self {
            view: View::default(),
            flocks: FlockPage::new(),
            feed: FeedPage::new(),
            sales,
            flock_selected: 0,
            searching: false,
            toast: None,
            theme,
            activity,
            backend_label: backend_label.into(),
            should_quit: false,
            pending: 0,
            spinner_frame: 0,
            start_time: Instant::now(),
            api,
            outcome_tx,
        };
        (app, outcome_rx)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Views and shell state
    // ─────────────────────────────────────────────────────────────────────────

    /// Switch tabs; any open form is hidden with its values kept
    pub fn set_view(&mut self, view: View) {
        if self.view == view {
            return;
        }
        self.flocks.form_open = false;
        self.feed.open_form = None;
        self.sales.form_open = false;
        self.searching = false;
        self.view = view;
    }

    pub fn show_notice(&mut self, notice: Notice) {
        self.toast = Some(Toast::new(notice));
    }

    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        self.clear_expired_toast();
    }

    pub fn spinner_char(&self) -> char {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }

    pub fn uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Flock selection and search
    // ─────────────────────────────────────────────────────────────────────────

    pub fn select_next_flock(&mut self) {
        let count = self.flocks.visible().len();
        if count > 0 {
            self.flock_selected = (self.flock_selected + 1).min(count - 1);
        }
    }

    pub fn select_prev_flock(&mut self) {
        self.flock_selected = self.flock_selected.saturating_sub(1);
    }

    /// Keep the selection inside the filtered list
    pub fn clamp_flock_selection(&mut self) {
        let count = self.flocks.visible().len();
        self.flock_selected = self.flock_selected.min(count.saturating_sub(1));
    }

    pub fn search_push(&mut self, c: char) {
        let mut query = self.flocks.search().to_string();
        query.push(c);
        self.flocks.set_search(query);
        self.clamp_flock_selection();
    }

    pub fn search_pop(&mut self) {
        let mut query = self.flocks.search().to_string();
        query.pop();
        self.flocks.set_search(query);
        self.clamp_flock_selection();
    }

    pub fn close_selected_flock(&mut self) {
        let Some(id) = self
            .flocks
            .visible()
            .get(self.flock_selected)
            .map(|f| f.id.clone())
        else {
            self.show_notice(Notice::info("Nothing selected", "There is no flock to close"));
            return;
        };
        let notice = self.flocks.close_flock(&id, today());
        self.show_notice(notice);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Forms
    // ─────────────────────────────────────────────────────────────────────────

    /// The form visible on the current view, if any
    pub fn open_form(&self) -> Option<OpenForm> {
        match self.view {
            View::Flocks => self.flocks.form_open.then_some(OpenForm::CreateFlock),
            View::Feed => self.feed.open_form.map(|f| match f {
                FeedForm::AddFeed => OpenForm::AddFeed,
                FeedForm::RecordConsumption => OpenForm::RecordConsumption,
            }),
            View::Sales => self.sales.form_open.then_some(OpenForm::RecordSale),
        }
    }

    pub fn form(&self, which: OpenForm) -> &FormState {
        match which {
            OpenForm::CreateFlock => &self.flocks.form,
            OpenForm::AddFeed => &self.feed.add_form,
            OpenForm::RecordConsumption => &self.feed.consumption_form,
            OpenForm::RecordSale => &self.sales.form,
        }
    }

    pub fn form_mut(&mut self, which: OpenForm) -> &mut FormState {
        match which {
            OpenForm::CreateFlock => &mut self.flocks.form,
            OpenForm::AddFeed => &mut self.feed.add_form,
            OpenForm::RecordConsumption => &mut self.feed.consumption_form,
            OpenForm::RecordSale => &mut self.sales.form,
        }
    }

    /// A request from this form is in flight
    pub fn form_busy(&self, which: OpenForm) -> bool {
        match which {
            OpenForm::CreateFlock => self.flocks.submitting,
            OpenForm::AddFeed => self.feed.adding,
            OpenForm::RecordConsumption => self.feed.recording,
            OpenForm::RecordSale => false,
        }
    }

    /// Options for a selectable field: static choices or live lookups
    pub fn field_options(&self, which: OpenForm, field: &str) -> Vec<String> {
        let Some(spec) = self.form(which).fields().iter().find(|f| f.name == field) else {
            return Vec::new();
        };
        match spec.kind {
            FieldKind::Choice(options) => options.iter().map(|o| o.to_string()).collect(),
            FieldKind::Lookup => match field {
                "flockId" => self.flocks.active_ids(),
                "feedType" => self.feed.stocked_feed_types(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Open (or close) a form on the current view
    pub fn toggle_form(&mut self, which: OpenForm) {
        match which {
            OpenForm::CreateFlock => self.flocks.toggle_form(),
            OpenForm::AddFeed => self.feed.toggle_form(FeedForm::AddFeed),
            OpenForm::RecordConsumption => self.feed.toggle_form(FeedForm::RecordConsumption),
            OpenForm::RecordSale => self.sales.toggle_form(),
        }
        if self.open_form() == Some(which) {
            self.prefill_lookups(which);
        }
    }

    /// Empty lookup fields start on their first option
    fn prefill_lookups(&mut self, which: OpenForm) {
        let lookups: Vec<(&'static str, String)> = self
            .form(which)
            .fields()
            .iter()
            .filter(|f| f.kind == FieldKind::Lookup && self.form(which).get(f.name).is_empty())
            .filter_map(|f| {
                self.field_options(which, f.name)
                    .into_iter()
                    .next()
                    .map(|first| (f.name, first))
            })
            .collect();
        for (name, value) in lookups {
            self.form_mut(which).set(name, value);
        }
    }

    /// ←/→ on the focused field
    pub fn cycle_focused(&mut self, which: OpenForm, forward: bool) {
        let Some(spec) = self.form(which).focused() else {
            return;
        };
        if !spec.kind.is_selectable() {
            return;
        }
        let options = self.field_options(which, spec.name);
        self.form_mut(which).cycle(&options, forward);
    }

    pub fn close_form(&mut self) {
        match self.view {
            View::Flocks => self.flocks.form_open = false,
            View::Feed => self.feed.open_form = None,
            View::Sales => self.sales.form_open = false,
        }
    }

    /// Validate locally, then hand the request to a background task
    pub fn submit_form(&mut self, which: OpenForm) {
        match which {
            OpenForm::CreateFlock => match self.flocks.prepare_create() {
                Ok(request) => {
                    self.flocks.submitting = true;
                    self.spawn(move |api| async move {
                        Outcome::FlockCreated(api.create_flock(&request).await)
                    });
                }
                Err(e) => self.show_notice(e.notice()),
            },
            OpenForm::AddFeed => match self.feed.prepare_add_feed() {
                Ok(request) => {
                    self.feed.adding = true;
                    self.spawn(move |api| async move {
                        Outcome::FeedAdded(api.add_feed(&request).await)
                    });
                }
                Err(e) => self.show_notice(e.notice()),
            },
            OpenForm::RecordConsumption => match self.feed.prepare_consumption() {
                Ok(pending) => {
                    self.feed.recording = true;
                    self.spawn(move |api| async move {
                        let result = api.record_consumption(&pending.request).await;
                        Outcome::ConsumptionRecorded(pending, result)
                    });
                }
                Err(e) => self.show_notice(e.notice()),
            },
            OpenForm::RecordSale => {
                let notice = self.sales.record_sale();
                self.show_notice(notice);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Backend calls
    // ─────────────────────────────────────────────────────────────────────────

    fn spawn<F, Fut>(&mut self, call: F)
    where
        F: FnOnce(Arc<dyn FarmApi>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Outcome> + Send + 'static,
    {
        self.pending += 1;
        let api = Arc::clone(&self.api);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = call(api).await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(outcome).await;
        });
    }

    pub fn load_flocks(&mut self) {
        self.spawn(|api| async move { Outcome::FlocksLoaded(api.list_flocks().await) });
    }

    pub fn load_feed(&mut self) {
        self.spawn(|api| async move { Outcome::InventoryLoaded(api.list_inventory().await) });
        self.spawn(|api| async move { Outcome::ConsumptionLoaded(api.list_consumption().await) });
    }

    pub fn load_all(&mut self) {
        self.load_flocks();
        self.load_feed();
    }

    /// `R`: refetch what the current view shows
    ///
    /// Refused while a save for that view is in flight: the fresh lists would
    /// already contain the saved record, and its late completion would apply
    /// it a second time.
    pub fn reload_current(&mut self) {
        let saving = match self.view {
            View::Flocks => self.flocks.submitting,
            View::Feed => self.flocks.submitting || self.feed.adding || self.feed.recording,
            View::Sales => false,
        };
        if saving {
            self.show_notice(Notice::info(
                "Please wait",
                "Reload once the pending save has finished",
            ));
            return;
        }
        match self.view {
            View::Flocks => self.load_flocks(),
            View::Feed => {
                // the consumption form's flock list comes from the flock page
                self.load_flocks();
                self.load_feed();
            }
            View::Sales => self.show_notice(Notice::info(
                "Nothing to reload",
                "Sales are kept on this machine only",
            )),
        }
    }

    /// Fold a finished backend call into page state
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        self.pending = self.pending.saturating_sub(1);
        match outcome {
            Outcome::FlocksLoaded(result) => {
                if let Err(e) = self.flocks.apply_loaded(result) {
                    self.show_notice(load_failed("flocks", &e));
                }
                self.clamp_flock_selection();
            }
            Outcome::InventoryLoaded(result) => {
                if let Err(e) = self.feed.apply_inventory(result) {
                    self.show_notice(load_failed("feed inventory", &e));
                }
            }
            Outcome::ConsumptionLoaded(result) => {
                if let Err(e) = self.feed.apply_consumption(result) {
                    self.show_notice(load_failed("feed consumption", &e));
                }
            }
            Outcome::FlockCreated(result) => {
                let notice = self.flocks.complete_create(result);
                self.show_notice(notice);
            }
            Outcome::FeedAdded(result) => {
                let notice = self.feed.complete_add_feed(result);
                self.show_notice(notice);
            }
            Outcome::ConsumptionRecorded(pending, result) => {
                let notice = self.feed.complete_consumption(pending, result);
                self.show_notice(notice);
            }
        }
    }
}

fn load_failed(what: &str, e: &ApiError) -> Notice {
    Notice::error("Load failed", format!("Could not load {}: {}", what, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FailingApi;
    use crate::demo::DemoFarmApi;
    use crate::farm::NoticeKind;

    fn app_with(api: impl FarmApi + 'static) -> (App, mpsc::Receiver<Outcome>) {
        App::new(
            Arc::new(api),
            SalesPage::new(),
            Theme::dark(),
            ActivityLog::new(),
            "test",
        )
    }

    /// Apply outcomes until nothing is in flight
    async fn settle(app: &mut App, rx: &mut mpsc::Receiver<Outcome>) {
        while app.pending > 0 {
            let outcome = rx.recv().await.expect("outcome channel closed");
            app.apply_outcome(outcome);
        }
    }

    #[tokio::test]
    async fn test_load_all_fills_pages() {
        let (mut app, mut rx) = app_with(DemoFarmApi::seeded());
        app.load_all();
        assert_eq!(app.pending, 3);
        settle(&mut app, &mut rx).await;

        assert_eq!(app.flocks.flocks().len(), 3);
        assert_eq!(app.feed.inventory().len(), 3);
        assert_eq!(app.feed.consumption().len(), 2);
        assert!(app.toast.is_none());
    }

    #[tokio::test]
    async fn test_load_failure_shows_error_toast() {
        let (mut app, mut rx) = app_with(FailingApi(ApiError::Network("refused".into())));
        app.load_flocks();
        settle(&mut app, &mut rx).await;

        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.notice.kind, NoticeKind::Error);
        assert!(app.flocks.flocks().is_empty());
    }

    #[tokio::test]
    async fn test_spawned_create_flock_round_trip() {
        let (mut app, mut rx) = app_with(DemoFarmApi::empty());
        app.toggle_form(OpenForm::CreateFlock);
        let form = app.form_mut(OpenForm::CreateFlock);
        form.set("quantity", "250");
        form.set("birdType", "Layer");
        form.set("startDate", "2025-02-01");

        app.submit_form(OpenForm::CreateFlock);
        assert!(app.form_busy(OpenForm::CreateFlock));
        settle(&mut app, &mut rx).await;

        assert_eq!(app.flocks.flocks().len(), 1);
        assert!(!app.form_busy(OpenForm::CreateFlock));
        assert_eq!(app.open_form(), None);
        assert_eq!(app.toast.as_ref().unwrap().notice.kind, NoticeKind::Success);
    }

    #[tokio::test]
    async fn test_consumption_form_prefills_lookups() {
        let (mut app, mut rx) = app_with(DemoFarmApi::seeded());
        app.load_all();
        settle(&mut app, &mut rx).await;
        app.set_view(View::Feed);

        app.toggle_form(OpenForm::RecordConsumption);

        let form = app.form(OpenForm::RecordConsumption);
        assert_eq!(form.get("flockId"), "FL001");
        assert_eq!(form.get("feedType"), "Starter feed");
        // closed flocks are not offered
        assert_eq!(
            app.field_options(OpenForm::RecordConsumption, "flockId"),
            ["FL001", "FL002"]
        );
    }

    #[test]
    fn test_switching_view_hides_form_but_keeps_values() {
        let (mut app, _rx) = app_with(DemoFarmApi::empty());
        app.toggle_form(OpenForm::CreateFlock);
        app.form_mut(OpenForm::CreateFlock).set("quantity", "42");

        app.set_view(View::Sales);
        app.set_view(View::Flocks);

        assert_eq!(app.open_form(), None);
        assert_eq!(app.form(OpenForm::CreateFlock).get("quantity"), "42");
    }

    #[test]
    fn test_search_clamps_selection() {
        let (mut app, _rx) = app_with(DemoFarmApi::empty());
        app.flocks
            .apply_loaded(Ok(vec![
                flock("FL001"),
                flock("FL002"),
                flock("FL003"),
            ]))
            .unwrap();
        app.flock_selected = 2;

        for c in "001".chars() {
            app.search_push(c);
        }
        assert_eq!(app.flocks.visible().len(), 1);
        assert_eq!(app.flock_selected, 0);

        app.close_selected_flock();
        assert!(!app.flocks.flocks()[0].is_active());
    }

    #[tokio::test]
    async fn test_reload_waits_for_pending_consumption() {
        let (mut app, mut rx) = app_with(DemoFarmApi::seeded());
        app.load_all();
        settle(&mut app, &mut rx).await;
        app.set_view(View::Feed);

        app.toggle_form(OpenForm::RecordConsumption);
        let form = app.form_mut(OpenForm::RecordConsumption);
        form.set("flockId", "FL001");
        form.set("feedType", "Starter feed");
        form.set("quantity", "50");
        form.set("date", "2025-01-25");
        app.submit_form(OpenForm::RecordConsumption);
        assert_eq!(app.pending, 1);

        app.reload_current();
        assert_eq!(app.pending, 1, "no reload while the consumption is in flight");
        assert_eq!(app.toast.as_ref().unwrap().notice.title, "Please wait");

        settle(&mut app, &mut rx).await;
        let starter = |app: &App| {
            app.feed
                .inventory()
                .iter()
                .find(|i| i.id == "F001")
                .map(|i| i.available_quantity)
        };
        assert_eq!(starter(&app), Some(200.0));
        assert_eq!(app.feed.consumption().len(), 3);

        // once settled, a reload agrees with the local state
        app.reload_current();
        settle(&mut app, &mut rx).await;
        assert_eq!(starter(&app), Some(200.0));
        assert_eq!(app.feed.consumption().len(), 3);
    }

    fn flock(id: &str) -> Flock {
        Flock {
            id: id.to_string(),
            bird_type: "Broiler".to_string(),
            start_date: "2025-01-01".to_string(),
            initial_quantity: 10,
            current_quantity: 10,
            status: crate::farm::FlockStatus::Active,
            closed_date: None,
        }
    }
}
