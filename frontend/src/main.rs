mod api;
mod storage;
mod components {
    pub mod header;
    pub mod history;
    pub mod input_section;
    pub mod results;
    pub mod training_info;
    pub mod utils;
}

use components::header::render_header;
use components::history::render_history;
use components::input_section::render_input_section;
use components::results::render_results;
use components::training_info::TrainingInfoPanel;
use components::utils::render_error_message;
use gloo_file::File as GlooFile;
use shared::{
    ClientError, DisplayBundle, KeyValueStore, PredictResponse, RequestTicket, RequestTracker,
    SessionAssembler, SessionId,
};
use storage::BrowserStore;
use wasm_bindgen_futures::spawn_local;
use web_sys::DragEvent;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputTab {
    Text,
    File,
}

enum Msg {
    // Input
    SwitchTab(InputTab),
    SetText(String),
    FileSelected(Option<GlooFile>),
    SetDragging(bool),
    HandleDrop(DragEvent),

    // Classification
    Submit,
    PredictionResult(RequestTicket, Option<String>, Result<PredictResponse, ClientError>),

    // History
    ReplaySession(SessionId),
    DeleteSession(SessionId),
    ClearHistory,

    // UI states
    ToggleTrainingInfo,
    SetError(Option<String>),
}

struct Model {
    assembler: SessionAssembler<BrowserStore>,
    tracker: RequestTracker,
    tab: InputTab,
    text: String,
    file: Option<GlooFile>,
    bundle: Option<DisplayBundle>,
    loading: bool,
    error: Option<String>,
    is_dragging: bool,
    show_training_info: bool,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let assembler = SessionAssembler::open(BrowserStore);
        log::info!("Loaded {} sessions from history", assembler.history().len());

        Self {
            assembler,
            tracker: RequestTracker::new(),
            tab: InputTab::Text,
            text: String::new(),
            file: None,
            bundle: None,
            loading: false,
            error: None,
            is_dragging: false,
            show_training_info: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SwitchTab(tab) => self.handle_switch_tab(tab),
            Msg::SetText(text) => {
                self.text = text;
                false
            }
            Msg::FileSelected(file) => self.handle_file_selected(file),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => self.handle_drop(event),

            Msg::Submit => match self.tab {
                InputTab::Text => self.handle_submit_text(ctx),
                InputTab::File => self.handle_submit_file(ctx),
            },
            Msg::PredictionResult(ticket, submitted, result) => {
                self.handle_prediction_result(ticket, submitted, result)
            }

            Msg::ReplaySession(id) => self.handle_replay(id),
            Msg::DeleteSession(id) => self.handle_delete(id),
            Msg::ClearHistory => self.handle_clear_history(),

            Msg::ToggleTrainingInfo => {
                self.show_training_info = !self.show_training_info;
                true
            }
            Msg::SetError(error) => {
                self.error = error;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { render_input_section(self, ctx) }
                    { render_error_message(self) }
                    { render_results(self) }
                    { render_history(self, ctx) }

                    <section class="training-info-section">
                        <button class="secondary-btn" onclick={link.callback(|_| Msg::ToggleTrainingInfo)}>
                            { if self.show_training_info { "Hide training details" } else { "Show training details" } }
                        </button>
                        if self.show_training_info {
                            <TrainingInfoPanel />
                        }
                    </section>
                </main>

                <footer class="app-footer">
                    <p>{"Naive Bayes, SVM and Random Forest side by side | Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

// Handler methods
impl Model {
    fn handle_switch_tab(&mut self, tab: InputTab) -> bool {
        if self.tab == tab {
            return false;
        }
        self.tab = tab;
        self.error = None;
        true
    }

    fn handle_file_selected(&mut self, file: Option<GlooFile>) -> bool {
        match file {
            Some(file) if is_supported_file(&file.name()) => {
                self.file = Some(file);
                self.error = None;
            }
            Some(file) => {
                log::warn!("Rejected unsupported file: {}", file.name());
                self.file = None;
                self.error = Some(format!(
                    "Unsupported file type: {}. Use .txt, .csv, .json or .pdf.",
                    file.name()
                ));
            }
            None => self.file = None,
        }
        true
    }

    fn handle_drop(&mut self, event: DragEvent) -> bool {
        event.prevent_default();
        self.is_dragging = false;

        let dropped = event
            .data_transfer()
            .and_then(|data_transfer| data_transfer.files())
            .and_then(|file_list| file_list.item(0))
            .map(GlooFile::from);
        if dropped.is_some() {
            self.tab = InputTab::File;
        }
        self.handle_file_selected(dropped)
    }

    fn handle_submit_text(&mut self, ctx: &Context<Self>) -> bool {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            self.error = Some("Please enter some text to classify.".into());
            return true;
        }

        let ticket = self.begin_request();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api::predict(text.clone()).await;
            link.send_message(Msg::PredictionResult(ticket, Some(text), result));
        });
        true
    }

    fn handle_submit_file(&mut self, ctx: &Context<Self>) -> bool {
        let Some(file) = self.file.clone() else {
            self.error = Some("Please select a file to classify.".into());
            return true;
        };

        let ticket = self.begin_request();
        let link = ctx.link().clone();
        spawn_local(async move {
            let result = api::upload(file).await;
            link.send_message(Msg::PredictionResult(ticket, None, result));
        });
        true
    }

    fn begin_request(&mut self) -> RequestTicket {
        self.loading = true;
        self.error = None;
        self.tracker.begin()
    }

    fn handle_prediction_result(
        &mut self,
        ticket: RequestTicket,
        submitted: Option<String>,
        result: Result<PredictResponse, ClientError>,
    ) -> bool {
        if !self.tracker.is_current(ticket) {
            log::debug!("Dropping response for superseded request {:?}", ticket);
            return false;
        }
        self.loading = false;

        let outcome = result.and_then(|response| self.assembler.submit(&response, submitted.as_deref()));
        match outcome {
            Ok(bundle) => {
                log::info!("Session {}: {}", bundle.session.id, bundle.agreement);
                self.bundle = Some(bundle);
            }
            Err(e) => {
                log::error!("Classification failed: {}", e);
                self.error = Some(e.user_message());
            }
        }
        true
    }

    fn handle_replay(&mut self, id: SessionId) -> bool {
        match self.assembler.replay(id) {
            Some(bundle) => {
                self.bundle = Some(bundle);
                self.error = None;
            }
            None => self.error = Some(format!("Session {} is no longer in history.", id)),
        }
        true
    }

    fn handle_delete(&mut self, id: SessionId) -> bool {
        if let Err(e) = self.assembler.history_mut().remove(id) {
            log::warn!("Deleting session {} was not saved: {}", id, e);
            self.error = Some(e.user_message());
        }
        true
    }

    fn handle_clear_history(&mut self) -> bool {
        let confirmed = web_sys::window()
            .and_then(|window| window.confirm_with_message(CLEAR_HISTORY_PROMPT).ok())
            .unwrap_or(false);
        match clear_history_if(&mut self.assembler, confirmed) {
            Ok(cleared) => cleared,
            Err(e) => {
                log::warn!("Clearing history was not saved: {}", e);
                self.error = Some(e.user_message());
                true
            }
        }
    }
}

const CLEAR_HISTORY_PROMPT: &str = "Are you sure you want to delete the entire history?";

/// Clears history only once the user has confirmed. Returns whether anything was cleared.
fn clear_history_if<S: KeyValueStore>(
    assembler: &mut SessionAssembler<S>,
    confirmed: bool,
) -> Result<bool, ClientError> {
    if !confirmed {
        log::debug!("History clear cancelled");
        return Ok(false);
    }
    assembler.history_mut().clear()?;
    Ok(true)
}

fn is_supported_file(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    [".txt", ".csv", ".json", ".pdf"]
        .iter()
        .any(|extension| name.ends_with(extension))
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Starting text classification client");
    yew::Renderer::<Model>::new().render();
}

#[cfg(test)]
mod tests {
    use super::{clear_history_if, is_supported_file};
    use shared::{MemoryStore, PredictResponse, SessionAssembler};

    fn assembler_with_one_session() -> SessionAssembler<MemoryStore> {
        let response: PredictResponse = serde_json::from_str(
            r#"{"results": {
                "naive_bayes": {"prediction": "Sport", "confidence": 0.8},
                "svm": {"prediction": "Sport", "confidence": 0.6},
                "random_forest": {"prediction": "Sport", "confidence": 0.9}}}"#,
        )
        .unwrap();
        let mut assembler = SessionAssembler::open(MemoryStore::new());
        assembler.submit(&response, Some("match report")).unwrap();
        assembler
    }

    #[test]
    fn declined_clear_keeps_history() {
        let mut assembler = assembler_with_one_session();
        assert!(!clear_history_if(&mut assembler, false).unwrap());
        assert_eq!(assembler.history().len(), 1);
    }

    #[test]
    fn confirmed_clear_empties_history() {
        let mut assembler = assembler_with_one_session();
        assert!(clear_history_if(&mut assembler, true).unwrap());
        assert!(assembler.history().is_empty());
    }

    #[test]
    fn upload_accepts_document_extensions_only() {
        assert!(is_supported_file("notes.TXT"));
        assert!(is_supported_file("report.pdf"));
        assert!(is_supported_file("rows.csv"));
        assert!(!is_supported_file("photo.png"));
        assert!(!is_supported_file("archive.json.gz"));
    }
}
