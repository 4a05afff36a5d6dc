use log::{debug, info, warn};

use crate::classifier::error::{ENTER_IMAGE_URL, SELECT_IMAGE_FILE};
use crate::classifier::{ClassificationResult, Classify, ClassifyError};
use crate::config::{InputMode, EXAMPLE_IMAGE_URL};
use crate::source::{ImageFile, ImageSource};

/// What the user currently sees. At most one outcome is visible at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(ClassificationResult),
    Failed(ClassifyError),
}

/// Input tab shown in [`InputMode::Tabbed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    File,
    Url,
}

/// Identifies one request. Completions carrying an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Holds the state of one upload form and drives requests through a [`Classify`] implementation.
#[derive(Debug)]
pub struct Session<C> {
    client: C,
    mode: InputMode,
    tab: Tab,
    selected_file: Option<ImageFile>,
    url_text: String,
    preview: Option<String>,
    state: RequestState,
    generation: u64,
}

impl<C: Classify> Session<C> {
    pub fn new(client: C, mode: InputMode) -> Self {
        let tab = match mode {
            InputMode::UrlOnly => Tab::Url,
            InputMode::FileOnly | InputMode::Tabbed => Tab::File,
        };
        Self {
            client,
            mode,
            tab,
            selected_file: None,
            url_text: String::new(),
            preview: None,
            state: RequestState::Idle,
            generation: 0,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// True while a request is outstanding; resubmission should be disabled
    pub fn is_busy(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn url_text(&self) -> &str {
        &self.url_text
    }

    pub fn selected_file(&self) -> Option<&ImageFile> {
        self.selected_file.as_ref()
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match &self.state {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClassifyError> {
        match &self.state {
            RequestState::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn allows(&self, tab: Tab) -> bool {
        match (self.mode, tab) {
            (InputMode::Tabbed, _) => true,
            (InputMode::FileOnly, Tab::File) | (InputMode::UrlOnly, Tab::Url) => true,
            _ => false,
        }
    }

    fn require(&self, tab: Tab) -> Result<(), ClassifyError> {
        if self.allows(tab) {
            return Ok(());
        }
        let message = match tab {
            Tab::File => "File upload is not available in this mode",
            Tab::Url => "Image URLs are not available in this mode",
        };
        Err(ClassifyError::InvalidInput(message.to_string()))
    }

    /// Switches the visible input tab, clearing any visible result or error
    pub fn switch_tab(&mut self, tab: Tab) -> Result<(), ClassifyError> {
        self.require(tab)?;
        if self.tab != tab {
            debug!("Switching to {:?} tab", tab);
            self.tab = tab;
            self.clear_outcome();
        }
        Ok(())
    }

    /// Stores an image file and previews it.
    ///
    /// Non-image files are rejected and leave everything as it was.
    pub fn select_file(&mut self, file: ImageFile) -> Result<(), ClassifyError> {
        self.require(Tab::File)?;
        file.ensure_image()?;

        info!("Selected {} ({})", file.name, file.mime_type);
        self.tab = Tab::File;
        self.preview = Some(file.to_data_url());
        self.selected_file = Some(file);
        self.clear_outcome();
        Ok(())
    }

    /// Updates the pending URL. A visible error is dismissed; a visible result is kept.
    pub fn set_url_text(&mut self, text: impl Into<String>) {
        self.url_text = text.into();
        if matches!(self.state, RequestState::Failed(_)) {
            self.state = RequestState::Idle;
        }
    }

    /// Classifies the image at `text`. Blank input fails without touching the network.
    pub async fn submit_url(&mut self, text: &str) -> Result<&RequestState, ClassifyError> {
        self.require(Tab::Url)?;
        let address = text.trim();
        if address.is_empty() {
            return Err(ClassifyError::InvalidInput(ENTER_IMAGE_URL.to_string()));
        }

        self.tab = Tab::Url;
        self.url_text = text.to_string();
        self.preview = Some(address.to_string());
        Ok(self.run(ImageSource::Url(address.to_string())).await)
    }

    /// Classifies the file chosen with [`Session::select_file`]
    pub async fn submit_file(&mut self) -> Result<&RequestState, ClassifyError> {
        self.require(Tab::File)?;
        let file = self
            .selected_file
            .clone()
            .ok_or_else(|| ClassifyError::InvalidInput(SELECT_IMAGE_FILE.to_string()))?;
        Ok(self.run(ImageSource::File(file)).await)
    }

    /// Classifies the bundled sample image
    pub async fn submit_example(&mut self) -> Result<&RequestState, ClassifyError> {
        self.set_url_text(EXAMPLE_IMAGE_URL);
        self.submit_url(EXAMPLE_IMAGE_URL).await
    }

    /// Starts a new request: clears the visible outcome and supersedes any earlier ticket
    pub fn begin(&mut self) -> RequestTicket {
        self.generation += 1;
        self.state = RequestState::Loading;
        RequestTicket(self.generation)
    }

    /// Records the outcome of `ticket`'s request.
    ///
    /// Returns false (and changes nothing) when a newer request has started since.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<ClassificationResult, ClassifyError>,
    ) -> bool {
        if ticket.0 != self.generation {
            warn!(
                "Discarding result of superseded request {} (current is {})",
                ticket.0, self.generation
            );
            return false;
        }
        self.state = match outcome {
            Ok(result) => RequestState::Succeeded(result),
            Err(err) => RequestState::Failed(err),
        };
        true
    }

    async fn run(&mut self, source: ImageSource) -> &RequestState {
        let ticket = self.begin();
        let outcome = self.client.classify(&source).await;
        self.complete(ticket, outcome);
        &self.state
    }

    fn clear_outcome(&mut self) {
        if !self.is_busy() {
            self.state = RequestState::Idle;
        }
    }
}
