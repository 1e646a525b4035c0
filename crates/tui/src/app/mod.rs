use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};
use registration::{
    Action, Begin, ClientError, Completion, Coordinator, FirmField, Form, ImageFile,
    Notification, NotificationLevel, RegistrationAccepted, RegistrationClient, Route,
};
use tokio::sync::mpsc;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

const TOAST_TTL: Duration = Duration::from_secs(4);

type SubmitResult = std::result::Result<RegistrationAccepted, ClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Register,
    ThankYou,
}

impl From<Route> for Screen {
    fn from(route: Route) -> Self {
        match route {
            Route::Register => Self::Register,
            Route::ThankYou => Self::ThankYou,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Name,
    Mobile,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Firm(FirmField),
    Row(usize, RowField),
}

impl Focus {
    pub fn row(self) -> Option<usize> {
        match self {
            Self::Row(index, _) => Some(index),
            Self::Firm(_) => None,
        }
    }
}

/// Every focusable field, in Tab order.
fn focus_ring(rows: usize) -> Vec<Focus> {
    let mut ring = vec![
        Focus::Firm(FirmField::Name),
        Focus::Firm(FirmField::BrandName),
        Focus::Firm(FirmField::Email),
    ];
    for index in 0..rows {
        ring.push(Focus::Row(index, RowField::Name));
        ring.push(Focus::Row(index, RowField::Mobile));
        ring.push(Focus::Row(index, RowField::Image));
    }
    ring
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
    pub expires_at: Instant,
}

impl ToastState {
    fn new(level: ToastLevel, title: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, "Error", message)
    }

    fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, "Info", message)
    }
}

impl From<&Notification> for ToastState {
    fn from(notification: &Notification) -> Self {
        let level = match notification.level {
            NotificationLevel::Success => ToastLevel::Success,
            NotificationLevel::Error => ToastLevel::Error,
        };
        Self::new(level, &notification.title, notification.description.clone())
    }
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub form: Form,
    pub focus: Focus,
    /// Typed file paths, one per representative row.
    pub image_paths: Vec<String>,
    pub coordinator: Coordinator,
    pub toast: Option<ToastState>,
    /// Server message of the last accepted registration.
    pub confirmation: Option<String>,
    pub base_url: String,
}

impl AppState {
    pub(crate) fn new(base_url: String) -> Self {
        let form = Form::new();
        let rows = form.state.representatives.len();
        Self {
            screen: Screen::Register,
            form,
            focus: Focus::Firm(FirmField::Name),
            image_paths: vec![String::new(); rows],
            coordinator: Coordinator::new(),
            toast: None,
            confirmation: None,
            base_url,
        }
    }

    /// Current text of a focusable field.
    pub fn field_value(&self, focus: Focus) -> String {
        match focus {
            Focus::Firm(field) => self.form.state.firm.get(field).to_string(),
            Focus::Row(index, RowField::Name) => self
                .form
                .state
                .representatives
                .get(index)
                .map(|rep| rep.name.clone())
                .unwrap_or_default(),
            Focus::Row(index, RowField::Mobile) => self
                .form
                .state
                .representatives
                .get(index)
                .and_then(|rep| rep.mobile.clone())
                .unwrap_or_default(),
            Focus::Row(index, RowField::Image) => {
                self.image_paths.get(index).cloned().unwrap_or_default()
            }
        }
    }

    fn set_field_value(&mut self, focus: Focus, value: String) {
        match focus {
            Focus::Firm(field) => self.form.dispatch(Action::SetFirmField(field, value)),
            Focus::Row(index, RowField::Name) => {
                self.form.dispatch(Action::SetRepresentativeName(index, value))
            }
            Focus::Row(index, RowField::Mobile) => self
                .form
                .dispatch(Action::SetRepresentativeMobile(index, Some(value))),
            Focus::Row(index, RowField::Image) => {
                let Some(path) = self.image_paths.get_mut(index) else {
                    return;
                };
                if *path == value {
                    return;
                }
                *path = value;
                // The attached file no longer matches the typed path.
                let attached = self
                    .form
                    .state
                    .representatives
                    .get(index)
                    .is_some_and(|rep| rep.image.is_some());
                if attached {
                    self.form.dispatch(Action::ClearRepresentativeImage(index));
                }
            }
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let ring = focus_ring(self.form.state.representatives.len());
        let position = ring.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (position + 1) % ring.len()
        } else {
            (position + ring.len() - 1) % ring.len()
        };
        self.focus = ring[next];
    }

    fn add_representative(&mut self) {
        self.form.dispatch(Action::AddRepresentative);
        self.image_paths.push(String::new());
        let last = self.form.state.representatives.len() - 1;
        self.focus = Focus::Row(last, RowField::Name);
    }

    fn remove_focused_representative(&mut self) {
        let Some(index) = self.focus.row() else {
            return;
        };
        let before = self.form.state.representatives.len();
        self.form.dispatch(Action::RemoveRepresentative(index));
        let after = self.form.state.representatives.len();
        if after == before {
            self.toast = Some(ToastState::info("At least one representative is required."));
            return;
        }

        if index < self.image_paths.len() {
            self.image_paths.remove(index);
        }
        self.focus = Focus::Row(index.min(after - 1), RowField::Name);
    }

    fn attach_image(&mut self, index: usize) {
        let path = self
            .image_paths
            .get(index)
            .map(|p| p.trim().to_string())
            .unwrap_or_default();

        match ImageFile::load(&path) {
            Ok(image) => {
                tracing::info!("attached {image:?} to representative {index}");
                self.form
                    .dispatch(Action::SetRepresentativeImage(index, image));
            }
            Err(err) => {
                tracing::warn!("image attach failed: {err}");
                self.toast = Some(ToastState::error(err.to_string()));
            }
        }
    }

    fn start_over(&mut self) {
        *self = Self::new(std::mem::take(&mut self.base_url));
    }
}

pub struct App {
    client: RegistrationClient,
    pub state: AppState,
    results_tx: mpsc::UnboundedSender<SubmitResult>,
    results_rx: mpsc::UnboundedReceiver<SubmitResult>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = RegistrationClient::new(&config.base_url)?;
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        Ok(Self {
            client,
            state: AppState::new(config.base_url),
            results_tx,
            results_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            while let Ok(result) = self.results_rx.try_recv() {
                self.complete(result);
            }

            if let Some(toast) = &self.state.toast {
                if toast.expires_at <= Instant::now() {
                    self.state.toast = None;
                }
            }

            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        match self.state.screen {
            Screen::Register => self.handle_register_key(action),
            Screen::ThankYou => {
                if action == AppAction::Submit {
                    self.state.start_over();
                }
            }
        }
    }

    fn handle_register_key(&mut self, action: AppAction) {
        let focus = self.state.focus;
        match action {
            AppAction::NextField => self.state.move_focus(true),
            AppAction::PrevField => self.state.move_focus(false),
            AppAction::AddRow => self.state.add_representative(),
            AppAction::RemoveRow => self.state.remove_focused_representative(),
            AppAction::Backspace => {
                let mut value = self.state.field_value(focus);
                if value.pop().is_some() {
                    self.state.set_field_value(focus, value);
                }
            }
            AppAction::Input(ch) => {
                let mut value = self.state.field_value(focus);
                value.push(ch);
                self.state.set_field_value(focus, value);
            }
            AppAction::Submit => match focus {
                Focus::Row(index, RowField::Image)
                    if !self.state.field_value(focus).trim().is_empty() =>
                {
                    self.state.attach_image(index)
                }
                _ => self.submit(),
            },
            AppAction::Quit | AppAction::None => {}
        }
    }

    fn submit(&mut self) {
        match self.state.coordinator.begin(&self.state.form.state) {
            Begin::Busy => {}
            Begin::Invalid(errors) => {
                self.state.form.errors = errors;
            }
            Begin::Dispatch { errors, payload } => {
                self.state.form.errors = errors;
                let client = self.client.clone();
                let tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let result = client.register(payload).await;
                    if tx.send(result).is_err() {
                        tracing::warn!("registration finished after the form closed");
                    }
                });
            }
        }
    }

    fn complete(&mut self, result: SubmitResult) {
        let Completion {
            notification,
            navigate,
        } = self.state.coordinator.finish(result);

        self.state.toast = Some(ToastState::from(&notification));
        if let Some(route) = navigate {
            self.state.screen = Screen::from(route);
            if route == Route::ThankYou {
                self.state.confirmation = Some(notification.description);
                self.state.form.reset();
                self.state.image_paths = vec![String::new(); 1];
                self.state.focus = Focus::Firm(FirmField::Name);
            }
        }
    }
}
