//! Event-driven runtime around a [`RegistrationForm`]
//!
//! All form mutation happens on the task that drives [`FormRuntime::handle`].
//! Network requests and the countdown run on spawned tasks and report back as
//! [`FormEvent`]s through the runtime's channel.

use crate::api::AuthApi;
use crate::config::IntakeConfig;
use crate::state::{
    run_send_request, ConsentItem, FocusTarget, FormView, GroupBlur, RegistrationForm,
    SendApplied, SendOutcome, TextField,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Everything that can happen to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Input { field: TextField, value: String },
    Check { item: ConsentItem, checked: bool },
    ToggleAll,
    Blur(TextField),
    /// A checkbox inside the consent group lost focus
    ConsentBlur(FocusTarget),
    SendCode,
    SendFinished(SendOutcome),
    Tick { generation: u64 },
    VerificationResult { success: bool, completed: bool },
}

/// Host capability: where is focus right now relative to the consent group?
pub trait FocusProbe: Send + Sync {
    fn consent_focus(&self) -> FocusTarget;
}

/// 1 Hz countdown feeding `Tick` events for one dispatch generation
#[derive(Debug)]
pub struct CountdownTicker {
    period: Duration,
    handle: Option<JoinHandle<()>>,
    generation: Option<u64>,
}

impl CountdownTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
            generation: None,
        }
    }

    /// Restart the countdown for `generation`, replacing any running one
    pub fn start(&mut self, generation: u64, ticks: u32, tx: UnboundedSender<FormEvent>) {
        self.stop();
        let period = self.period;
        self.generation = Some(generation);
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;
            for _ in 0..ticks {
                interval.tick().await;
                if tx.send(FormEvent::Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Abort the running countdown, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation = None;
    }

    /// Whether a countdown task is still alive
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Generation the current countdown ticks for
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }
}

impl Default for CountdownTicker {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Owns the form and the tasks working on its behalf
pub struct FormRuntime {
    form: RegistrationForm,
    api: Arc<dyn AuthApi>,
    probe: Option<Arc<dyn FocusProbe>>,
    ticker: CountdownTicker,
    tx: UnboundedSender<FormEvent>,
}

impl FormRuntime {
    /// Create a runtime and the receiving end of its event channel
    pub fn new(config: &IntakeConfig, api: Arc<dyn AuthApi>) -> (Self, UnboundedReceiver<FormEvent>) {
        let (tx, rx) = unbounded_channel();
        let runtime = Self {
            form: RegistrationForm::new(config),
            api,
            probe: None,
            ticker: CountdownTicker::default(),
            tx,
        };
        (runtime, rx)
    }

    pub fn with_focus_probe(mut self, probe: Arc<dyn FocusProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.ticker = CountdownTicker::new(period);
        self
    }

    /// Sender for hosts that feed events from elsewhere
    pub fn sender(&self) -> UnboundedSender<FormEvent> {
        self.tx.clone()
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    pub fn ticker(&self) -> &CountdownTicker {
        &self.ticker
    }

    pub fn view(&self) -> FormView {
        self.form.view()
    }

    /// Apply one event to the form
    pub async fn handle(&mut self, event: FormEvent) {
        tracing::trace!(?event, "handling form event");
        match event {
            FormEvent::Input { field, value } => self.form.set_value(field, value),
            FormEvent::Check { item, checked } => self.form.set_checked(item, checked),
            FormEvent::ToggleAll => self.form.toggle_all(),
            FormEvent::Blur(field) => {
                self.form.blur(field);
            }
            FormEvent::ConsentBlur(target) => self.consent_blur(target).await,
            FormEvent::SendCode => self.send_code(),
            FormEvent::SendFinished(outcome) => {
                if let SendApplied::CodeSent { generation } = self.form.finish_send_code(outcome) {
                    let ticks = self.form.verification().countdown_secs();
                    self.ticker.start(generation, ticks, self.tx.clone());
                }
            }
            FormEvent::Tick { generation } => {
                self.form.tick(generation);
            }
            FormEvent::VerificationResult { success, completed } => {
                self.form.on_verification_result(success, completed);
            }
        }
        self.sync_ticker();
    }

    async fn consent_blur(&mut self, target: FocusTarget) {
        if self.form.consent_blur(target) != GroupBlur::Deferred {
            return;
        }
        // Let the host settle focus before asking again
        tokio::task::yield_now().await;
        let target = self
            .probe
            .as_ref()
            .map(|probe| probe.consent_focus())
            .unwrap_or(FocusTarget::Unknown);
        self.form.consent_recheck(target);
    }

    fn send_code(&mut self) {
        let Some(request) = self.form.begin_send_code() else {
            return;
        };
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = run_send_request(api.as_ref(), request).await;
            if tx.send(FormEvent::SendFinished(outcome)).is_err() {
                tracing::debug!("form runtime gone, dropping send outcome");
            }
        });
    }

    /// The countdown only runs while a code awaits confirmation
    fn sync_ticker(&mut self) {
        if self.form.verification().countdown().is_none() && self.ticker.generation().is_some() {
            self.ticker.stop();
        }
    }
}
