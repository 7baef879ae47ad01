#![forbid(unsafe_code)]

//! Host-facing session around the map application.
//!
//! The session owns a [`Program<MapApp>`], the toast queue, and the clock.
//! Each [`WebSession::step`] returns the HTTP requests and map animations the
//! host must perform and the toast changes it must render. Responses come back
//! through the `push_*` methods and take effect on the next step.

use std::sync::Arc;
use std::time::Duration;

use kartan_geo::ZoomTransform;
use kartan_runtime::{AppView, Effect, KartanConfig, MapApp, Msg, Program, StepResult};
use tracing::{debug, info, warn};

use crate::DeterministicClock;
use crate::mail::{MailRequest, decode_mail_response};
use crate::notify::{Notification, NotificationId, NotificationQueue, QueueAction, QueueConfig};
use crate::payload::decode_payload;

/// Work the host performs on the session's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// GET `url`, then call [`WebSession::push_data`].
    FetchData { url: String },
    /// POST the request, then call [`WebSession::push_mail_response`] or
    /// [`WebSession::push_mail_failure`].
    SendMail(MailRequest),
    /// Animate the map to this transform.
    Zoom(ZoomTransform),
}

impl HostRequest {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FetchData { .. } => "fetch_data",
            Self::SendMail(_) => "send_mail",
            Self::Zoom(_) => "zoom",
        }
    }
}

/// Outcome of one session step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStep {
    pub step: StepResult,
    pub requests: Vec<HostRequest>,
    pub toasts: Vec<QueueAction>,
    /// When the host should step again even without input.
    pub next_tick: Option<Duration>,
}

/// A running map session.
pub struct WebSession {
    program: Program<MapApp>,
    toasts: NotificationQueue,
    clock: DeterministicClock,
}

impl WebSession {
    #[must_use]
    pub fn new(config: KartanConfig) -> Self {
        let toasts = NotificationQueue::new(QueueConfig::from(&config.notify));
        Self {
            program: Program::new(MapApp::new(config)),
            toasts,
            clock: DeterministicClock::new(),
        }
    }

    /// Start the app. The result carries the initial data request.
    pub fn init(&mut self) -> SessionStep {
        let step = self.program.init();
        self.finish(step)
    }

    /// Queue a message for the next step.
    pub fn push(&mut self, msg: Msg) {
        self.program.push(msg);
    }

    /// Queue the data response.
    pub fn push_data(&mut self, status: u16, body: &[u8]) {
        let msg = match decode_payload(status, body) {
            Ok(catalog) => Msg::DataLoaded(Arc::new(catalog)),
            Err(err) => {
                warn!(target: "kartan.web", kind = err.kind(), error = %err, "data load failed");
                Msg::LoadFailed {
                    reason: err.to_string(),
                }
            }
        };
        self.push(msg);
    }

    /// Queue the mail endpoint answer.
    pub fn push_mail_response(&mut self, status: u16, body: &[u8]) {
        let msg = match decode_mail_response(status, body) {
            Ok(()) => Msg::MailSent,
            Err(err) => {
                warn!(target: "kartan.web", error = %err, "mail send failed");
                Msg::MailFailed {
                    reason: err.to_string(),
                }
            }
        };
        self.push(msg);
    }

    /// Queue a mail request that never got an answer.
    pub fn push_mail_failure(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(target: "kartan.web", %reason, "mail transport failed");
        self.push(Msg::MailFailed { reason });
    }

    /// Process queued messages and advance the toast queue.
    pub fn step(&mut self) -> SessionStep {
        let step = self.program.step();
        self.finish(step)
    }

    /// Push one message and step.
    pub fn send(&mut self, msg: Msg) -> SessionStep {
        self.push(msg);
        self.step()
    }

    /// Set the host clock. Going backwards is ignored.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    #[inline]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Remove a toast the visitor closed.
    pub fn dismiss_toast(&mut self, id: NotificationId) -> bool {
        self.toasts.dismiss(id)
    }

    pub fn view(&self) -> AppView {
        self.program.view()
    }

    #[inline]
    pub fn app(&self) -> &MapApp {
        self.program.model()
    }

    /// Toasts on screen, oldest first.
    #[inline]
    pub fn toasts(&self) -> &[Notification] {
        self.toasts.visible()
    }

    #[inline]
    pub fn toast_queue(&self) -> &NotificationQueue {
        &self.toasts
    }

    fn finish(&mut self, step: StepResult) -> SessionStep {
        let now = self.clock.now();
        let mut out = SessionStep {
            step,
            ..SessionStep::default()
        };
        for effect in self.program.drain_effects() {
            match effect {
                Effect::FetchData => {
                    let url = self.app().config().api.data_url();
                    info!(target: "kartan.web", %url, "fetching data");
                    out.requests.push(HostRequest::FetchData { url });
                }
                Effect::SendMail(submission) => {
                    let config = self.app().config();
                    let request = MailRequest::build(&config.api, &config.mail, &submission);
                    info!(target: "kartan.web", url = %request.url, "sending mail");
                    out.requests.push(HostRequest::SendMail(request));
                }
                Effect::Toast(toast) => {
                    if let Some(id) = self.toasts.push(&toast, now)
                        && self.toasts.visible().iter().any(|n| n.id == id)
                    {
                        out.toasts.push(QueueAction::Update(id));
                    }
                }
                Effect::Zoom(transform) => out.requests.push(HostRequest::Zoom(transform)),
            }
        }
        out.toasts.extend(self.toasts.tick(now));

        let toast_due = self
            .toasts
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(now));
        out.next_tick = match (step.tick, toast_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        debug!(
            target: "kartan.web",
            requests = out.requests.len(),
            toasts = out.toasts.len(),
            visible_toasts = self.toasts.visible_count(),
            "session step"
        );
        out
    }
}
