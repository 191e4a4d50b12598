//! Email ownership verification handshake
//!
//! `Idle -> Checking -> CodeSent -> {Confirmed, Expired}`. Remote failures do
//! not have a state of their own: they send the session back to `Idle` and
//! surface as an error on the email field.
//!
//! Every send attempt takes a fresh generation number. Responses and
//! countdown ticks carry the generation they were issued for and are
//! discarded once the session has moved on.

use crate::api::{ApiError, AuthApi, CorrelationValue, Rejection};
use serde::Serialize;

pub const EMAIL_IN_USE: &str = "email already in use";
pub const UNKNOWN_VERIFICATION_ERROR: &str = "unknown verification error";

/// Verification state with the data each state carries
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VerificationStatus {
    #[default]
    Idle,
    /// Duplicate check or code dispatch in flight
    Checking { generation: u64 },
    /// Code sent; `remaining` seconds until it expires
    CodeSent { generation: u64, remaining: u32 },
    Confirmed,
    Expired,
}

impl VerificationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Checking { .. } => "checking",
            Self::CodeSent { .. } => "codeSent",
            Self::Confirmed => "confirmed",
            Self::Expired => "expired",
        }
    }
}

impl Serialize for VerificationStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A send attempt handed to the request phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub generation: u64,
    pub email: String,
}

/// Result of the request phase, tagged with the attempt it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub generation: u64,
    pub result: Result<CorrelationValue, ApiError>,
}

/// What applying a [`SendOutcome`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendApplied {
    /// Code sent, countdown started for this generation
    CodeSent { generation: u64 },
    /// Code sent with a zero-length validity window; already expired
    Expired { generation: u64 },
    /// Attempt failed; message belongs on the email field
    Failed { message: &'static str },
    /// Outcome belongs to a superseded attempt
    Stale,
}

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Counting { remaining: u32 },
    Expired,
    /// Tick for an old countdown, or no countdown running
    Stale,
}

/// Result of a confirmation callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed,
    /// Code rejected; a new send attempt is allowed
    Reset,
    /// Code accepted but the widget has not completed yet
    Pending,
    /// No code is awaiting confirmation
    Ignored,
}

/// Run the remote half of a send attempt: duplicate check, then dispatch
pub async fn run_send_request(api: &dyn AuthApi, request: SendRequest) -> SendOutcome {
    let result: Result<CorrelationValue, ApiError> = async {
        api.check_duplicate_email(&request.email).await?;
        api.dispatch_code(&request.email).await
    }
    .await;

    SendOutcome {
        generation: request.generation,
        result,
    }
}

/// Field error message for a failed send attempt
pub fn email_error_message(err: &ApiError) -> &'static str {
    match err.rejection() {
        Some(Rejection::DuplicateEmail) => EMAIL_IN_USE,
        Some(Rejection::MalformedEmail) => super::validation::EMAIL_MALFORMED,
        Some(Rejection::Unrecognized(_)) | None => UNKNOWN_VERIFICATION_ERROR,
    }
}

/// One verification session per form
#[derive(Debug, Clone)]
pub struct VerificationSession {
    status: VerificationStatus,
    generation: u64,
    email: Option<String>,
    correlation: Option<CorrelationValue>,
    correlation_key: String,
    countdown_secs: u32,
}

impl VerificationSession {
    pub fn new(countdown_secs: u32, correlation_key: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Idle,
            generation: 0,
            email: None,
            correlation: None,
            correlation_key: correlation_key.into(),
            countdown_secs,
        }
    }

    pub fn status(&self) -> &VerificationStatus {
        &self.status
    }

    /// Seconds remaining; `Some` exactly while a code is awaiting confirmation
    pub fn countdown(&self) -> Option<u32> {
        match self.status {
            VerificationStatus::CodeSent { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == VerificationStatus::Confirmed
    }

    /// True while a request is in flight or a code awaits confirmation
    pub fn is_busy(&self) -> bool {
        matches!(
            self.status,
            VerificationStatus::Checking { .. } | VerificationStatus::CodeSent { .. }
        )
    }

    /// A new attempt may start from `Idle` or after expiry
    pub fn can_begin(&self) -> bool {
        matches!(
            self.status,
            VerificationStatus::Idle | VerificationStatus::Expired
        )
    }

    /// Email the current attempt targets
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    pub fn correlation_key(&self) -> &str {
        &self.correlation_key
    }

    pub fn correlation(&self) -> Option<&CorrelationValue> {
        self.correlation.as_ref()
    }

    /// Read-and-clear for the confirmation widget
    pub fn take_correlation(&mut self) -> Option<CorrelationValue> {
        self.correlation.take()
    }

    /// Start a send attempt. Returns `None` when an attempt is already
    /// running or the email is confirmed.
    pub fn begin(&mut self, email: &str) -> Option<SendRequest> {
        if !self.can_begin() {
            return None;
        }
        self.generation += 1;
        self.email = Some(email.to_string());
        self.correlation = None;
        self.status = VerificationStatus::Checking {
            generation: self.generation,
        };
        Some(SendRequest {
            generation: self.generation,
            email: email.to_string(),
        })
    }

    /// Apply the result of the request phase
    pub fn apply(&mut self, outcome: SendOutcome) -> SendApplied {
        let current = matches!(
            self.status,
            VerificationStatus::Checking { generation } if generation == outcome.generation
        );
        if !current {
            return SendApplied::Stale;
        }

        match outcome.result {
            Ok(_) if self.countdown_secs == 0 => {
                self.status = VerificationStatus::Expired;
                self.correlation = None;
                SendApplied::Expired {
                    generation: outcome.generation,
                }
            }
            Ok(correlation) => {
                self.correlation = Some(correlation);
                self.status = VerificationStatus::CodeSent {
                    generation: outcome.generation,
                    remaining: self.countdown_secs,
                };
                SendApplied::CodeSent {
                    generation: outcome.generation,
                }
            }
            Err(err) => {
                self.status = VerificationStatus::Idle;
                self.email = None;
                SendApplied::Failed {
                    message: email_error_message(&err),
                }
            }
        }
    }

    /// Advance the countdown of `generation` by one second
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        match self.status {
            VerificationStatus::CodeSent {
                generation: current,
                remaining,
            } if current == generation => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.status = VerificationStatus::Expired;
                    self.correlation = None;
                    TickOutcome::Expired
                } else {
                    self.status = VerificationStatus::CodeSent {
                        generation,
                        remaining,
                    };
                    TickOutcome::Counting { remaining }
                }
            }
            _ => TickOutcome::Stale,
        }
    }

    /// Confirmation widget callback
    pub fn on_verification_result(&mut self, success: bool, completed: bool) -> ConfirmationOutcome {
        if !matches!(self.status, VerificationStatus::CodeSent { .. }) {
            return ConfirmationOutcome::Ignored;
        }
        if !success {
            self.status = VerificationStatus::Idle;
            self.correlation = None;
            return ConfirmationOutcome::Reset;
        }
        if completed {
            self.status = VerificationStatus::Confirmed;
            self.correlation = None;
            ConfirmationOutcome::Confirmed
        } else {
            ConfirmationOutcome::Pending
        }
    }

    /// Drop whatever was proven or pending; the email being submitted changed.
    /// Returns true if there was anything to revoke.
    pub fn revoke(&mut self) -> bool {
        if self.status == VerificationStatus::Idle {
            return false;
        }
        self.generation += 1;
        self.status = VerificationStatus::Idle;
        self.email = None;
        self.correlation = None;
        true
    }
}

impl Default for VerificationSession {
    fn default() -> Self {
        let config = crate::config::IntakeConfig::default();
        Self::new(config.countdown_secs, config.correlation_key)
    }
}
