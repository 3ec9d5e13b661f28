//! Code verification and the SMS alert that reports its outcome.

use std::sync::Arc;

use crate::{
    config::Config,
    domain::{MessageSid, Notification, PhoneNumber},
    ports::TelephonyPort,
    Result,
};

pub const CODE_CORRECT_BODY: &str = "Thank you. Your code is correct.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeCheck {
    Correct,
    Incorrect,
}

/// Verbatim comparison: no trimming, no digit normalization.
pub fn check_code(entered: &str, expected: &str) -> CodeCheck {
    if entered == expected {
        CodeCheck::Correct
    } else {
        CodeCheck::Incorrect
    }
}

pub fn alert_body(check: CodeCheck, called: &PhoneNumber) -> String {
    match check {
        CodeCheck::Correct => CODE_CORRECT_BODY.to_string(),
        CodeCheck::Incorrect => format!("Alert, Incorrect Code entered by {called}."),
    }
}

/// Turns collected digits into exactly one notification to the alert receiver.
#[derive(Clone)]
pub struct AlertService {
    cfg: Arc<Config>,
    telephony: Arc<dyn TelephonyPort>,
}

impl AlertService {
    pub fn new(cfg: Arc<Config>, telephony: Arc<dyn TelephonyPort>) -> Self {
        Self { cfg, telephony }
    }

    pub fn notification_for(&self, digits: &str) -> Notification {
        let check = check_code(digits, &self.cfg.security_code);
        Notification {
            to: self.cfg.alert_receiver.clone(),
            from: self.cfg.twilio_phone_number.clone(),
            body: alert_body(check, &self.cfg.client_phone_number),
        }
    }

    /// Validate `digits` and send the outcome. Send failures are logged and
    /// returned; there is no retry.
    pub async fn report_digits(&self, digits: &str) -> Result<MessageSid> {
        let notification = self.notification_for(digits);
        match self.telephony.send_message(&notification).await {
            Ok(sid) => {
                tracing::info!(message_sid = %sid, "Alert sent successfully");
                Ok(sid)
            }
            Err(e) => {
                tracing::error!("Error sending alert: {e}");
                Err(e)
            }
        }
    }
}
