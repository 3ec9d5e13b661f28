//! Twilio adapter (voice calls + SMS).
//!
//! Implements the `codecall-core` TelephonyPort over the 2010-04-01 REST API:
//! `Calls.json` and `Messages.json`, form-encoded, HTTP Basic auth.

use async_trait::async_trait;
use serde::Deserialize;

use codecall_core::{
    config::Config,
    domain::{CallSid, MessageSid, Notification, OutboundCall},
    errors::Error,
    ports::TelephonyPort,
    Result,
};

const API_VERSION: &str = "2010-04-01";

#[derive(Clone, Debug)]
pub struct TwilioClient {
    account_sid: String,
    auth_token: String,
    base_url: String,
    http: reqwest::Client,
}

/// Resource body returned for a created call or message.
#[derive(Debug, Deserialize)]
struct CreatedResource {
    sid: String,
}

/// Twilio REST error body.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

impl TwilioClient {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.twilio_account_sid.clone(),
            cfg.twilio_auth_token.clone(),
            cfg.twilio_api_base.clone(),
        )
    }

    fn resource_url(&self, resource: &str) -> String {
        format!(
            "{}/{API_VERSION}/Accounts/{}/{resource}.json",
            self.base_url, self.account_sid
        )
    }

    async fn create(&self, resource: &str, form: &[(&str, &str)]) -> Result<String> {
        let resp = self
            .http
            .post(self.resource_url(resource))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(form)
            .send()
            .await
            .map_err(|e| Error::External(format!("twilio request error: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::External(format!("twilio response error: {e}")))?;

        if !status.is_success() {
            return Err(provider_error(status.as_u16(), &body));
        }

        let created: CreatedResource = serde_json::from_str(&body)?;
        if created.sid.trim().is_empty() {
            return Err(Error::External(format!(
                "twilio {resource} response carried an empty sid"
            )));
        }
        Ok(created.sid)
    }
}

fn provider_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => Error::Provider {
            status,
            code: parsed.code,
            message: parsed.message.unwrap_or_default(),
        },
        Err(_) => Error::Provider {
            status,
            code: None,
            message: body.chars().take(200).collect(),
        },
    }
}

#[async_trait]
impl TelephonyPort for TwilioClient {
    async fn place_call(&self, call: &OutboundCall) -> Result<CallSid> {
        let sid = self
            .create(
                "Calls",
                &[
                    ("To", call.to.0.as_str()),
                    ("From", call.from.0.as_str()),
                    ("Url", call.callback_url.as_str()),
                ],
            )
            .await?;
        tracing::debug!(call_sid = %sid, to = %call.to, "twilio call created");
        Ok(CallSid(sid))
    }

    async fn send_message(&self, msg: &Notification) -> Result<MessageSid> {
        let sid = self
            .create(
                "Messages",
                &[
                    ("To", msg.to.0.as_str()),
                    ("From", msg.from.0.as_str()),
                    ("Body", msg.body.as_str()),
                ],
            )
            .await?;
        tracing::debug!(message_sid = %sid, to = %msg.to, "twilio message created");
        Ok(MessageSid(sid))
    }
}
