#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use codecall_core::{
    config::Config,
    domain::{CallSid, MessageSid, Notification, OutboundCall},
    errors::Error,
    ports::TelephonyPort,
    Result,
};
use codecall_http::{serve_on, AppState};

/// In-memory provider that records every request.
#[derive(Default)]
pub struct FakeTelephony {
    pub calls: Mutex<Vec<OutboundCall>>,
    pub messages: Mutex<Vec<Notification>>,
    pub fail_messages: bool,
}

impl FakeTelephony {
    pub fn failing_messages() -> Self {
        Self {
            fail_messages: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<Notification> {
        self.messages.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<OutboundCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelephonyPort for FakeTelephony {
    async fn place_call(&self, call: &OutboundCall) -> Result<CallSid> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call.clone());
        Ok(CallSid(format!("CA{}", calls.len())))
    }

    async fn send_message(&self, msg: &Notification) -> Result<MessageSid> {
        let mut messages = self.messages.lock().unwrap();
        messages.push(msg.clone());
        if self.fail_messages {
            return Err(Error::Provider {
                status: 400,
                code: Some(21610),
                message: "Attempt to send to unsubscribed recipient".to_string(),
            });
        }
        Ok(MessageSid(format!("SM{}", messages.len())))
    }
}

pub fn test_config() -> Arc<Config> {
    Arc::new(
        Config::from_lookup(|k| {
            let v = match k {
                "TWILIO_PHONE_NUMBER" => "+15550001111",
                "CLIENT_PHONE_NUMBER" => "+15550002222",
                "ALERT_RECEIVER" => "+15550003333",
                "TWILIO_ACCOUNT_SID" => "AC123",
                "TWILIO_AUTH_TOKEN" => "secret",
                "SECURITY_CODE" => "1234",
                "ONLINE_URL" => "https://example.test/voice",
                _ => return None,
            };
            Some(v.to_string())
        }),
    )
}

pub struct TestApp {
    pub base_url: String,
    pub shutdown: CancellationToken,
    pub server: JoinHandle<Result<()>>,
}

impl TestApp {
    pub async fn stop(self) {
        self.shutdown.cancel();
        self.server.await.unwrap().unwrap();
    }
}

/// Serve the real router on an ephemeral localhost port.
pub async fn spawn_app(cfg: Arc<Config>, telephony: Arc<FakeTelephony>) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(cfg, telephony));
    let shutdown = CancellationToken::new();
    let server = tokio::spawn(serve_on(listener, state, shutdown.clone()));
    TestApp {
        base_url: format!("http://{addr}"),
        shutdown,
        server,
    }
}

pub const EXPECTED_VOICE_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<Response><Gather input="dtmf" timeout="10" numDigits="1" action="/gather">"#,
    "<Say>Please Enter the code</Say>",
    "</Gather></Response>"
);
