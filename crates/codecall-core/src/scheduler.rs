//! Fixed-interval call scheduler.
//!
//! - Places one outbound call per tick (default every 30s)
//! - The first call goes out one interval after start, not immediately
//! - A failed call is logged; the loop keeps going
//! - Ticks missed while a call is in flight are skipped
//! - Stops when its cancellation token fires

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    domain::{CallSid, OutboundCall},
    ports::TelephonyPort,
    Result,
};

#[derive(Clone)]
pub struct CallScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    cfg: Arc<Config>,
    telephony: Arc<dyn TelephonyPort>,
}

impl CallScheduler {
    pub fn new(cfg: Arc<Config>, telephony: Arc<dyn TelephonyPort>) -> Self {
        Self {
            inner: Arc::new(SchedulerInner { cfg, telephony }),
        }
    }

    /// Run the tick loop on a background task.
    pub fn spawn(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.run(cancel).await })
    }

    pub async fn run(&self, cancel: CancellationToken) {
        let period = self.inner.cfg.call_interval;
        let mut tick = interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(interval_secs = period.as_secs(), "Call scheduler started");

        loop {
            tokio::select! {
              _ = cancel.cancelled() => break,
              _ = tick.tick() => {
                // Errors are already logged inside trigger_call.
                let _ = self.trigger_call().await;
              }
            }
        }

        tracing::info!("Call scheduler stopped");
    }

    /// One tick: place a single call to the configured destination.
    pub async fn trigger_call(&self) -> Result<CallSid> {
        tracing::info!(
            "Triggering call at {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        let call = self.outbound_call();
        match self.inner.telephony.place_call(&call).await {
            Ok(sid) => {
                tracing::info!("Call triggered: {sid}");
                Ok(sid)
            }
            Err(e) => {
                tracing::warn!("Error triggering call: {e}");
                Err(e)
            }
        }
    }

    pub fn outbound_call(&self) -> OutboundCall {
        let cfg = &self.inner.cfg;
        OutboundCall {
            from: cfg.twilio_phone_number.clone(),
            to: cfg.client_phone_number.clone(),
            callback_url: cfg.online_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageSid, Notification},
        Error,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::sleep;

    /// Fails every other call, starting with the first.
    #[derive(Default)]
    struct FlakyTelephony {
        calls: Mutex<Vec<OutboundCall>>,
        messages: Mutex<usize>,
    }

    #[async_trait]
    impl TelephonyPort for FlakyTelephony {
        async fn place_call(&self, call: &OutboundCall) -> Result<CallSid> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(call.clone());
            if calls.len() % 2 == 1 {
                return Err(Error::Provider {
                    status: 429,
                    code: Some(20429),
                    message: "Too Many Requests".to_string(),
                });
            }
            Ok(CallSid(format!("CA{}", calls.len())))
        }

        async fn send_message(&self, _msg: &Notification) -> Result<MessageSid> {
            *self.messages.lock().unwrap() += 1;
            Ok(MessageSid("SM1".to_string()))
        }
    }

    fn cfg(interval_secs: u64) -> Arc<Config> {
        let interval = interval_secs.to_string();
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
                    "CALL_INTERVAL_SECS" => interval.as_str(),
                    _ => return None,
                };
                Some(v.to_string())
            }),
        )
    }

    #[test]
    fn outbound_call_uses_configured_numbers_and_url() {
        let sched = CallScheduler::new(cfg(30), Arc::new(FlakyTelephony::default()));
        let call = sched.outbound_call();
        assert_eq!(call.from.0, "+15550001111");
        assert_eq!(call.to.0, "+15550002222");
        assert_eq!(call.callback_url, "https://example.test/voice");
    }

    #[tokio::test(start_paused = true)]
    async fn places_one_call_per_tick_regardless_of_failures() {
        let fake = Arc::new(FlakyTelephony::default());
        let sched = CallScheduler::new(cfg(30), fake.clone());
        let cancel = CancellationToken::new();
        let handle = sched.spawn(cancel.clone());

        sleep(Duration::from_secs(30 * 6 + 1)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(fake.calls.lock().unwrap().len(), 6);
        assert_eq!(*fake.messages.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn first_call_waits_one_full_interval() {
        let fake = Arc::new(FlakyTelephony::default());
        let sched = CallScheduler::new(cfg(30), fake.clone());
        let cancel = CancellationToken::new();
        let handle = sched.spawn(cancel.clone());

        sleep(Duration::from_secs(29)).await;
        assert_eq!(fake.calls.lock().unwrap().len(), 0);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(fake.calls.lock().unwrap().len(), 1);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_further_ticks() {
        let fake = Arc::new(FlakyTelephony::default());
        let sched = CallScheduler::new(cfg(10), fake.clone());
        let cancel = CancellationToken::new();
        let handle = sched.spawn(cancel.clone());

        sleep(Duration::from_secs(25)).await;
        cancel.cancel();
        handle.await.unwrap();
        let after_cancel = fake.calls.lock().unwrap().len();
        assert_eq!(after_cancel, 2);

        sleep(Duration::from_secs(100)).await;
        assert_eq!(fake.calls.lock().unwrap().len(), after_cancel);
    }

    #[tokio::test]
    async fn trigger_call_returns_provider_outcome() {
        let fake = Arc::new(FlakyTelephony::default());
        let sched = CallScheduler::new(cfg(30), fake.clone());
        assert!(matches!(
            sched.trigger_call().await,
            Err(Error::Provider { status: 429, .. })
        ));
        assert_eq!(sched.trigger_call().await.unwrap().0, "CA2");
    }
}
