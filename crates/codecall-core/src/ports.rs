use async_trait::async_trait;

use crate::{
    domain::{CallSid, MessageSid, Notification, OutboundCall},
    Result,
};

/// Hexagonal port for the telephony provider.
///
/// Twilio is the production implementation; tests plug in in-memory fakes.
#[async_trait]
pub trait TelephonyPort: Send + Sync {
    /// Ask the provider to dial `call.to`; the provider fetches call-control
    /// markup from `call.callback_url` once answered.
    async fn place_call(&self, call: &OutboundCall) -> Result<CallSid>;

    async fn send_message(&self, msg: &Notification) -> Result<MessageSid>;
}
