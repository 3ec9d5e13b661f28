use std::fmt;

/// Phone number in whatever form the provider accepts (E.164 in practice).
///
/// Carried verbatim; no normalization.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhoneNumber(pub String);

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-assigned call id (`CA...`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallSid(pub String);

/// Provider-assigned message id (`SM...`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageSid(pub String);

impl fmt::Display for CallSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for MessageSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One outbound call, created per scheduler tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundCall {
    pub from: PhoneNumber,
    pub to: PhoneNumber,
    /// URL the provider fetches call-control markup from once the call is answered.
    pub callback_url: String,
}

/// One outbound text message, created per completed digit entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub to: PhoneNumber,
    pub from: PhoneNumber,
    pub body: String,
}
