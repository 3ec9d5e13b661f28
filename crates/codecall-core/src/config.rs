use std::{
    env, fmt, fs,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    path::Path,
    time::Duration,
};

use crate::domain::PhoneNumber;

pub const DEFAULT_CALL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
pub const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Provider, number and code settings. Each is taken as-is; an unset one is
/// blank and only warned about, so a bad deployment still serves callbacks.
pub const PROVIDER_SETTINGS: [&str; 7] = [
    "TWILIO_PHONE_NUMBER",
    "CLIENT_PHONE_NUMBER",
    "ALERT_RECEIVER",
    "TWILIO_ACCOUNT_SID",
    "TWILIO_AUTH_TOKEN",
    "SECURITY_CODE",
    "ONLINE_URL",
];

/// Typed, immutable configuration.
///
/// Built once at startup and shared as `Arc<Config>`; nothing reads the
/// process environment after that. Loading never fails.
#[derive(Clone)]
pub struct Config {
    // Numbers
    pub twilio_phone_number: PhoneNumber,
    pub client_phone_number: PhoneNumber,
    pub alert_receiver: PhoneNumber,

    // Provider account
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_api_base: String,

    // Verification
    pub security_code: String,
    /// Public URL of the `/voice` callback handed to the provider per call.
    pub online_url: String,

    // Runtime
    pub call_interval: Duration,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Load from the process environment, after merging `.env` if present.
    pub fn load() -> Self {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production,
    /// a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let setting = |key: &str| lookup(key).unwrap_or_default();

        let call_interval = match lookup("CALL_INTERVAL_SECS").and_then(non_empty) {
            Some(raw) => parse_interval(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    "CALL_INTERVAL_SECS {raw:?} is not a positive number of seconds, using {}s",
                    DEFAULT_CALL_INTERVAL.as_secs()
                );
                DEFAULT_CALL_INTERVAL
            }),
            None => DEFAULT_CALL_INTERVAL,
        };

        let listen_addr = match lookup("LISTEN_ADDR").and_then(non_empty) {
            Some(raw) => raw.trim().parse::<SocketAddr>().unwrap_or_else(|e| {
                tracing::warn!("LISTEN_ADDR {raw:?} is invalid ({e}), using {DEFAULT_LISTEN_ADDR}");
                DEFAULT_LISTEN_ADDR
            }),
            None => DEFAULT_LISTEN_ADDR,
        };

        let twilio_api_base = lookup("TWILIO_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_TWILIO_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let cfg = Self {
            twilio_phone_number: PhoneNumber(setting("TWILIO_PHONE_NUMBER")),
            client_phone_number: PhoneNumber(setting("CLIENT_PHONE_NUMBER")),
            alert_receiver: PhoneNumber(setting("ALERT_RECEIVER")),
            twilio_account_sid: setting("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: setting("TWILIO_AUTH_TOKEN"),
            twilio_api_base,
            security_code: setting("SECURITY_CODE"),
            online_url: setting("ONLINE_URL"),
            call_interval,
            listen_addr,
        };

        for key in cfg.missing_settings() {
            tracing::warn!("{key} is not set; provider requests depending on it will fail");
        }

        cfg
    }

    /// Provider settings that are blank, in `PROVIDER_SETTINGS` order.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let values = [
            &self.twilio_phone_number.0,
            &self.client_phone_number.0,
            &self.alert_receiver.0,
            &self.twilio_account_sid,
            &self.twilio_auth_token,
            &self.security_code,
            &self.online_url,
        ];
        PROVIDER_SETTINGS
            .iter()
            .zip(values)
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| *k)
            .collect()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("twilio_phone_number", &self.twilio_phone_number)
            .field("client_phone_number", &self.client_phone_number)
            .field("alert_receiver", &self.alert_receiver)
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field("twilio_auth_token", &"<redacted>")
            .field("twilio_api_base", &self.twilio_api_base)
            .field("security_code", &"<redacted>")
            .field("online_url", &self.online_url)
            .field("call_interval", &self.call_interval)
            .field("listen_addr", &self.listen_addr)
            .finish()
    }
}

fn parse_interval(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => None,
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
