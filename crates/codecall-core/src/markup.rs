//! Call-control markup (TwiML) rendering.
//!
//! Only the verbs the voice callback needs: `<Say>` and `<Gather>`.

pub const CONTENT_TYPE: &str = "application/xml";

pub const CODE_PROMPT: &str = "Please Enter the code";
pub const GATHER_ACTION: &str = "/gather";
pub const GATHER_TIMEOUT_SECS: u32 = 10;
pub const GATHER_NUM_DIGITS: u32 = 1;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verb {
    Say(String),
    Gather(Gather),
}

/// `<Gather>`: collect keypad input, then POST it to `action`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gather {
    pub input: String,
    pub timeout_secs: u32,
    pub num_digits: u32,
    pub action: String,
    /// Verbs played while waiting for input.
    pub nested: Vec<Verb>,
}

impl Gather {
    pub fn dtmf(action: impl Into<String>) -> Self {
        Self {
            input: "dtmf".to_string(),
            timeout_secs: GATHER_TIMEOUT_SECS,
            num_digits: GATHER_NUM_DIGITS,
            action: action.into(),
            nested: Vec::new(),
        }
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.nested.push(Verb::Say(text.into()));
        self
    }
}

/// A `<Response>` document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verb(mut self, verb: Verb) -> Self {
        self.verbs.push(verb);
        self
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(XML_DECL);
        out.push_str("<Response>");
        for verb in &self.verbs {
            render_verb(verb, &mut out);
        }
        out.push_str("</Response>");
        out
    }
}

fn render_verb(verb: &Verb, out: &mut String) {
    match verb {
        Verb::Say(text) => {
            out.push_str("<Say>");
            out.push_str(&escape_xml(text));
            out.push_str("</Say>");
        }
        Verb::Gather(g) => {
            out.push_str(&format!(
                r#"<Gather input="{}" timeout="{}" numDigits="{}" action="{}">"#,
                escape_xml(&g.input),
                g.timeout_secs,
                g.num_digits,
                escape_xml(&g.action),
            ));
            for nested in &g.nested {
                render_verb(nested, out);
            }
            out.push_str("</Gather>");
        }
    }
}

/// The document served to every answered call: prompt for the code and
/// collect a single keypress.
pub fn code_prompt() -> VoiceResponse {
    VoiceResponse::new().verb(Verb::Gather(Gather::dtmf(GATHER_ACTION).say(CODE_PROMPT)))
}
