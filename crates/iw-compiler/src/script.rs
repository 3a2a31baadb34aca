//! Client-side instantiation scripts
//!
//! Each widget gets one inline script that constructs its browser-side
//! object, registers it with the room connection and starts it.

use std::fmt::Write;

use iw_dom::ElementTemplate;

/// Escape `data` for a double-quoted JavaScript string literal.
///
/// Only `[0-9A-Za-z.-]` pass through; every other character becomes a
/// `\u{..}` code point escape.
pub fn sanitize_javascript(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for c in data.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            out.push(c);
        } else {
            let _ = write!(out, "\\u{{{:x}}}", c as u32);
        }
    }
    out
}

/// A constructor argument after the element
#[derive(Debug, Clone, PartialEq)]
pub enum JsArgument {
    String(String),
    Bool(bool),
    Null,
}

impl JsArgument {
    pub fn string(value: impl Into<String>) -> Self {
        JsArgument::String(value.into())
    }

    /// String when present, `null` otherwise
    pub fn optional(value: Option<&str>) -> Self {
        value.map_or(JsArgument::Null, |value| JsArgument::String(value.to_string()))
    }

    fn render(&self) -> String {
        match self {
            JsArgument::String(value) => format!("\"{}\"", sanitize_javascript(value)),
            JsArgument::Bool(value) => value.to_string(),
            JsArgument::Null => "null".to_string(),
        }
    }
}

/// Everything needed to emit one widget's instantiation script
#[derive(Debug, Clone, PartialEq)]
pub struct Instantiation {
    /// Browser-side class, e.g. `TerminalWidget`
    pub class: &'static str,
    /// Id of the element the widget renders into
    pub element_id: String,
    pub arguments: Vec<JsArgument>,
    /// Room channel name (the widget's identity)
    pub channel: String,
    /// Forward widget messages to the backend
    pub sends_messages: bool,
    /// Notify the widget about connection open/close
    pub tracks_connection: bool,
}

impl Instantiation {
    pub fn render(&self) -> String {
        let mut script = String::new();
        script.push_str("\n{\n");
        script.push_str("    roomConnection.addWidget();\n");
        let _ = writeln!(script, "    const widget = new {}(", self.class);
        let _ = writeln!(
            script,
            "        document.getElementById(\"{}\"),",
            self.element_id
        );
        for argument in &self.arguments {
            let _ = writeln!(script, "        {},", argument.render());
        }
        script.push_str("    );\n");
        script.push_str("    widget.addEventListener(\"ready\", function _listener() {\n");
        script.push_str("        roomConnection.markWidgetReady();\n");
        script.push_str("        widget.removeEventListener(\"ready\", _listener);\n");
        script.push_str("    });\n");
        if self.sends_messages {
            script.push_str("    widget.addEventListener(\"message\", event => {\n");
            let _ = writeln!(
                script,
                "        roomConnection.sendMessage(\"{}\", event.detail);",
                self.channel
            );
            script.push_str("    });\n");
        }
        if self.tracks_connection {
            script.push_str("    roomConnection.addEventListener(\"connect\", event => {\n");
            script.push_str("        widget.handleOpen();\n");
            script.push_str("    });\n");
            script.push_str("    roomConnection.addEventListener(\"disconnect\", event => {\n");
            script.push_str("        widget.handleClose();\n");
            script.push_str("    });\n");
        }
        let _ = writeln!(
            script,
            "    roomConnection.addEventListener(\"{}\", event => {{",
            self.channel
        );
        script.push_str("        widget.handleMessage(event.detail);\n");
        script.push_str("    });\n");
        script.push_str("    widget.start();\n");
        script.push_str("}\n");
        script
    }

    pub fn template(&self) -> ElementTemplate {
        ElementTemplate::inline_script(self.render())
    }
}
