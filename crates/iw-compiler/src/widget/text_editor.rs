//! `<x-text-editor>`: a CodeMirror editor kept in sync with a file in the
//! sandbox

use iw_dom::ElementTemplate;

use super::{Insertions, Lifecycle, Sandbox, Variant, WidgetDescriptor, monitor_command, widget_scripts};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::identity;
use crate::markup::WidgetMarkup;
use crate::page::PageUrl;
use crate::resolve::{self, ResourceLimits};
use crate::script::JsArgument;

#[derive(Debug, Clone, PartialEq)]
pub struct TextEditor {
    pub file: String,
    /// CodeMirror language mode, e.g. `python`
    pub mode: Option<String>,
}

impl TextEditor {
    pub const CLASS: &'static str = "TextEditorWidget";
    pub const STATIC_ASSETS: &'static [&'static str] = &[
        "TextEditorWidget.js",
        "Widget.js",
        "node_modules/codemirror/addon",
        "node_modules/codemirror/keymap",
        "node_modules/codemirror/lib",
        "node_modules/codemirror/mode",
        "node_modules/codemirror/theme",
    ];

    pub(super) fn head_insertions(&self, page: &PageUrl) -> Insertions {
        let mut append = widget_scripts(page, Self::CLASS);
        append.push(ElementTemplate::script_src(
            page.relative("/node_modules/codemirror/lib/codemirror.js"),
        ));
        append.push(ElementTemplate::stylesheet(
            page.relative("/node_modules/codemirror/lib/codemirror.css"),
        ));
        if let Some(mode) = &self.mode {
            append.push(ElementTemplate::script_src(
                page.relative(&format!("/node_modules/codemirror/mode/{mode}/{mode}.js")),
            ));
        }

        Insertions {
            prepend: Vec::new(),
            append,
        }
    }

    pub(super) fn arguments(&self) -> Vec<JsArgument> {
        vec![
            JsArgument::string(&self.file),
            JsArgument::optional(self.mode.as_deref()),
        ]
    }
}

pub(super) fn build(markup: &WidgetMarkup, config: &SiteConfig) -> Result<WidgetDescriptor> {
    let file = markup.require("file")?;
    let mode = markup.attribute("mode").map(str::to_string);
    let success = resolve::success_timeout(markup, config)?;
    let failure = resolve::failure_timeout(markup, config)?;
    let limits = ResourceLimits::resolve(markup, config)?;
    let name = identity::assign(
        markup,
        &[file, mode.as_deref().unwrap_or_default(), success.as_str(), failure.as_str()],
    )?;

    let sandbox = Sandbox {
        lifecycle: Lifecycle::Always,
        image: config.monitor_image.clone(),
        command: monitor_command(config, file, success, failure),
        working_directory: None,
        enable_tty: false,
    };
    let variant = Variant::TextEditor(TextEditor {
        file: file.to_string(),
        mode,
    });
    Ok(WidgetDescriptor::assemble(markup, name, sandbox, limits, variant))
}
