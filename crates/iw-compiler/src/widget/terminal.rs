//! `<x-terminal>`: an interactive shell attached to a pseudo-terminal

use iw_dom::ElementTemplate;

use super::{Insertions, Lifecycle, Sandbox, Variant, WidgetDescriptor, split_command, widget_scripts};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::identity;
use crate::markup::WidgetMarkup;
use crate::page::PageUrl;
use crate::resolve::{self, ResourceLimits};
use crate::script::JsArgument;

#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    pub command: String,
    pub working_directory: Option<String>,
}

impl Terminal {
    pub const CLASS: &'static str = "TerminalWidget";
    pub const STATIC_ASSETS: &'static [&'static str] = &[
        "TerminalWidget.js",
        "Widget.js",
        "node_modules/xterm/lib",
        "node_modules/xterm-addon-fit/lib",
        "node_modules/xterm/css",
    ];

    pub(super) fn head_insertions(page: &PageUrl) -> Insertions {
        let mut append = widget_scripts(page, Self::CLASS);
        append.push(ElementTemplate::script_src(
            page.relative("/node_modules/xterm/lib/xterm.js"),
        ));
        append.push(ElementTemplate::script_src(
            page.relative("/node_modules/xterm-addon-fit/lib/xterm-addon-fit.js"),
        ));
        append.push(ElementTemplate::stylesheet(
            page.relative("/node_modules/xterm/css/xterm.css"),
        ));

        Insertions {
            prepend: Vec::new(),
            append,
        }
    }

    pub(super) fn arguments(&self) -> Vec<JsArgument> {
        vec![
            JsArgument::string(&self.command),
            JsArgument::optional(self.working_directory.as_deref()),
        ]
    }
}

pub(super) fn build(markup: &WidgetMarkup, config: &SiteConfig) -> Result<WidgetDescriptor> {
    let image = markup.require("image")?;
    let command = markup.require("command")?;
    let working_directory = resolve::working_directory(markup);
    let limits = ResourceLimits::resolve(markup, config)?;
    let name = identity::assign(
        markup,
        &[image, command, working_directory.as_deref().unwrap_or_default()],
    )?;

    let sandbox = Sandbox {
        lifecycle: Lifecycle::Always,
        image: image.to_string(),
        command: split_command(markup, "command", command)?,
        working_directory: working_directory.clone(),
        enable_tty: true,
    };
    let variant = Variant::Terminal(Terminal {
        command: command.to_string(),
        working_directory,
    });
    Ok(WidgetDescriptor::assemble(markup, name, sandbox, limits, variant))
}
