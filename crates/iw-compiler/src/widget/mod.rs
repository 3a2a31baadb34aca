//! Widget variant registry
//!
//! Each markup kind maps to one variant. A variant validates its markup,
//! names the widget, and declares what it needs from the page: static
//! assets, head and body insertions, a replacement node, and a backend
//! executor entry. Dispatch is by [`Variant`], a closed enum.

mod button;
mod image_viewer;
mod stage;
mod terminal;
mod text_editor;
mod text_viewer;

pub use button::Button;
pub use image_viewer::ImageViewer;
pub use stage::Stage;
pub use terminal::Terminal;
pub use text_editor::TextEditor;
pub use text_viewer::TextViewer;

use iw_dom::{ElementTemplate, NodeId};
use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::error::Result;
use crate::markup::{WidgetKind, WidgetMarkup};
use crate::page::PageUrl;
use crate::plan::ExecutorEntry;
use crate::resolve::ResourceLimits;
use crate::script::{Instantiation, JsArgument};

/// Base class shared by every browser-side widget
pub const WIDGET_BASE_ASSET: &str = "Widget.js";

/// Class of the element replacing widget markup
pub const CONTAINER_CLASS: &str = "interactive-widgets-container";

/// When and how often a widget's sandboxed process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Runs to completion on each trigger
    Once,
    /// Long-running for the lifetime of the room
    Always,
    /// Runs before the room becomes ready
    Prologue,
    /// Runs after the room's widgets finish
    Epilogue,
}

impl Lifecycle {
    /// Suffix of the executor's logger name
    pub fn logger_suffix(self) -> &'static str {
        match self {
            Lifecycle::Once => "Once",
            Lifecycle::Always => "Always",
            Lifecycle::Prologue => "Prologue",
            Lifecycle::Epilogue => "Epilogue",
        }
    }
}

/// Ordered insertions for one document section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insertions {
    /// Placed before the section's existing content
    pub prepend: Vec<ElementTemplate>,
    /// Placed after the section's running insertion point
    pub append: Vec<ElementTemplate>,
}

/// Body insertions of one widget
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInsertions {
    pub prepend: Vec<ElementTemplate>,
    /// Goes immediately after the widget's replacement point
    pub instantiation: ElementTemplate,
    pub append: Vec<ElementTemplate>,
}

/// Variant-specific fields
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Button(Button),
    ImageViewer(ImageViewer),
    Terminal(Terminal),
    TextEditor(TextEditor),
    TextViewer(TextViewer),
    Prologue(Stage),
    Epilogue(Stage),
}

impl Variant {
    /// Browser-side class
    pub fn class(&self) -> &'static str {
        match self {
            Variant::Button(_) => Button::CLASS,
            Variant::ImageViewer(_) => ImageViewer::CLASS,
            Variant::Terminal(_) => Terminal::CLASS,
            Variant::TextEditor(_) => TextEditor::CLASS,
            Variant::TextViewer(_) => TextViewer::CLASS,
            Variant::Prologue(_) => Stage::PROLOGUE_CLASS,
            Variant::Epilogue(_) => Stage::EPILOGUE_CLASS,
        }
    }

    fn static_assets(&self) -> &'static [&'static str] {
        match self {
            Variant::Button(_) => Button::STATIC_ASSETS,
            Variant::ImageViewer(_) => ImageViewer::STATIC_ASSETS,
            Variant::Terminal(_) => Terminal::STATIC_ASSETS,
            Variant::TextEditor(_) => TextEditor::STATIC_ASSETS,
            Variant::TextViewer(_) => TextViewer::STATIC_ASSETS,
            Variant::Prologue(_) => Stage::PROLOGUE_ASSETS,
            Variant::Epilogue(_) => Stage::EPILOGUE_ASSETS,
        }
    }

    fn head_insertions(&self, page: &PageUrl) -> Insertions {
        match self {
            Variant::Terminal(_) => Terminal::head_insertions(page),
            Variant::TextEditor(editor) => editor.head_insertions(page),
            _ => Insertions {
                prepend: Vec::new(),
                append: widget_scripts(page, self.class()),
            },
        }
    }

    fn arguments(&self) -> Vec<JsArgument> {
        match self {
            Variant::Button(button) => button.arguments(),
            Variant::ImageViewer(viewer) => viewer.arguments(),
            Variant::Terminal(terminal) => terminal.arguments(),
            Variant::TextEditor(editor) => editor.arguments(),
            Variant::TextViewer(viewer) => viewer.arguments(),
            Variant::Prologue(stage) | Variant::Epilogue(stage) => stage.arguments(),
        }
    }

    /// Whether the browser-side widget sends messages to its executor
    fn sends_messages(&self) -> bool {
        matches!(
            self,
            Variant::Button(_) | Variant::Terminal(_) | Variant::TextEditor(_)
        )
    }

    fn tracks_connection(&self) -> bool {
        matches!(self, Variant::TextEditor(_))
    }

    fn is_hidden(&self) -> bool {
        match self {
            Variant::Prologue(stage) | Variant::Epilogue(stage) => stage.hidden,
            _ => false,
        }
    }
}

/// A validated, named widget instance
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDescriptor {
    pub name: String,
    pub kind: WidgetKind,
    pub page_url: PageUrl,
    pub position: usize,
    /// Markup element this widget replaces
    pub node: NodeId,
    pub lifecycle: Lifecycle,
    pub image: String,
    /// argv of the sandboxed process
    pub command: Vec<String>,
    pub working_directory: Option<String>,
    pub enable_tty: bool,
    pub limits: ResourceLimits,
    pub variant: Variant,
}

/// Sandbox part of a descriptor, filled in by the variants
pub(crate) struct Sandbox {
    pub lifecycle: Lifecycle,
    pub image: String,
    pub command: Vec<String>,
    pub working_directory: Option<String>,
    pub enable_tty: bool,
}

impl WidgetDescriptor {
    /// Validate `markup` and build the descriptor of its kind
    pub fn from_markup(markup: &WidgetMarkup, config: &SiteConfig) -> Result<Self> {
        let descriptor = match markup.kind {
            WidgetKind::Button => button::build(markup, config),
            WidgetKind::ImageViewer => image_viewer::build(markup, config),
            WidgetKind::Terminal => terminal::build(markup, config),
            WidgetKind::TextEditor => text_editor::build(markup, config),
            WidgetKind::TextViewer => text_viewer::build(markup, config),
            WidgetKind::Prologue | WidgetKind::Epilogue => stage::build(markup, config),
        }?;
        tracing::debug!(
            "Built {} #{} on {} as {}",
            markup.kind,
            markup.position,
            markup.page_url,
            descriptor.name
        );
        Ok(descriptor)
    }

    pub(crate) fn assemble(
        markup: &WidgetMarkup,
        name: String,
        sandbox: Sandbox,
        limits: ResourceLimits,
        variant: Variant,
    ) -> Self {
        Self {
            name,
            kind: markup.kind,
            page_url: markup.page_url.clone(),
            position: markup.position,
            node: markup.node,
            lifecycle: sandbox.lifecycle,
            image: sandbox.image,
            command: sandbox.command,
            working_directory: sandbox.working_directory,
            enable_tty: sandbox.enable_tty,
            limits,
            variant,
        }
    }

    /// Id of the container element
    pub fn element_id(&self) -> String {
        format!("widget-{}-{}", self.kind.name(), self.name)
    }

    /// Asset paths (files or directories) under the asset root
    pub fn static_assets(&self) -> &'static [&'static str] {
        self.variant.static_assets()
    }

    pub fn head_insertions(&self) -> Insertions {
        self.variant.head_insertions(&self.page_url)
    }

    pub fn body_insertions(&self) -> BodyInsertions {
        BodyInsertions {
            prepend: Vec::new(),
            instantiation: self.instantiation().template(),
            append: Vec::new(),
        }
    }

    pub fn instantiation(&self) -> Instantiation {
        Instantiation {
            class: self.variant.class(),
            element_id: self.element_id(),
            arguments: self.variant.arguments(),
            channel: self.name.clone(),
            sends_messages: self.variant.sends_messages(),
            tracks_connection: self.variant.tracks_connection(),
        }
    }

    /// Container replacing the markup; `None` for hidden widgets
    pub fn replacement_node(&self) -> Option<ElementTemplate> {
        if self.variant.is_hidden() {
            return None;
        }
        Some(
            ElementTemplate::new("div")
                .attr("id", self.element_id())
                .attr("class", CONTAINER_CLASS),
        )
    }

    /// Executor entry for the backend plan
    pub fn backend_configuration(&self, config: &SiteConfig) -> ExecutorEntry {
        ExecutorEntry {
            lifecycle: self.lifecycle,
            logger_name: format!("{}{}", config.logger_prefix(), self.lifecycle.logger_suffix()),
            image: self.image.clone(),
            command: self.command.clone(),
            enable_tty: self.enable_tty,
            working_directory: self.working_directory.clone(),
            memory_limit_bytes: self.limits.memory_limit_bytes,
            cpu_limit: self.limits.cpu_limit,
            pids_limit: self.limits.pids_limit,
        }
    }
}

/// `<script src>` for the shared base class and the widget's own class
fn widget_scripts(page: &PageUrl, class: &str) -> Vec<ElementTemplate> {
    vec![
        ElementTemplate::script_src(page.relative(&format!("/{WIDGET_BASE_ASSET}"))),
        ElementTemplate::script_src(page.relative(&format!("/{class}.js"))),
    ]
}

/// Shell-style split of a command attribute
fn split_command(markup: &WidgetMarkup, attribute: &'static str, raw: &str) -> Result<Vec<String>> {
    shlex::split(raw)
        .filter(|argv| !argv.is_empty())
        .ok_or_else(|| markup.invalid(attribute, raw))
}

/// argv of the file monitor shared by viewers and editors
fn monitor_command(config: &SiteConfig, file: &str, success: String, failure: String) -> Vec<String> {
    vec![config.monitor_command.clone(), file.to_string(), success, failure]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::scan;

    fn descriptor(html: &str, url: &str) -> WidgetDescriptor {
        let doc = iw_html::parse(html).unwrap();
        let markups = scan(&doc, &PageUrl::new(url));
        WidgetDescriptor::from_markup(&markups[0], &SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_split_command_quotes() {
        let d = descriptor(
            r#"<p><x-button image="alpine" command="sh -c 'echo hi'" label="Go"></x-button></p>"#,
            "",
        );
        assert_eq!(d.command, ["sh", "-c", "echo hi"]);
    }

    #[test]
    fn test_unbalanced_command_is_invalid() {
        let doc = iw_html::parse(r#"<x-terminal image="alpine" command="echo 'oops"></x-terminal>"#)
            .unwrap();
        let markups = scan(&doc, &PageUrl::root());
        let err = WidgetDescriptor::from_markup(&markups[0], &SiteConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::CompileError::InvalidAttribute { attribute: "command", .. }
        ));
    }

    #[test]
    fn test_backend_logger_name() {
        let d = descriptor(
            r#"<x-terminal image="alpine" command="sh"></x-terminal>"#,
            "guide/",
        );
        let entry = d.backend_configuration(&SiteConfig::default());
        assert_eq!(entry.logger_name, "DockerAlways");
        assert!(entry.enable_tty);
    }

    #[test]
    fn test_replacement_container() {
        let d = descriptor(
            r#"<x-text-viewer file="/tmp/out"></x-text-viewer>"#,
            "guide/",
        );
        let div = d.replacement_node().unwrap();
        assert_eq!(div.get_attr("id"), Some(format!("widget-text-viewer-{}", d.name).as_str()));
        assert_eq!(div.get_attr("class"), Some(CONTAINER_CLASS));
    }

    #[test]
    fn test_widget_scripts_relative() {
        let d = descriptor(
            r#"<x-image-viewer file="/tmp/a.png" mime="image/png"></x-image-viewer>"#,
            "a/b/",
        );
        let head = d.head_insertions();
        assert!(head.prepend.is_empty());
        let sources: Vec<_> = head.append.iter().filter_map(|t| t.get_attr("src")).collect();
        assert_eq!(sources, ["../../Widget.js", "../../ImageViewerWidget.js"]);
    }
}
