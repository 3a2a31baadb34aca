//! Backend execution plan
//!
//! The plan is the document the backend server starts from: server
//! settings plus one room per interactive page, each mapping widget names
//! to sandbox executor requests.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::config::{LoggingLevel, SiteConfig};
use crate::error::{CompileError, Result};
use crate::transform::PageCompilationResult;
use crate::widget::Lifecycle;

/// File name of the serialized plan
pub const PLAN_FILE_NAME: &str = "interactive-widgets-backend.json";

/// Global plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub host: String,
    pub port: u16,
    pub logger_name: String,
    pub logging_level: LoggingLevel,
    pub context: ContextPlan,
    /// Rooms keyed by canonical page URL
    pub pages: BTreeMap<String, RoomPlan>,
}

/// Sandbox runtime used by every room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPlan {
    #[serde(rename = "type")]
    pub context_type: String,
    pub logger_name: String,
}

/// All widgets of one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPlan {
    #[serde(rename = "type")]
    pub room_type: String,
    pub logger_name_page: String,
    pub logger_name_room_connection: String,
    pub logger_name_room: String,
    /// Executors keyed by widget name
    pub executors: BTreeMap<String, ExecutorEntry>,
}

/// Sandboxed process request for one widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorEntry {
    #[serde(rename = "type")]
    pub lifecycle: Lifecycle,
    pub logger_name: String,
    pub image: String,
    pub command: Vec<String>,
    pub enable_tty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    pub memory_limit_bytes: u64,
    pub cpu_limit: f64,
    pub pids_limit: u64,
}

impl ExecutionPlan {
    /// Empty plan carrying the server-level settings of `config`
    pub fn new(config: &SiteConfig) -> Self {
        let prefix = config.logger_prefix();
        Self {
            host: config.transport_host.clone(),
            port: config.transport_port,
            logger_name: "Server".to_string(),
            logging_level: config.logging_level,
            context: ContextPlan {
                context_type: config.sandbox_context_type.clone(),
                logger_name: format!("{prefix}Context"),
            },
            pages: BTreeMap::new(),
        }
    }

    /// Fold one compiled page into the plan.
    ///
    /// Pages without widgets are skipped. A widget name already present in
    /// the page's room is a `DuplicateWidgetName` error and leaves the plan
    /// unchanged.
    pub fn add_page(&mut self, page: &PageCompilationResult, config: &SiteConfig) -> Result<()> {
        if page.widgets.is_empty() {
            return Ok(());
        }

        let key = page.url.to_string();
        let mut executors = self
            .pages
            .get(&key)
            .map(|room| room.executors.clone())
            .unwrap_or_default();

        for widget in &page.widgets {
            match executors.entry(widget.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(CompileError::DuplicateWidgetName {
                        kind: widget.kind,
                        page: key,
                        position: widget.position,
                        name: widget.name.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(widget.backend_configuration(config));
                }
            }
        }

        let prefix = config.logger_prefix();
        self.pages.insert(
            key,
            RoomPlan {
                room_type: config.sandbox_context_type.clone(),
                logger_name_page: "Page".to_string(),
                logger_name_room_connection: "RoomConnection".to_string(),
                logger_name_room: format!("{prefix}Room"),
                executors,
            },
        );
        Ok(())
    }

    pub fn room(&self, url: &str) -> Option<&RoomPlan> {
        self.pages.get(url)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (&str, &RoomPlan)> {
        self.pages.iter().map(|(url, room)| (url.as_str(), room))
    }

    pub fn has_rooms(&self) -> bool {
        !self.pages.is_empty()
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CompileError::Serialize {
            artifact: PLAN_FILE_NAME,
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_plan_header() {
        let plan = ExecutionPlan::new(&SiteConfig::default());
        assert_eq!(plan.host, "*");
        assert_eq!(plan.port, 80);
        assert_eq!(plan.logger_name, "Server");
        assert_eq!(plan.context.logger_name, "DockerContext");
        assert!(!plan.has_rooms());
    }

    #[test]
    fn test_json_shape() {
        let mut plan = ExecutionPlan::new(&SiteConfig::default());
        let mut executors = BTreeMap::new();
        executors.insert(
            "abc".to_string(),
            ExecutorEntry {
                lifecycle: Lifecycle::Once,
                logger_name: "DockerOnce".into(),
                image: "alpine".into(),
                command: vec!["echo".into(), "hi".into()],
                enable_tty: false,
                working_directory: None,
                memory_limit_bytes: 1024,
                cpu_limit: 1.0,
                pids_limit: 8,
            },
        );
        plan.pages.insert(
            "/".into(),
            RoomPlan {
                room_type: "docker".into(),
                logger_name_page: "Page".into(),
                logger_name_room_connection: "RoomConnection".into(),
                logger_name_room: "DockerRoom".into(),
                executors,
            },
        );

        let value: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(value["logging_level"], "DEBUG");
        assert_eq!(value["context"]["type"], "docker");
        let executor = &value["pages"]["/"]["executors"]["abc"];
        assert_eq!(executor["type"], "once");
        assert_eq!(executor["command"][1], "hi");
        assert!(executor.get("working_directory").is_none());

        let back: ExecutionPlan = serde_json::from_value(value).unwrap();
        assert_eq!(back, plan);
    }
}
