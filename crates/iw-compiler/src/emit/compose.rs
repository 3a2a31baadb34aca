//! Packaging descriptors: the front-end `Dockerfile` and `docker-compose.yaml`

use std::collections::BTreeMap;

use serde::Serialize;

use super::{COMPOSE_FILE_NAME, NGINX_FILE_NAME};
use crate::config::SiteConfig;
use crate::emit::nginx::{CERTIFICATE_KEY_MOUNT, CERTIFICATE_MOUNT};
use crate::error::{CompileError, Result};
use crate::plan::{ExecutionPlan, PLAN_FILE_NAME};

const FRONTEND_SERVICE: &str = "interactive-widgets-nginx";
const BACKEND_SERVICE: &str = "interactive-widgets-backend";
const BACKEND_WORKDIR: &str = "/usr/src/app";
const RUNTIME_SOCKET: &str = "/var/run/docker.sock";

#[derive(Debug, Serialize)]
struct ComposeFile {
    version: &'static str,
    services: BTreeMap<&'static str, Service>,
}

#[derive(Debug, Default, Serialize)]
struct Service {
    image: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    build: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    command: Vec<&'static str>,
}

/// Image for the static front end
pub fn render_dockerfile() -> String {
    format!(
        "FROM nginx\n\
         RUN rm /etc/nginx/conf.d/default.conf /usr/share/nginx/html/*\n\
         COPY {NGINX_FILE_NAME} /etc/nginx/conf.d/\n\
         COPY static/ /usr/share/nginx/html/\n"
    )
}

/// Compose file for the front end and, when any page has widgets, the
/// backend that runs them
pub fn render_compose(plan: &ExecutionPlan, config: &SiteConfig) -> Result<String> {
    let mut frontend = Service {
        image: FRONTEND_SERVICE,
        build: Some("."),
        ports: vec![format!("{}:80", config.http_port)],
        ..Service::default()
    };
    if let Some((certificate, key)) = config.https_certificate() {
        frontend.ports.push(format!("{}:443", config.https_port));
        frontend.volumes.push(format!("{certificate}:{CERTIFICATE_MOUNT}"));
        frontend.volumes.push(format!("{key}:{CERTIFICATE_KEY_MOUNT}"));
    }

    let mut services = BTreeMap::new();
    services.insert(FRONTEND_SERVICE, frontend);

    if plan.has_rooms() {
        services.insert(
            BACKEND_SERVICE,
            Service {
                image: BACKEND_SERVICE,
                volumes: vec![
                    format!("./{PLAN_FILE_NAME}:{BACKEND_WORKDIR}/{PLAN_FILE_NAME}"),
                    format!("{RUNTIME_SOCKET}:{RUNTIME_SOCKET}"),
                ],
                command: vec![BACKEND_SERVICE, PLAN_FILE_NAME],
                ..Service::default()
            },
        );
    }

    let file = ComposeFile {
        version: "3",
        services,
    };
    serde_yaml::to_string(&file).map_err(|e| CompileError::Serialize {
        artifact: COMPOSE_FILE_NAME,
        source: Box::new(e),
    })
}
