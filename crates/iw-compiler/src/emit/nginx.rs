//! Reverse-proxy configuration

use crate::config::SiteConfig;
use crate::page::PageUrl;
use crate::plan::ExecutionPlan;

/// Upstream name and the backend service it resolves to
const UPSTREAM: &str = "backend";
const BACKEND_HOST: &str = "interactive-widgets-backend";

/// Where the front-end container expects the certificate pair
pub const CERTIFICATE_MOUNT: &str = "/tmp/nginx.crt";
pub const CERTIFICATE_KEY_MOUNT: &str = "/tmp/nginx.key";

const STATIC_ROOT: &str = "/usr/share/nginx/html";

/// Render the nginx server configuration.
///
/// Without rooms this is a plain static server: no upstream block and no
/// WebSocket locations.
pub fn render(plan: &ExecutionPlan, config: &SiteConfig) -> String {
    let sockets: Vec<String> = plan
        .pages
        .keys()
        .map(|url| PageUrl::new(url).websocket_path())
        .collect();

    let mut out = String::new();
    if !sockets.is_empty() {
        out.push_str(&format!(
            "upstream {UPSTREAM} {{\n    server {BACKEND_HOST};\n}}\n\n"
        ));
    }

    server_block(&mut out, "80", config, &sockets, None);

    if config.https_certificate().is_some() {
        out.push('\n');
        server_block(
            &mut out,
            "443 ssl",
            config,
            &sockets,
            Some((CERTIFICATE_MOUNT, CERTIFICATE_KEY_MOUNT)),
        );
    }
    out
}

fn server_block(
    out: &mut String,
    listen: &str,
    config: &SiteConfig,
    sockets: &[String],
    certificate: Option<(&str, &str)>,
) {
    out.push_str("server {\n");
    out.push_str(&format!("    listen       {listen};\n"));
    out.push_str(&format!("    server_name  {};\n", config.proxy_server_name));
    if let Some((crt, key)) = certificate {
        out.push_str(&format!("    ssl_certificate {crt};\n"));
        out.push_str(&format!("    ssl_certificate_key {key};\n"));
    }
    out.push_str("    location / {\n");
    out.push_str(&format!("        root {STATIC_ROOT};\n"));
    out.push_str("        index index.html index.htm;\n");
    out.push_str("    }\n");
    for socket in sockets {
        out.push_str(&format!("    location = {socket} {{\n"));
        out.push_str(&format!("        proxy_pass http://{UPSTREAM}{socket};\n"));
        out.push_str("        proxy_http_version 1.1;\n");
        out.push_str("        proxy_set_header Upgrade $http_upgrade;\n");
        out.push_str("        proxy_set_header Connection \"Upgrade\";\n");
        out.push_str("        proxy_set_header Host $host;\n");
        out.push_str("    }\n");
    }
    out.push_str("}\n");
}
