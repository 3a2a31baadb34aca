//! Deployment output on disk

use std::fs;
use std::path::Path;

use iw_compiler::{CompileError, Deployment, ExecutionPlan, SiteBuild, SiteConfig};

const BUTTON_PAGE: &str =
    r#"<body><p><x-button image="alpine" command="echo hi" label="Go"></x-button></p></body>"#;

fn asset_root(files: &[&str]) -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    for file in files {
        let path = root.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("// {file}")).unwrap();
    }
    root
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_interactive_site_layout() {
    let config = SiteConfig::default();
    let mut build = SiteBuild::new(config.clone());
    build.compile_page("", BUTTON_PAGE).unwrap();
    build.compile_page("terminal/", r#"<body><p><x-terminal image="alpine" command="sh"></x-terminal></p></body>"#).unwrap();

    let assets = asset_root(&[
        "RoomConnection.js",
        "Widget.js",
        "ButtonWidget.js",
        "TerminalWidget.js",
        "node_modules/xterm/lib/xterm.js",
        "node_modules/xterm/css/xterm.css",
        "node_modules/xterm-addon-fit/lib/xterm-addon-fit.js",
    ]);
    let out = tempfile::tempdir().unwrap();
    let deploy = out.path().join("deploy");

    Deployment::new(&config, build.finish())
        .write(&deploy, assets.path())
        .unwrap();

    let plan: ExecutionPlan =
        serde_json::from_str(&read(&deploy.join("interactive-widgets-backend.json"))).unwrap();
    assert_eq!(plan.pages.len(), 2);
    assert!(plan.room("/").is_some());
    assert!(plan.room("/terminal").is_some());

    let nginx = read(&deploy.join("interactive-widgets-nginx.conf"));
    assert!(nginx.contains("location = /ws {"));
    assert!(nginx.contains("location = /terminal/ws {"));

    assert!(read(&deploy.join("Dockerfile")).starts_with("FROM nginx"));
    assert!(read(&deploy.join("docker-compose.yaml")).contains("interactive-widgets-backend"));

    assert_eq!(read(&deploy.join("static/ButtonWidget.js")), "// ButtonWidget.js");
    assert_eq!(
        read(&deploy.join("static/node_modules/xterm/lib/xterm.js")),
        "// node_modules/xterm/lib/xterm.js"
    );
    assert!(deploy.join("static/node_modules/xterm/css/xterm.css").is_file());
}

#[test]
fn test_static_site_has_no_backend() {
    let config = SiteConfig::default();
    let mut build = SiteBuild::new(config.clone());
    build.compile_page("", "<p>Nothing interactive</p>").unwrap();

    let assets = asset_root(&[]);
    let out = tempfile::tempdir().unwrap();
    let deployment = Deployment::new(&config, build.finish());

    let artifacts = deployment.render().unwrap();
    assert!(artifacts.backend_plan.is_none());
    assert!(!artifacts.nginx_conf.contains("upstream"));
    assert!(!artifacts.compose.contains("interactive-widgets-backend"));

    deployment.write(out.path(), assets.path()).unwrap();
    assert!(!out.path().join("interactive-widgets-backend.json").exists());
    assert!(out.path().join("interactive-widgets-nginx.conf").is_file());
}

#[test]
fn test_missing_asset_writes_nothing() {
    let config = SiteConfig::default();
    let mut build = SiteBuild::new(config.clone());
    build.compile_page("", BUTTON_PAGE).unwrap();

    // ButtonWidget.js is absent
    let assets = asset_root(&["RoomConnection.js", "Widget.js"]);
    let out = tempfile::tempdir().unwrap();
    let deploy = out.path().join("deploy");

    let err = Deployment::new(&config, build.finish())
        .write(&deploy, assets.path())
        .unwrap_err();
    match err {
        CompileError::UnknownAsset { path } => assert!(path.ends_with("ButtonWidget.js")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!deploy.exists());
}

#[test]
fn test_static_rerun_removes_previous_plan() {
    let config = SiteConfig::default();
    let assets = asset_root(&["RoomConnection.js", "Widget.js", "ButtonWidget.js"]);
    let out = tempfile::tempdir().unwrap();

    let mut interactive = SiteBuild::new(config.clone());
    interactive.compile_page("", BUTTON_PAGE).unwrap();
    Deployment::new(&config, interactive.finish())
        .write(out.path(), assets.path())
        .unwrap();
    assert!(out.path().join("interactive-widgets-backend.json").is_file());

    let mut static_only = SiteBuild::new(config.clone());
    static_only.compile_page("", "<p>Widgets removed</p>").unwrap();
    Deployment::new(&config, static_only.finish())
        .write(out.path(), assets.path())
        .unwrap();
    assert!(!out.path().join("interactive-widgets-backend.json").exists());
    assert!(!read(&out.path().join("docker-compose.yaml")).contains("interactive-widgets-backend"));
}
