//! Whole-site runs

use std::fs;
use std::path::Path;

use iw_cli::{BuildOptions, BuildSummary, build_site};

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

struct Fixture {
    site: tempfile::TempDir,
    assets: tempfile::TempDir,
    out: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            site: tempfile::tempdir().unwrap(),
            assets: tempfile::tempdir().unwrap(),
            out: tempfile::tempdir().unwrap(),
        };
        for asset in ["RoomConnection.js", "Widget.js", "ButtonWidget.js"] {
            write(fixture.assets.path(), asset, "// asset");
        }
        write(fixture.site.path(), "index.html", "<html><head></head><body><p>Home</p></body></html>");
        write(
            fixture.site.path(),
            "tutorial/index.html",
            r#"<html><head></head><body><p><x-button image="alpine" command="echo hi" label="Go"></x-button></p></body></html>"#,
        );
        write(fixture.site.path(), "css/site.css", "body {}");
        fixture
    }

    fn options(&self, config: Option<&str>) -> BuildOptions {
        let config = config.map(|contents| {
            let path = self.out.path().join("iw.toml");
            fs::write(&path, contents).unwrap();
            path
        });
        BuildOptions {
            site: self.site.path().to_path_buf(),
            out: self.out.path().join("deploy"),
            assets: self.assets.path().to_path_buf(),
            config,
        }
    }

    fn deploy(&self) -> std::path::PathBuf {
        self.out.path().join("deploy")
    }
}

#[test]
fn test_site_published() {
    let fixture = Fixture::new();
    let summary = build_site(&fixture.options(None)).unwrap();
    assert_eq!(
        summary,
        BuildSummary {
            pages: 2,
            interactive_pages: 1,
            rooms: 1,
            assets: 3,
        }
    );

    let deploy = fixture.deploy();
    let home = fs::read_to_string(deploy.join("static/index.html")).unwrap();
    assert_eq!(home, "<html><head></head><body><p>Home</p></body></html>");

    let tutorial = fs::read_to_string(deploy.join("static/tutorial/index.html")).unwrap();
    assert!(tutorial.contains("new ButtonWidget("));
    assert!(tutorial.contains(r#"src="../RoomConnection.js""#));

    assert!(deploy.join("static/css/site.css").is_file());
    assert!(deploy.join("static/ButtonWidget.js").is_file());

    let plan: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(deploy.join("interactive-widgets-backend.json")).unwrap(),
    )
    .unwrap();
    assert!(plan["pages"]["/tutorial"]["executors"].is_object());
}

#[test]
fn test_config_file_applied() {
    let fixture = Fixture::new();
    build_site(&fixture.options(Some("transport_port = 9000\nproxy_server_name = \"docs.local\"\n")))
        .unwrap();

    let deploy = fixture.deploy();
    let plan: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(deploy.join("interactive-widgets-backend.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(plan["port"], 9000);
    let nginx = fs::read_to_string(deploy.join("interactive-widgets-nginx.conf")).unwrap();
    assert!(nginx.contains("server_name  docs.local;"));
}

#[test]
fn test_compile_error_writes_nothing() {
    let fixture = Fixture::new();
    write(
        fixture.site.path(),
        "broken.html",
        r#"<body><p><x-terminal image="alpine"></x-terminal></p></body>"#,
    );

    let err = build_site(&fixture.options(None)).unwrap_err();
    assert!(format!("{err:#}").contains("missing required attribute `command`"));
    assert!(!fixture.deploy().exists());
}
