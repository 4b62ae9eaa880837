//! End-to-end registry tests against a mock HTTP server.

use httpmock::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use stencil::cli::commands::{AddOptions, Installer};
use stencil::config::load_config;
use stencil::install::{FsWriter, SystemRunner};
use stencil::registry::{resolve, CatalogClient, RegistrySource, Sources};
use stencil::ui::MockUI;
use stencil::StencilError;
use tempfile::TempDir;

const CONFIG: &str = r#"{
  "style": "new-york",
  "rsc": false,
  "tailwind": { "config": "", "css": "app/globals.css", "baseColor": "neutral", "cssVariables": true },
  "aliases": { "components": "@/components", "utils": "@/lib/utils" }
}"#;

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("components.json"), CONFIG).unwrap();
    fs::write(
        temp.path().join("tsconfig.json"),
        r#"{ "compilerOptions": { "paths": { "@/*": ["./*"] } } }"#,
    )
    .unwrap();
    fs::create_dir_all(temp.path().join("app")).unwrap();
    fs::write(temp.path().join("app/globals.css"), "@tailwind base;\n").unwrap();
    temp
}

fn sources(temp: &TempDir, server: &MockServer) -> Sources {
    let mut sources = Sources::new(
        temp.path(),
        RegistrySource::default_at(&server.url("/r"), Some("secret-token")),
    );
    let mut headers = BTreeMap::new();
    headers.insert("X-Api-Key".to_string(), "acme-key".to_string());
    sources.add_namespace(RegistrySource::namespaced(
        "@acme",
        &server.url("/acme/{name}.json"),
        headers,
    ));
    sources
}

#[test]
fn resolves_dependency_closure_over_http() {
    let temp = project();
    let server = MockServer::start();
    let dialog = server.mock(|when, then| {
        when.method(GET)
            .path("/r/styles/new-york/dialog.json")
            .header("Authorization", "Bearer secret-token");
        then.status(200).body(
            r#"{ "name": "dialog", "type": "registry:ui",
                 "dependencies": ["@radix-ui/react-dialog"],
                 "registryDependencies": ["button", "utils"] }"#,
        );
    });
    let button = server.mock(|when, then| {
        when.method(GET).path("/r/styles/new-york/button.json");
        then.status(200).body(
            r#"{ "name": "button", "type": "registry:ui",
                 "dependencies": ["@radix-ui/react-slot@^1.1.0"],
                 "registryDependencies": ["utils"] }"#,
        );
    });
    let utils = server.mock(|when, then| {
        when.method(GET).path("/r/styles/new-york/utils.json");
        then.status(200).body(
            r#"{ "name": "utils", "type": "registry:lib",
                 "dependencies": ["clsx", "@radix-ui/react-slot"] }"#,
        );
    });

    let client = CatalogClient::new(sources(&temp, &server));
    let set = resolve(&["dialog".to_string()], "new-york", &client).unwrap();

    assert_eq!(set.names(), vec!["dialog", "button", "utils"]);
    assert_eq!(
        set.dependencies().as_slice(),
        [
            "@radix-ui/react-dialog".to_string(),
            "@radix-ui/react-slot@^1.1.0".to_string(),
            "clsx".to_string(),
        ]
    );
    dialog.assert_calls(1);
    button.assert_calls(1);
    utils.assert_calls(1);
}

#[test]
fn missing_dependency_aborts_resolution() {
    let temp = project();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/r/styles/new-york/card.json");
        then.status(200).body(
            r#"{ "name": "card", "type": "registry:ui", "registryDependencies": ["ghost"] }"#,
        );
    });
    server.mock(|when, then| {
        when.method(GET).path("/r/styles/new-york/ghost.json");
        then.status(404);
    });

    let client = CatalogClient::new(sources(&temp, &server));
    let err = resolve(&["card".to_string()], "new-york", &client).unwrap_err();
    match err {
        StencilError::NotFound { name, .. } => assert_eq!(name, "ghost"),
        other => panic!("expected not found, got {:?}", other),
    }
}

#[test]
fn unauthorized_registry_is_a_transport_error() {
    let temp = project();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/r/styles/new-york/private.json");
        then.status(401);
    });

    let client = CatalogClient::new(sources(&temp, &server));
    let err = resolve(&["private".to_string()], "new-york", &client).unwrap_err();
    assert!(matches!(err, StencilError::Transport { .. }));
    assert!(err.to_string().contains("401"));
}

#[test]
fn namespaced_item_installs_into_project() {
    let temp = project();
    let server = MockServer::start();
    let card = server.mock(|when, then| {
        when.method(GET)
            .path("/acme/card.json")
            .header("X-Api-Key", "acme-key");
        then.status(200).body(
            r#"{ "name": "card", "type": "registry:ui",
                 "cssVars": { "light": { "card": "0 0% 100%" } },
                 "files": [{
                   "path": "registry/new-york/ui/card.tsx",
                   "type": "registry:ui",
                   "content": "export function Card() {\n  return <div className=\"rounded-lg\" />\n}\n"
                 }] }"#,
        );
    });

    let config = load_config(temp.path()).unwrap();
    let client = CatalogClient::new(sources(&temp, &server));
    let writer = FsWriter;
    let runner = SystemRunner;
    let installer = Installer {
        config: &config,
        catalog: &client,
        writer: &writer,
        runner: &runner,
    };
    let mut ui = MockUI::new();

    let outcome = installer
        .run(
            &["@acme/card".to_string()],
            AddOptions {
                overwrite: false,
                yes: true,
                skip_install: true,
            },
            &mut ui,
        )
        .unwrap()
        .unwrap();

    card.assert_calls(1);
    assert_eq!(outcome.resolved, vec!["card"]);
    let written = fs::read_to_string(temp.path().join("components/ui/card.tsx")).unwrap();
    assert!(written.contains("export function Card()"));
    let css = fs::read_to_string(temp.path().join("app/globals.css")).unwrap();
    assert!(css.contains("--card: 0 0% 100%;"));
}
