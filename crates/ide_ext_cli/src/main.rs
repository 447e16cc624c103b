//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive `ide_ext_core` through register, open, switch and close with demo
//!   extensions, independent of any UI shell.
//! - Print the core version and resulting manifest for quick sanity checks.
//!
//! Usage: `ide_ext_cli [config.json]`

use ide_ext_core::{
    core_version, init_logging_from_config, DocumentNode, EditorSurface, Extension,
    ExtensionDeclaration, ExtensionLifecycle, ExtensionManager, HostServices, ManagerConfig,
};
use log::info;
use std::process::ExitCode;

/// Demo lifecycle that reports each call on stdout.
struct EchoLifecycle {
    path: &'static str,
}

impl ExtensionLifecycle for EchoLifecycle {
    fn init(&mut self, parent: Option<&EditorSurface>) -> Result<(), String> {
        match parent {
            Some(surface) => println!("init {} surface={}", self.path, surface.handler_path),
            None => println!("init {}", self.path),
        }
        Ok(())
    }

    fn enable(&mut self) {
        println!("enable {}", self.path);
    }

    fn disable(&mut self) {
        println!("disable {}", self.path);
    }

    fn destroy(&mut self) {
        println!("destroy {}", self.path);
    }
}

fn demo(path: &'static str, declaration: ExtensionDeclaration) -> Extension {
    Extension::new(declaration, Box::new(EchoLifecycle { path }))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => ManagerConfig::load(path)?,
        None => ManagerConfig::default(),
    };
    init_logging_from_config(&config)?;

    let mut manager = ExtensionManager::from_config(&config, HostServices::default())?;

    manager.register(
        "ext/languages/keywords",
        demo("ext/languages/keywords", ExtensionDeclaration::general().with_name("Keywords")),
        false,
    )?;
    manager.register(
        "ext/layouts/default",
        demo("ext/layouts/default", ExtensionDeclaration::layout().with_name("Default Layout")),
        false,
    )?;
    manager.register(
        "ext/editors/code",
        demo(
            "ext/editors/code",
            ExtensionDeclaration::editor()
                .with_name("Code Editor")
                .depends_on("ext/languages/keywords")
                .handles("text/plain")
                .handles("application/javascript"),
        ),
        false,
    )?;
    manager.register(
        "ext/editors/image",
        demo(
            "ext/editors/image",
            ExtensionDeclaration::editor()
                .with_name("Image Viewer")
                .handles("image/png"),
        ),
        false,
    )?;
    manager.set_layout_mode("ext/layouts/default")?;

    manager.open_document("main.js", &DocumentNode::new("application/javascript", "let x = 1;"))?;
    manager.open_document("logo.png", &DocumentNode::new("image/png", "<binary>"))?;
    manager.before_switch("main.js")?;
    manager.after_switch(Some("logo.png"), "main.js")?;
    manager.close_session("logo.png")?;

    info!(
        "event=cli_demo module=cli status=ok sessions={} current_editor={:?}",
        manager.session_keys().len(),
        manager.current_editor()
    );

    let records = manager.manifest_records()?;
    manager.shutdown();

    println!("ide_ext_core version={}", core_version());
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ide_ext_cli: {err}");
            ExitCode::FAILURE
        }
    }
}
