#[cfg(target_os = "windows")]
fn main() -> anyhow::Result<()> {
    use scalewatch::settings::Settings;

    let settings = Settings::load("scalewatch.json")?;
    scalewatch::logging::init(settings.debug_logging);
    scalewatch::watcher_window::run(settings)
}

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("scalewatch observes a Windows scaling engine and only runs on Windows");
}
