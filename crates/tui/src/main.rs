use ratatui::crossterm::event;
use ratatui::DefaultTerminal;
use smart_analyst::{config, logging, App, Config};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(50);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    if let Err(e) = logging::init(&config::log_dir()) {
        eprintln!("Logging disabled: {e}");
    }

    let config_path = config::config_path();
    let mut config = Config::load_or_default(&config_path);
    config.apply_env();
    tracing::info!(
        config = %config_path.display(),
        backend = %config.backend.base_url,
        ordering = ?config.workflow.ordering,
        "Starting smart-analyst"
    );

    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();
    let mut app = App::new(config)?;

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();

    result
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> color_eyre::Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(TICK)? {
            match app.handle_event(event::read()?) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => tracing::error!("Failed to handle input: {e}"),
            }
        }

        app.process_async_events();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
