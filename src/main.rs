use anyhow::Result;
use nook_viewer::config::AppConfig;
use nook_viewer::internal::ui::app::App;
use nook_viewer::tui;

fn env_filter(config: &AppConfig) -> tracing_subscriber::EnvFilter {
    // RUST_LOG takes precedence over the configured levels.
    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
        Err(_) => {
            let mut filter_str = config.logging.level.clone();
            for (module, level) in &config.logging.module_levels {
                filter_str.push_str(&format!(",{}={}", module, level));
            }
            tracing_subscriber::EnvFilter::new(filter_str)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load();

    // Logs must not reach stdout/stderr while the TUI owns the terminal, so they go to a
    // daily rotating file. If the terminal cannot be initialized we log to the console.
    match tui::init() {
        Ok(terminal) => {
            let log_dir = config.logging.log_directory.as_deref().unwrap_or("logs");
            let file_appender = tracing_appender::rolling::daily(log_dir, "nook-viewer.log");
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::fmt()
                .with_env_filter(env_filter(&config))
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();

            let mut app = App::with_config(config);
            let res = app.run(terminal).await;

            tui::restore()?;

            if let Err(err) = res {
                eprintln!("{err:?}");
            }

            Ok(())
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter(&config))
                .init();

            eprintln!("Failed to initialize TUI: {e:?}");
            Err(e.into())
        }
    }
}
