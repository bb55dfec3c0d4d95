use admin_dashboard::chart::TextChartAdapter;
use admin_dashboard::input::{ConsoleInput, InputSource};
use admin_dashboard::{Dashboard, DashboardConfig, Event, Flow, HttpAdminApi, logging, ui};
use std::io::Write;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = DashboardConfig::from_env()?;
    info!("using backend at {}", config.api_url);

    let api = HttpAdminApi::new(&config)?;
    let mut dashboard = Dashboard::new(api, TextChartAdapter);
    dashboard.initial_load().await;

    let mut console = ConsoleInput::stdio();
    writeln!(console.writer(), "{}", ui::render_dashboard(&dashboard))?;
    writeln!(console.writer(), "{}", admin_dashboard::app::HELP)?;

    loop {
        write!(console.writer(), "> ")?;
        console.writer().flush()?;
        let Some(line) = console.read_line() else {
            break;
        };

        let event = match line.parse::<Event>() {
            Ok(event) => event,
            Err(message) => {
                console.alert(&message);
                continue;
            }
        };
        if dashboard.handle(event, &mut console).await == Flow::Exit {
            break;
        }
        writeln!(console.writer(), "{}", ui::render_dashboard(&dashboard))?;
    }

    info!("console closed");
    Ok(())
}
