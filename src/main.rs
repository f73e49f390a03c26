use waitlist::configuration::Settings;
use waitlist::startup::Application;
use waitlist::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("waitlist".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = Settings::get()?;
    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
