use tracing::error;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

use viewer_config::CONFIG;

#[tokio::main]
async fn main() {
    init_logger();
    if let Err(err) = viewer_app::run().await {
        error!("Viewer stopped with error: '{err:#}'");
        std::process::exit(1);
    }
}

fn init_logger() {
    let subscriber = SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(CONFIG.logging.levels()))
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Setting default subscriber failed");
}
