use tracing::Level;
use tracing_subscriber::prelude::*;

pub(crate) fn init() {
    let tracing_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter = tracing_subscriber::filter::Targets::new()
        .with_target("octocrab", Level::INFO)
        .with_target("reqwest", Level::WARN)
        .with_target("hyper", Level::WARN)
        .with_default(Level::INFO);

    tracing_subscriber::registry()
        .with(tracing_layer)
        .with(filter)
        .init();
}
