mod cli;
mod logging;
mod model;
mod store;

fn main() -> anyhow::Result<()> {
    cli::run()
}
