mod application;
mod config;
mod progress;

mod presentation {
    pub mod cli;
}

fn main() -> anyhow::Result<()> {
    application::run()
}
