mod api;
mod app;
mod assets;
mod audio;
mod collage;
mod config;
mod controller;
mod logging;
mod runtime;
mod schedule;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
