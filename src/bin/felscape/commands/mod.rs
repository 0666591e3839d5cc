mod plot;

use plot::run_plot;

use anyhow::Result;

use felscape::RenderMode;

use crate::cli::Command;
use crate::config::build_render_config;
use crate::display::Output;

pub fn dispatch(command: Command, output: Output) -> Result<()> {
    let config = build_render_config(&command)?;
    let mode = match command {
        Command::Flat(_) => RenderMode::Flat,
        Command::Surface(_) => RenderMode::Surface,
    };
    run_plot(mode, &command.shared().io, &config, output)
}
