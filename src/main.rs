use std::error::Error;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use log::error;

use shadeview::config::ViewerConfig;
use shadeview::error::ViewerError;
use shadeview::logging::{init_logging, LoggingConfig};
use shadeview::viewer::Viewer;
use shadeview::window::Window;

#[derive(Parser, Debug)]
#[command(name = "shadeview")]
#[command(about, version, long_about = None)]
struct Cli {
    /// Directory holding the GLSL programs and OBJ meshes
    resource_dir: Option<PathBuf>,
    /// Nonzero renders a single frame to output.png and exits
    #[arg(default_value = "0", allow_negative_numbers = true)]
    offline: String,
}

/// True when the leading integer of `arg` is nonzero. Text without leading
/// digits counts as zero.
fn offline_flag(arg: &str) -> bool {
    let trimmed = arg.trim_start();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    digits
        .chars()
        .take_while(char::is_ascii_digit)
        .any(|c| c != '0')
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let Some(resource_dir) = cli.resource_dir else {
        println!("{}", Cli::command().render_usage());
        return 0;
    };
    init_logging(LoggingConfig::default());

    let config = ViewerConfig::new(resource_dir).with_offline(offline_flag(&cli.offline));
    let mut window = match Window::new(&config.window, config.offline) {
        Ok(window) => window,
        Err(err) => {
            report(&err);
            return -1;
        }
    };

    match run_viewer(&mut window, config) {
        Ok(()) => 0,
        Err(err @ ViewerError::Initialization(_)) => {
            report(&err);
            -1
        }
        Err(err) => {
            report(&err);
            1
        }
    }
}

fn run_viewer(window: &mut Window, config: ViewerConfig) -> Result<(), ViewerError> {
    let mut viewer = Viewer::load(config)?;
    let result = viewer
        .init(window.gl())
        .and_then(|()| frame_loop(window, &mut viewer));
    viewer.release(window.gl());
    result
}

fn frame_loop(window: &mut Window, viewer: &mut Viewer<glow::Context>) -> Result<(), ViewerError> {
    while !viewer.should_close() {
        let frame = window.frame_input();
        viewer.render(window.gl_mut(), frame)?;
        window.swap();
        for event in window.poll_events() {
            viewer.handle_event(event);
        }
    }
    Ok(())
}

fn report(err: &dyn Error) {
    error!("{err}");
    let mut source = err.source();
    while let Some(cause) = source {
        error!("  caused by: {cause}");
        source = cause.source();
    }
}
