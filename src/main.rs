use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lapscope::LapscopeError;
use lapscope::ui::viewer::LapViewerApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the viewer on a recorded lap
    Load {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn viewer(input: Option<PathBuf>) -> Result<(), LapscopeError> {
    if let Some(ref path) = input
        && !path.exists()
    {
        return Err(LapscopeError::InvalidTraceFile {
            path: format!("{:?}", path),
        });
    }
    eframe::run_native(
        "Lapscope",
        eframe::NativeOptions::default(),
        Box::new(move |cc| Ok(Box::new(LapViewerApp::new(input.as_ref(), cc)))),
    )
    .expect("could not start app");
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    match cli.command {
        Some(Commands::Load { input }) => {
            viewer(Some(input)).expect("Error while viewing telemetry lap")
        }
        None => viewer(None).expect("Error while starting viewer"),
    };
}
