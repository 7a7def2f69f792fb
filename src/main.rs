//! Headless launcher: reads a task document, plots it, prints the symbolic
//! panel and the curve statistics, and saves the figure and the series when
//! the task asks for it.
//!
//! ```text
//! graphique [task file]      (default: graphique.task, else a built-in example)
//! ```
use graphique::Utils::logger::init_logger;
use graphique::Utils::series_stats::stats_table;
use graphique::Utils::task::{DEFAULT_TASK, Task};
use graphique::error::VisualizerError;
use graphique::visualizer::FunctionVisualizer;
use log::{debug, error, info};
use std::path::Path;
use std::process::ExitCode;

const DEFAULT_TASK_PATH: &str = "graphique.task";

fn load_task(arg: Option<String>) -> Result<Task, VisualizerError> {
    let task = match arg {
        Some(path) => Task::from_file(Path::new(&path))?,
        None if Path::new(DEFAULT_TASK_PATH).exists() => Task::from_file(Path::new(DEFAULT_TASK_PATH))?,
        None => DEFAULT_TASK.parse()?,
    };
    Ok(task)
}

fn run() -> Result<(), VisualizerError> {
    let task = load_task(std::env::args().nth(1))?;
    init_logger(&task.loglevel, task.log_file.as_deref())?;
    info!("Program started with loglevel: {}", task.loglevel);

    let mut visualizer = FunctionVisualizer::from_task(&task);
    visualizer.plot()?;
    println!("{}", visualizer.panel_text());

    if let Some(series) = visualizer.series() {
        println!("{}", stats_table(series));
    }

    // play the reveal off screen, one rendered frame per tick
    if visualizer.surface().is_animating() {
        let interval = visualizer.surface().timer_interval();
        loop {
            let more = visualizer.surface_mut().on_timer_tick();
            let frame = visualizer.surface().render_rgb()?;
            debug!(
                "reveal frame: {} samples, {} bytes",
                visualizer.surface().revealed_len(),
                frame.len()
            );
            if !more {
                break;
            }
            std::thread::sleep(interval);
        }
    }

    if let Some(path) = &task.save_to {
        visualizer.save_plot(path)?;
        println!("plot saved to {}", path.display());
    }
    if let Some(path) = &task.csv_to {
        visualizer.save_series_csv(path)?;
        println!("series saved to {}", path.display());
    }
    info!("Program ended");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error\n{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
