use edit_regions::config::demo::{self, Method, RuntimeConfig};
use edit_regions::diagnostics::DetectionReport;
use edit_regions::image::io::{load_color_image, save_change_field_png, write_json_file, RgbBuffer};
use edit_regions::report::{format_edit_regions_for_prompt, PromptRegion};
use edit_regions::{EditDetector, PerceptualDetector};
use serde::Serialize;
use std::env;
use std::path::Path;
use std::thread;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: edit_regions_demo <config.json>".to_string()
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = demo::load_config(Path::new(&config_path))?;

    let original = load_color_image(&config.original).map_err(|e| e.to_string())?;
    let edited = load_color_image(&config.edited).map_err(|e| e.to_string())?;

    match config.method {
        Method::Block | Method::Pixel => {
            let detector = EditDetector::new(config.edit_options());
            let report = detector
                .detect_with_diagnostics(view(&original)?, view(&edited)?)
                .map_err(|e| e.to_string())?;
            emit(&config, &report, 1.0 / 100.0)
        }
        Method::Perceptual => {
            let detector = PerceptualDetector::new(config.perceptual.clone());
            // Patch scoring is the slow part; keep it off the main thread.
            let report = thread::scope(|scope| {
                scope
                    .spawn(|| {
                        detector
                            .detect_with_diagnostics(view(&original)?, view(&edited)?)
                            .map_err(|e| e.to_string())
                    })
                    .join()
                    .map_err(|_| "perceptual worker panicked".to_string())?
            })?;
            emit(&config, &report, 1.0)
        }
    }
}

fn view(buffer: &RgbBuffer) -> Result<edit_regions::image::ColorImage<'_>, String> {
    buffer.as_view().map_err(|e| e.to_string())
}

fn emit<R>(config: &RuntimeConfig, report: &DetectionReport<R>, heat_scale: f32) -> Result<(), String>
where
    R: PromptRegion + Serialize,
{
    if !config.output.quiet {
        println!("{}", format_edit_regions_for_prompt(&report.result));
    }
    eprintln!("{:?}: {}", config.method, report.trace.summary());

    if let Some(path) = &config.output.json_out {
        write_json_file(path, report)?;
        eprintln!("JSON report written to {}", path.display());
    }
    if let Some(path) = &config.output.heatmap_out {
        save_change_field_png(&report.field, heat_scale, path).map_err(|e| e.to_string())?;
        eprintln!("Change field written to {}", path.display());
    }
    Ok(())
}
