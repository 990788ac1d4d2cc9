//! Command-line interface for assay_colors
//!
//! Basic CLI tool for testing sample classification

use std::{env, path::Path, process};

use assay_colors::visualize::PngBarSink;
use assay_colors::{ClassifierConfig, SampleClassifier};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut bar_path = None;
    let mut image_path_arg = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    process::exit(1);
                }
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--bar" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --bar requires a file path");
                    process::exit(1);
                }
                bar_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let image_path_str = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };
    let image_path = Path::new(&image_path_str);

    let config = match config_path {
        Some(path) => match ClassifierConfig::from_json_file(Path::new(&path)) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Invalid configuration: {}", error);
                process::exit(1);
            }
        },
        None => ClassifierConfig::default(),
    };

    let mut classifier = match SampleClassifier::from_config(&config) {
        Ok(classifier) => classifier,
        Err(error) => {
            eprintln!("Failed to build classifier: {}", error);
            process::exit(1);
        }
    };
    if let Some(path) = bar_path {
        classifier.set_diagnostics(Box::new(PngBarSink::new(path)));
    }

    match classifier.classify_file(image_path) {
        Ok(label) => {
            print_result(&label, &classifier);
        }
        Err(error) => {
            eprintln!("Classification failed: {}", error);
            if error.is_recoverable() {
                eprintln!("Suggestion: {}", error.user_message());
            }
            process::exit(1);
        }
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Estimate the analyte concentration of a colorimetric test sample.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE    Load classifier configuration from a JSON file");
    eprintln!("  --bar FILE       Save the cluster frequency bar as a PNG");
    eprintln!("  --help, -h       Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} sample.jpg", program_name);
    eprintln!("  {} --bar clusters.png sample.jpg", program_name);
}

fn print_result(label: &str, classifier: &SampleClassifier) {
    // Print JSON to stdout for programmatic use
    let payload = serde_json::json!({
        "label": label,
        "distances": classifier.last_distances(),
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{{\"label\": \"{}\"}}", label),
    }

    // Print summary to stderr for human reading
    eprintln!();
    eprintln!("Classification Summary:");
    eprintln!("  Concentration: {}", label);
    if let Some(nearest) = classifier
        .last_distances()
        .iter()
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
    {
        eprintln!(
            "  Nearest reference: {} (deltaE = {:.2})",
            nearest.label, nearest.distance
        );
    }
}
