//! Compare Images Example
//!
//! Plays the part of the upload shell: validates two image files, hands their
//! bytes to the comparison engine and prints the report. ELA maps and their
//! heatmaps are written to the output directory.
//!
//! Run with: cargo run --example compare_images -- <original> <suspect> [output_dir] [--json]

use std::{env, fs, path::Path};

use image_compare_forensics::{
    ForensicsComparator, ImageInput,
    error::{ForensicsError, Result},
    report::visualization::Visualizer,
};

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

struct Upload {
    name: String,
    extension: String,
    bytes: Vec<u8>,
    modified: Option<std::time::SystemTime>,
}

fn load_upload(path: &Path) -> Result<Upload> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or_else(|| {
            ForensicsError::InvalidParameter(format!(
                "{}: expected one of {:?}",
                path.display(),
                ALLOWED_EXTENSIONS
            ))
        })?;

    let meta = fs::metadata(path)?;
    if meta.len() > MAX_UPLOAD_BYTES {
        return Err(ForensicsError::InvalidParameter(format!(
            "{}: {} bytes exceeds the {} byte limit",
            path.display(),
            meta.len(),
            MAX_UPLOAD_BYTES
        )));
    }

    Ok(Upload {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        extension,
        bytes: fs::read(path)?,
        modified: meta.modified().ok(),
    })
}

fn input_for(upload: &Upload) -> ImageInput<'_> {
    let input = ImageInput::new(&upload.bytes).with_format_hint_from_extension(&upload.extension);
    match upload.modified {
        Some(modified) => input.with_modified(modified),
        None => input,
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().collect::<Vec<_>>();
    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    if args.len() < 3 {
        println!("Usage: {} <original> <suspect> [output_dir] [--json]", args[0]);
        return Ok(());
    }

    let original = load_upload(Path::new(&args[1]))?;
    let suspect = load_upload(Path::new(&args[2]))?;
    let output_dir = args.get(3).map(|s| s.as_str()).unwrap_or("./output");

    let result = ForensicsComparator::new().compare(&input_for(&original), &input_for(&suspect));

    if json {
        let report = result.json_report(&original.name, &suspect.name);
        println!(
            "{}",
            report
                .to_json()
                .map_err(|e| ForensicsError::InvalidParameter(e.to_string()))?
        );
    } else {
        println!("{}", result.report(&original.name, &suspect.name));
    }

    fs::create_dir_all(output_dir)?;
    let visualizer = Visualizer::new();

    for (label, ela) in [("original", &result.ela_a), ("suspect", &result.ela_b)] {
        let Some(ela) = ela else {
            eprintln!("No ELA map for the {} image", label);
            continue;
        };

        let ela_path = Path::new(output_dir).join(format!("{}_ela.png", label));
        ela.save(&ela_path)?;
        visualizer
            .ela_heatmap(ela)
            .save(Path::new(output_dir).join(format!("{}_ela_heatmap.png", label)))?;

        eprintln!("Wrote {}", ela_path.display());
    }

    Ok(())
}
