use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process::exit;

use clap::{App, Arg};
use log::{error, Level};

fn main() {
    simple_logger::init_with_level(Level::Info).unwrap();

    let matches = App::new("jpeg2bmp")
        .about("Decodes baseline JPEG images and writes them as 24-bit BMP files")
        .arg(
            Arg::with_name("INPUT")
                .help("JPEG file(s) to decode")
                .required(true)
                .multiple(true),
        )
        .get_matches();

    let inputs: Vec<&str> = matches.values_of("INPUT").unwrap().collect();
    let mut any_failed = false;

    for path in inputs {
        if let Err(e) = decode_one(path) {
            error!("{}: {:?}", path, e);
            any_failed = true;
        }
    }

    if any_failed {
        exit(1);
    }
}

fn decode_one(path: &str) -> Result<(), baseline_jpeg_bmp::DecodeErrors> {
    let jpeg_bytes = std::fs::read(path)?;
    let out_path = sibling_bmp_path(path);
    let file = File::create(&out_path)?;
    let mut writer = BufWriter::new(file);
    baseline_jpeg_bmp::decode_to_bmp(&jpeg_bytes, &mut writer)
}

fn sibling_bmp_path(path: &str) -> String {
    match Path::new(path).extension() {
        Some(_) => {
            let dot = path.rfind('.').unwrap();
            format!("{}.bmp", &path[..dot])
        }
        None => format!("{}.bmp", path),
    }
}
