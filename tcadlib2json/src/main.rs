use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;

use tcadlib::ShapeLibrary;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: tcadlib2json <library-path>");
        process::exit(2);
    }
    let library_path = &args[1];
    let mut json_path = library_path.clone();
    json_path.push_str(".json");

    let library = ShapeLibrary::load_file(library_path)?;
    let json = serde_json::to_string_pretty(&library)?;

    let file = File::create(&json_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json.as_bytes())?;
    writer.flush()?;
    info!(path = %json_path, "wrote json");
    Ok(())
}
