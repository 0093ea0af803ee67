use queens_generator::collection::{generate_collection, BoardCollection, GenerationConfig};
use std::fs::{self, File};
use std::io;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;

/// Runs the generation loop against the `maps.json` collection in
/// `output_directory`, resuming from whatever the file already holds.
pub fn run(output_directory: &Path, config: &GenerationConfig) -> io::Result<()> {
    fs::create_dir_all(output_directory)?;

    let file_name = output_directory.join("maps.json");
    let collection = load_collection(&file_name)?;

    let collection = generate_collection(config, collection)
        .map_err(|error| io::Error::new(ErrorKind::Other, error))?;

    let file = BufWriter::new(File::create(&file_name)?);
    serde_json::to_writer_pretty(file, &collection)?;

    println!("Saved collection to {}", file_name.display());

    Ok(())
}

fn load_collection(file_name: &Path) -> io::Result<BoardCollection> {
    match File::open(file_name) {
        Ok(file) => Ok(serde_json::from_reader(BufReader::new(file))?),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(BoardCollection::new()),
        Err(error) => Err(error),
    }
}
