use canon_player::dataset::{self, GameRecord, NpySink, StateLayout};
use canon_player::encoder::EncodedState;
use clap::Parser;
use indicatif::ProgressIterator;
use std::fs;
use std::path::PathBuf;

const RECORD_INPUT_GLOB: &str = "../resources/records/*.txt";
const STATES_OUTPUT_PATH: &str = "../resources/preprocessed/states.npy";
const LABELS_OUTPUT_PATH: &str = "../resources/preprocessed/labels.npy";

/// Encode annotated game records into a training dataset.
#[derive(Parser)]
#[command(name = "preprocess_records")]
#[command(about, long_about = None)]
struct Args {
    /// Glob matching the record files to convert.
    #[arg(long, default_value = RECORD_INPUT_GLOB)]
    input: String,

    /// Where to write the encoded states.
    #[arg(long, default_value = STATES_OUTPUT_PATH)]
    states: PathBuf,

    /// Where to write the labels.
    #[arg(long, default_value = LABELS_OUTPUT_PATH)]
    labels: PathBuf,

    /// Store each state as 128 bytes of plane bitboards instead of one byte per value.
    #[arg(long)]
    packed: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Reading game records from {}", args.input);
    let paths = glob::glob(&args.input)?.collect::<Result<Vec<PathBuf>, _>>()?;

    let layout = if args.packed {
        StateLayout::Packed
    } else {
        StateLayout::Planes
    };
    let mut sink = NpySink::new(layout);
    let mut rejected = 0;

    for path in paths.iter().progress() {
        let replayed = fs::read_to_string(path)
            .map_err(|err| err.to_string())
            .and_then(|text| text.parse::<GameRecord>().map_err(|err| err.to_string()))
            .and_then(|record| {
                // A rejected record must leave no examples behind.
                let mut examples: Vec<(EncodedState, f32)> = Vec::new();
                dataset::replay_record(&record.moves, &record.evaluations, &mut examples)
                    .map(|_| examples)
                    .map_err(|err| err.to_string())
            });

        match replayed {
            Ok(examples) => sink.extend(examples),
            Err(message) => {
                eprintln!("Skipping {}: {}", path.display(), message);
                rejected += 1;
            }
        }
    }

    println!(
        "Converted {} of {} records into {} examples.",
        paths.len() - rejected,
        paths.len(),
        sink.len()
    );

    println!(
        "Writing data to {} and {}",
        args.states.display(),
        args.labels.display()
    );
    sink.write(&args.states, &args.labels)?;

    println!("Done!");
    Ok(())
}
