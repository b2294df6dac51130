//! Read an XYZ point file, populate the index, and time a radius search
//! around one of the input points.
//!
//! ```text
//! cargo run --release --example radius_search -- points.txt [radius]
//! ```
//!
//! The first line of the file is treated as a header and skipped; coordinate
//! fields may be separated by whitespace or commas. Without a file argument
//! a random point cloud is generated so the demo runs standalone.

use std::env;
use std::fs;
use std::process::ExitCode;
use std::time::Instant;

use kd_index::kdtree::KdTree;
use rand::Rng;

const DIM: usize = 3;
const DEFAULT_RADIUS: f32 = 8.0;

struct Record {
    pos: [f32; DIM],
    index: usize,
}

fn parse_points(text: &str) -> Result<Vec<Record>, String> {
    let mut records = Vec::new();
    // Skip the header line.
    for (lineno, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty());
        let mut pos = [0.0f32; DIM];
        for coord in pos.iter_mut() {
            let field = fields
                .next()
                .ok_or_else(|| format!("line {}: expected {} coordinates", lineno + 1, DIM))?;
            *coord = field
                .parse::<f64>()
                .map_err(|err| format!("line {}: {}", lineno + 1, err))? as f32;
        }
        records.push(Record {
            pos,
            index: records.len(),
        });
    }
    Ok(records)
}

fn generate_points(count: usize) -> Vec<Record> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|index| Record {
            pos: [
                rng.gen_range(0.0..200.0),
                rng.gen_range(0.0..200.0),
                rng.gen_range(0.0..200.0),
            ],
            index,
        })
        .collect()
}

fn main() -> ExitCode {
    let mut args = env::args().skip(1);

    let records = match args.next() {
        Some(path) => {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    eprintln!("error opening {}: {}", path, err);
                    return ExitCode::FAILURE;
                }
            };
            match parse_points(&text) {
                Ok(records) => {
                    println!("read {} points from {}", records.len(), path);
                    records
                }
                Err(message) => {
                    eprintln!("error parsing {}: {}", path, message);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            let records = generate_points(100_000);
            println!("generated {} random points", records.len());
            records
        }
    };

    let radius: f32 = match args.next() {
        Some(raw) => match raw.parse() {
            Ok(radius) => radius,
            Err(err) => {
                eprintln!("invalid radius {:?}: {}", raw, err);
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_RADIUS,
    };

    if records.is_empty() {
        eprintln!("no points to index");
        return ExitCode::FAILURE;
    }

    let target = records[rand::thread_rng().gen_range(0..records.len())].pos;

    println!("populating the k-d tree with {} points...", records.len());
    let start = Instant::now();
    let mut tree: KdTree<Record, f32, DIM> = KdTree::with_capacity(records.len());
    for record in &records {
        tree.insert(record.pos, record);
    }
    println!("populated in {:.2?}", start.elapsed());

    println!(
        "searching around ({}, {}, {}) within {} units...",
        target[0], target[1], target[2], radius
    );
    let start = Instant::now();
    let mut results = match tree.within_unsorted(&target, radius) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("query failed: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let mut indices = Vec::with_capacity(results.len());
    while let Some(record) = results.current_payload() {
        indices.push(record.index);
        results.advance();
    }
    println!("search done in {:.2?}", start.elapsed());

    println!("resulting count: {}", indices.len());
    println!("resulting list:");
    for index in indices {
        println!("{}", index);
    }

    ExitCode::SUCCESS
}
