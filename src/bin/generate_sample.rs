use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Per-species measurement model: (mean, std dev) for bill length, bill
/// depth, flipper length and body mass.
struct SpeciesModel {
    name: &'static str,
    count: usize,
    islands: &'static [&'static str],
    measures: [(f64, f64); 4],
}

const SPECIES: &[SpeciesModel] = &[
    SpeciesModel {
        name: "Adelie",
        count: 152,
        islands: &["Torgersen", "Biscoe", "Dream"],
        measures: [(38.8, 2.7), (18.3, 1.2), (190.0, 6.5), (3700.0, 460.0)],
    },
    SpeciesModel {
        name: "Chinstrap",
        count: 68,
        islands: &["Dream"],
        measures: [(48.8, 3.3), (18.4, 1.1), (196.0, 7.1), (3733.0, 384.0)],
    },
    SpeciesModel {
        name: "Gentoo",
        count: 124,
        islands: &["Biscoe"],
        measures: [(47.5, 3.1), (15.0, 1.0), (217.0, 6.5), (5076.0, 504.0)],
    },
];

const MEASURE_COLUMNS: [&str; 4] = [
    "bill_length_mm",
    "bill_depth_mm",
    "flipper_length_mm",
    "body_mass_g",
];

/// Share of measurement cells left empty.
const MISSING_RATE: f64 = 0.03;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut species: Vec<&str> = Vec::new();
    let mut island: Vec<&str> = Vec::new();
    let mut sex: Vec<Option<&str>> = Vec::new();
    let mut measures: [Vec<Option<f64>>; 4] = Default::default();

    for model in SPECIES {
        for _ in 0..model.count {
            species.push(model.name);
            island.push(rng.pick(model.islands));
            sex.push(if rng.next_f64() < MISSING_RATE {
                None
            } else {
                Some(rng.pick(&["male", "female"]))
            });

            for (column, &(mean, sd)) in measures.iter_mut().zip(&model.measures) {
                let value = if rng.next_f64() < MISSING_RATE {
                    None
                } else {
                    // One decimal, like the field records.
                    Some((rng.gauss(mean, sd) * 10.0).round() / 10.0)
                };
                column.push(value);
            }
        }
    }
    let rows = species.len();

    // Write CSV
    let csv_path = "penguins.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    let mut header = vec!["species", "island"];
    header.extend(MEASURE_COLUMNS);
    header.push("sex");
    writer.write_record(&header).expect("Failed to write CSV header");
    for row in 0..rows {
        let mut record = vec![species[row].to_string(), island[row].to_string()];
        record.extend(
            measures
                .iter()
                .map(|col| col[row].map_or_else(|| "NA".to_string(), |v| v.to_string())),
        );
        record.push(sex[row].unwrap_or("NA").to_string());
        writer.write_record(&record).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Build Arrow arrays
    let mut fields = vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
    ];
    fields.extend(
        MEASURE_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, true)),
    );
    fields.push(Field::new("sex", DataType::Utf8, true));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<arrow::array::ArrayRef> = vec![
        Arc::new(StringArray::from(species)),
        Arc::new(StringArray::from(island)),
    ];
    for column in measures {
        columns.push(Arc::new(Float64Array::from(column)));
    }
    columns.push(Arc::new(StringArray::from(sex)));

    let batch = RecordBatch::try_new(schema.clone(), columns)
        .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "penguins.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {rows} penguins to {csv_path} and {parquet_path}");
}
