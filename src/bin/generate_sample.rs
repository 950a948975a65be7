use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// State label, baseline mean income (RM), baseline poverty (%), baseline Gini, districts.
const STATES: &[(&str, f64, f64, f64, &[&str])] = &[
    (
        "Johor",
        6900.0,
        3.9,
        0.35,
        &[
            "Batu Pahat",
            "Johor Bahru",
            "Kluang",
            "Kota Tinggi",
            "Muar",
            "Segamat",
        ],
    ),
    (
        "Kedah",
        4900.0,
        8.8,
        0.35,
        &[
            "Alor Setar",
            "Baling",
            "Kubang Pasu",
            "Kuala Muda",
            "Langkawi",
        ],
    ),
    (
        "Kelantan",
        4200.0,
        12.4,
        0.37,
        &[
            "Bachok",
            "Kota Bharu",
            "Pasir Mas",
            "Tanah Merah",
            "Tumpat",
        ],
    ),
    ("Melaka", 6900.0, 3.9, 0.35, &["Alor Gajah", "Jasin", "Melaka Tengah"]),
    (
        "Negeri Sembilan",
        6000.0,
        4.3,
        0.35,
        &[
            "Jelebu",
            "Kuala Pilah",
            "Port Dickson",
            "Rembau",
            "Seremban",
        ],
    ),
    (
        "Pahang",
        5300.0,
        4.3,
        0.33,
        &[
            "Bentong",
            "Cameron Highlands",
            "Kuantan",
            "Pekan",
            "Temerloh",
        ],
    ),
    ("Pulau Pinang", 7600.0, 1.9, 0.36, &["Barat Daya", "S.P. Tengah", "S.P. Utara", "Timur Laut"]),
    (
        "Perak",
        5200.0,
        5.8,
        0.36,
        &[
            "Batang Padang",
            "Kinta",
            "Larut dan Matang",
            "Manjung",
            "Muallim",
        ],
    ),
    ("Perlis", 4600.0, 3.9, 0.34, &["Perlis"]),
    ("Selangor", 10800.0, 1.2, 0.39, &["Gombak", "Hulu Langat", "Klang", "Petaling", "Sepang"]),
    (
        "Terengganu",
        6800.0,
        6.1,
        0.34,
        &[
            "Besut",
            "Dungun",
            "Kemaman",
            "Kuala Terengganu",
            "Marang",
        ],
    ),
    ("Sabah", 5700.0, 19.5, 0.40, &["Beaufort", "Keningau", "Kota Kinabalu", "Sandakan", "Tawau"]),
    ("Sarawak", 5900.0, 9.0, 0.39, &["Bintulu", "Kuching", "Miri", "Sibu", "Sri Aman"]),
    ("W.P. Kuala Lumpur", 13300.0, 0.2, 0.35, &["W.P. Kuala Lumpur"]),
    ("W.P. Labuan", 8300.0, 3.1, 0.37, &["W.P. Labuan"]),
    ("W.P. Putrajaya", 16800.0, 0.4, 0.31, &["W.P. Putrajaya"]),
];

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
}

#[derive(Debug, Serialize)]
struct Row {
    state: &'static str,
    district: &'static str,
    income_mean: f64,
    income_median: f64,
    expenditure_mean: f64,
    poverty: f64,
    gini: f64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(state, income, poverty, gini, districts) in STATES {
        for &district in districts {
            // Richer districts get less poverty and slightly more inequality.
            let factor = rng.gauss(1.0, 0.15).clamp(0.6, 1.6);
            let income_mean = (income * factor).round();
            let income_median = (income_mean * rng.gauss(0.8, 0.03).clamp(0.7, 0.9)).round();
            let expenditure_mean = (income_mean * rng.gauss(0.65, 0.05).clamp(0.5, 0.8)).round();
            let poverty = ((poverty / factor) * rng.gauss(1.0, 0.2).clamp(0.5, 1.5) * 10.0)
                .round()
                .max(0.0)
                / 10.0;
            let gini = ((gini + 0.03 * (factor - 1.0) + rng.gauss(0.0, 0.01)).clamp(0.25, 0.5)
                * 1000.0)
                .round()
                / 1000.0;

            rows.push(Row {
                state,
                district,
                income_mean,
                income_median,
                expenditure_mean,
                poverty,
                gini,
            });
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("state", DataType::Utf8, false),
        Field::new("district", DataType::Utf8, false),
        Field::new("income_mean", DataType::Float64, false),
        Field::new("income_median", DataType::Float64, false),
        Field::new("expenditure_mean", DataType::Float64, false),
        Field::new("poverty", DataType::Float64, false),
        Field::new("gini", DataType::Float64, false),
    ]));

    let float_column = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.state).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.district).collect::<Vec<_>>())),
            float_column(|r| r.income_mean),
            float_column(|r| r.income_median),
            float_column(|r| r.expenditure_mean),
            float_column(|r| r.poverty),
            float_column(|r| r.gini),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    arrow::util::pretty::print_batches(&[batch.slice(0, batch.num_rows().min(5))])
        .context("printing preview")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv("hies_district.csv", &rows)?;
    write_parquet("hies_district.parquet", &rows)?;

    println!(
        "Wrote {} districts across {} states to hies_district.csv and hies_district.parquet",
        rows.len(),
        STATES.len()
    );
    Ok(())
}
