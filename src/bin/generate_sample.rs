//! Writes `sample_data.csv` in the dashboard's source schema: one row
//! per entity, a `level` discriminator, and one column per
//! year/metric pair. Business tenure columns stop at 2024, matching
//! the real export.

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

const FIRST_YEAR: i32 = 2015;
const FINAL_YEAR: i32 = 2025;
/// Tenure observations end a year early in the real export.
const TENURE_LAST_YEAR: i32 = 2024;

struct Entity {
    name: &'static str,
    level: &'static str,
    /// Baselines: franchise ratio (%), rent (₩/m²), closure rate (%),
    /// tenure (years).
    base: [f64; 4],
    /// Years before this are left blank, so completeness filtering has
    /// something to chew on.
    data_from: i32,
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let entities = [
        Entity { name: "Seongsu-dong", level: "neighborhood", base: [14.0, 180_000.0, 4.5, 7.0], data_from: 2015 },
        Entity { name: "Yeonnam-dong", level: "neighborhood", base: [9.5, 150_000.0, 6.0, 5.5], data_from: 2015 },
        Entity { name: "Mangwon-dong", level: "neighborhood", base: [8.0, 120_000.0, 5.0, 6.5], data_from: 2015 },
        Entity { name: "Itaewon-dong", level: "neighborhood", base: [16.0, 210_000.0, 7.5, 6.0], data_from: 2015 },
        Entity { name: "Samcheong-dong", level: "neighborhood", base: [6.0, 160_000.0, 4.0, 9.0], data_from: 2015 },
        Entity { name: "Garosu-gil", level: "neighborhood", base: [19.0, 260_000.0, 8.0, 4.5], data_from: 2015 },
        Entity { name: "Ikseon-dong", level: "neighborhood", base: [7.0, 140_000.0, 5.5, 8.0], data_from: 2018 },
        Entity { name: "Haebangchon", level: "neighborhood", base: [5.5, 110_000.0, 6.5, 5.0], data_from: 2017 },
        Entity { name: "Seochon", level: "neighborhood", base: [6.5, 130_000.0, 4.8, 8.5], data_from: 2015 },
        Entity { name: "Euljiro", level: "neighborhood", base: [11.0, 170_000.0, 5.2, 10.0], data_from: 2015 },
        Entity { name: "Munrae-dong", level: "neighborhood", base: [7.5, 100_000.0, 5.8, 6.2], data_from: 2019 },
        Entity { name: "Yeonhui-dong", level: "neighborhood", base: [8.5, 145_000.0, 4.2, 7.8], data_from: 2015 },
        // Aggregates the loader must skip
        Entity { name: "Mapo-gu", level: "district", base: [10.0, 155_000.0, 5.0, 6.8], data_from: 2015 },
        Entity { name: "Jongno-gu", level: "district", base: [9.0, 165_000.0, 4.6, 8.2], data_from: 2015 },
    ];

    // ---- Header ----
    let mut header = vec!["name".to_string(), "level".to_string()];
    for year in FIRST_YEAR..=FINAL_YEAR {
        header.push(format!("{year}_franchise_ratio"));
        header.push(format!("{year}_ground_floor_rent"));
        header.push(format!("{year}_closure_rate"));
        if year <= TENURE_LAST_YEAR {
            header.push(format!("{year}avg_business_tenure"));
        }
    }

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer.write_record(&header).expect("Failed to write header");

    // ---- Rows ----
    for entity in &entities {
        let mut row = vec![entity.name.to_string(), entity.level.to_string()];
        let [franchise, rent, closure, tenure] = entity.base;

        for year in FIRST_YEAR..=FINAL_YEAR {
            let t = (year - FIRST_YEAR) as f64;
            if year < entity.data_from {
                row.push(String::new());
                row.push(String::new());
                row.push(String::new());
                if year <= TENURE_LAST_YEAR {
                    row.push(String::new());
                }
                continue;
            }

            // Gentle drift plus noise: franchising and rents creep up,
            // closure fluctuates, tenure ages slowly.
            let f = (franchise + 0.4 * t + rng.gauss(0.0, 0.6)).max(0.0);
            let r = (rent * (1.0 + 0.03 * t) + rng.gauss(0.0, 5_000.0)).max(0.0);
            let c = (closure + rng.gauss(0.0, 0.7)).max(0.0);
            row.push(format!("{f:.1}"));
            row.push(format!("{r:.0}"));
            row.push(format!("{c:.1}"));
            if year <= TENURE_LAST_YEAR {
                let b = (tenure + 0.15 * t + rng.gauss(0.0, 0.3)).max(0.0);
                row.push(format!("{b:.1}"));
            }
        }

        writer.write_record(&row).expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");
    println!(
        "Wrote {} entities ({} years each) to {output_path}",
        entities.len(),
        FINAL_YEAR - FIRST_YEAR + 1
    );
}
