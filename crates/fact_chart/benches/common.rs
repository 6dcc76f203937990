use std::time::Duration;

use criterion::{Criterion, Throughput};
use fact_chart::prelude::{ChartEntry, Element, Space};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

const SHAPE_POOL: [&str; 8] = [
    "line",
    "disk",
    "plane",
    "hoop",
    "sphere",
    "hyperboloid",
    "translation",
    "moment",
];

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

fn random_space(rng: &mut StdRng, max_elements: usize) -> Space {
    let count = rng.random_range(1..=max_elements);
    let elements = (0..count)
        .map(|_| {
            let name = SHAPE_POOL[rng.random_range(0..SHAPE_POOL.len())];
            let x = rng.random_range(-1.0..1.0f64);
            let z = rng.random_range(-1.0..1.0f64);
            Element::new(name).with_option("end", serde_json::json!([x, 1.0, z]))
        })
        .collect();
    Space::new(elements)
}

/// Deterministic entries with a few random shapes per space.
pub fn synthetic_entries(count: usize, seed: u64) -> Vec<ChartEntry> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let dof = (i % 6) as u32;
            let row = (i / 6) as u32 + 1;
            let freedom = random_space(&mut rng, 3);
            let constraint = random_space(&mut rng, 3);
            ChartEntry::new(dof, row, freedom, constraint)
        })
        .collect()
}
