use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quake_dashboard::analyzers::DatasetSummary;
use quake_dashboard::config::LayoutConfig;
use quake_dashboard::dashboard::build_layout;
use quake_dashboard::processors::{extract_region, EqualWidthBins, EventCleaner};
use quake_dashboard::readers::EventReader;

const REGIONS: [&str; 5] = ["CA", "Alaska", "Nevada", "Chile", "Japan"];

// Synthetic USGS-style CSV with a sprinkling of gaps
fn create_test_csv(rows: usize) -> String {
    let mut csv = String::from(
        "time,latitude,longitude,depth,mag,place,Station Count,Azimuth Gap,Distance,RMS,horizontalError,magError,magNst\n",
    );
    for i in 0..rows {
        let lat = -60.0 + (i % 120) as f64;
        let lon = -170.0 + (i % 340) as f64;
        let mag = if i % 17 == 0 {
            String::new()
        } else {
            format!("{:.1}", (i % 70) as f64 / 10.0)
        };
        let rms = if i % 5 == 0 {
            String::new()
        } else {
            "0.12".to_string()
        };
        csv.push_str(&format!(
            "2024-{:02}-{:02}T{:02}:15:00.000Z,{},{},{},{},\"{} km NE of Town, {}\",12,80,0.3,{},0.5,0.1,9\n",
            i % 12 + 1,
            i % 28 + 1,
            i % 24,
            lat,
            lon,
            (i % 300) as f64 + 0.5,
            mag,
            i % 50,
            REGIONS[i % REGIONS.len()],
            rms
        ));
    }
    csv
}

fn benchmark_region_extraction(c: &mut Criterion) {
    let places = [
        Some("12 km SSW of Idyllwild, CA"),
        Some("Fiji region"),
        Some("South of the Fiji Islands, "),
        Some("5 km N of Town, Near Coast, Chile"),
        None,
    ];

    c.bench_function("region_extraction", |b| {
        b.iter(|| {
            let mut total = 0;
            for place in &places {
                total += extract_region(black_box(*place)).len();
            }
            black_box(total)
        })
    });
}

fn benchmark_binning(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| -90.0 + (i as f64) * 0.018).collect();

    c.bench_function("equal_width_binning", |b| {
        b.iter(|| {
            let bins = EqualWidthBins::fit(values.iter().copied(), 20).unwrap();
            let assigned = values.iter().filter_map(|v| bins.assign(*v)).count();
            black_box(assigned)
        })
    });
}

fn benchmark_cleaning_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_by_size");
    let reader = EventReader::new();

    for &size in &[100, 1_000, 10_000] {
        let table = reader.parse_str(&create_test_csv(size)).unwrap();
        group.bench_with_input(BenchmarkId::new("rows", size), &table, |b, table| {
            let cleaner = EventCleaner::new(num_cpus::get());
            b.iter(|| {
                let (dataset, report) = cleaner.clean(table.clone()).unwrap();
                black_box((dataset.len(), report.total_zero_filled()))
            })
        });
    }

    group.finish();
}

fn benchmark_parse_and_layout(c: &mut Criterion) {
    let csv = create_test_csv(5_000);

    c.bench_function("parse_clean_layout_5k", |b| {
        b.iter(|| {
            let table = EventReader::new().parse_str(black_box(&csv)).unwrap();
            let (dataset, _) = EventCleaner::new(num_cpus::get()).clean(table).unwrap();
            let summary = DatasetSummary::from_dataset(&dataset).unwrap();
            black_box(build_layout(&summary, &LayoutConfig::default()))
        })
    });
}

criterion_group!(
    benches,
    benchmark_region_extraction,
    benchmark_binning,
    benchmark_cleaning_by_size,
    benchmark_parse_and_layout
);
criterion_main!(benches);
