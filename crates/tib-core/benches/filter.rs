use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tib_core::filter::{EwtsFilter, StrSource};
use tib_core::translit::{Mode, TableConverter};

const SAMPLE: &str = "bkra shis bde legs/ sangs rgyas dang byang chub sems dpa' thams cad la phyag 'tshal lo/ ";

fn bench_filter(c: &mut Criterion) {
    let converter = TableConverter::new();
    let mut group = c.benchmark_group("filter");
    for repeat in [1usize, 16, 256] {
        let text = SAMPLE.repeat(repeat);
        group.bench_with_input(BenchmarkId::new("ewts", text.len()), &text, |b, text| {
            b.iter(|| {
                let mut filter = EwtsFilter::new(StrSource::new(text.as_str()), &converter, Mode::Ewts);
                filter.read_to_string().unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
