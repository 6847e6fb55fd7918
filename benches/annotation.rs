use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use exomiser::genome::service::AnnotationService;
use exomiser::genome::txs::TranscriptProvider;
use exomiser::model::{ConfidenceInterval, VariantType};
use exomiser::vcf::read_sample_data;

fn service() -> AnnotationService {
    let provider = TranscriptProvider::load("tests/data/txs/txs.json").unwrap();
    AnnotationService::new(Arc::new(provider))
}

fn small_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate_variant");
    group.sample_size(500);
    group.confidence_level(0.99);

    let service = service();
    let vars = vec![
        "1:1010:T:C",
        "1:1054:G:A",
        "1:1055:C:CA",
        "1:1500:A:G",
        "1:2050:GCT:G",
        "1:3050:T:A",
        "1:12000:C:T",
        "1:20050:A:G",
    ];
    let vars: Vec<Vec<String>> = vars
        .iter()
        .map(|var| var.split(':').map(|s| s.to_string()).collect())
        .collect();

    group.bench_function("annotate", |b| {
        b.iter_batched(
            || vars.clone(),
            |vars| {
                vars.iter().for_each(|var| {
                    service.annotate_variant(&var[0], var[1].parse().unwrap(), &var[2], &var[3]);
                })
            },
            BatchSize::SmallInput,
        )
    });
    group.finish()
}

fn structural_variants(c: &mut Criterion) {
    let service = service();

    c.bench_function("annotate_structural_variant", |b| {
        b.iter(|| {
            for (variant_type, alt, start, end) in [
                (VariantType::Del, "<DEL>", 900, 3200),
                (VariantType::Dup, "<DUP>", 2050, 2080),
                (VariantType::Inv, "<INV>", 1500, 20500),
                (VariantType::Bnd, "N[1:20500[", 1500, 1500),
            ] {
                service.annotate_structural_variant(
                    variant_type,
                    alt,
                    "1",
                    start,
                    ConfidenceInterval::precise(),
                    "1",
                    end,
                    ConfidenceInterval::precise(),
                );
            }
        })
    });
}

fn vcf_file(c: &mut Criterion) {
    let service = service();

    c.bench_function("read_sample_data", |b| {
        b.iter(|| read_sample_data("tests/data/vcf/test.vcf", &service).unwrap())
    });
}

criterion_group!(benches, small_variants, structural_variants, vcf_file);
criterion_main!(benches);
