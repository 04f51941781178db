use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dxf_blocks::{AttributeDefinition, Block, EntityObject, EntityRef, Handle};

fn make_entities(count: u64) -> Vec<EntityRef> {
    (1..=count)
        .map(|i| EntityObject::new(Handle::new(i), "LINE").into_ref())
        .collect()
}

fn bench_add_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_entities");
    for size in [100u64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_with_setup(
                || make_entities(size),
                |items| {
                    let block = Block::with_content("Bench", items, Vec::new())
                        .expect("fresh entities are unowned");
                    black_box(block.entities().len())
                },
            );
        });
    }
    group.finish();
}

fn bench_hooked_transfer(c: &mut Criterion) {
    c.bench_function("transfer_with_hooks_1000", |b| {
        b.iter_with_setup(
            || {
                let mut source = Block::with_content("Source", make_entities(1_000), Vec::new())
                    .expect("fresh entities are unowned");
                source.on_entity_removed(|args| {
                    black_box(args.item().handle());
                });
                let mut target = Block::new("Target").expect("valid name");
                target.entities_mut().set_before_add(|item| {
                    item.layer = "Moved".to_string();
                    Ok(())
                });
                (source, target)
            },
            |(mut source, mut target)| {
                for i in 1..=1_000u64 {
                    let item = source
                        .entities_mut()
                        .remove(&Handle::new(i))
                        .expect("entity is present");
                    target.entities_mut().add(item).expect("released entity can move");
                }
                black_box(target.entities().len())
            },
        );
    });
}

fn bench_attribute_lookup(c: &mut Criterion) {
    let definitions: Vec<_> = (0..500)
        .map(|i| {
            AttributeDefinition::new(format!("Tag{i}"))
                .expect("valid tag")
                .into_ref()
        })
        .collect();
    let block = Block::with_content("Lookup", Vec::new(), definitions).expect("valid block");
    let probes: Vec<String> = (0..500).map(|i| format!("tag{i}")).collect();

    c.bench_function("attribute_lookup_case_insensitive_500", |b| {
        b.iter(|| {
            probes
                .iter()
                .filter(|tag| block.attribute_definitions().contains_key(tag))
                .count()
        })
    });
}

criterion_group!(
    benches,
    bench_add_entities,
    bench_hooked_transfer,
    bench_attribute_lookup
);
criterion_main!(benches);
