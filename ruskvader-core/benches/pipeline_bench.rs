#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use ruskvader_core::{
    ImpairmentConfig, ImpairmentPipeline, InjectionSink, Packet, PacketRng, SharedConfig, WireError,
};

struct NullSink;

impl InjectionSink for NullSink {
    fn inject(&self, _frame: &[u8]) -> Result<(), WireError> {
        Ok(())
    }
}

/// Benchmark per-packet pipeline overhead with every stage disabled, i.e.
/// the fixed cost paid even by unimpaired traffic.
fn benchmark_pipeline_throughput(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let pipeline = ImpairmentPipeline::new(
        SharedConfig::new(ImpairmentConfig::default()),
        Arc::new(PacketRng::seeded(42)),
        Arc::new(NullSink),
        CancellationToken::new(),
    );
    let packets_per_iter = 10_000;

    c.bench_function("pipeline_throughput", |b| {
        b.iter(|| {
            runtime.block_on(async {
                for _ in 0..packets_per_iter {
                    let packet = Packet::new(vec![0u8; 256], 1);
                    black_box(pipeline.process(packet).await);
                }
            })
        })
    });
}

criterion_group!(benches, benchmark_pipeline_throughput);
criterion_main!(benches);
