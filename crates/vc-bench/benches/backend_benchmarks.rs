//! Backend Benchmarks
//!
//! Compares the four difference backends on identical inputs, so the
//! boundary-crossing overhead of the foreign adapters is visible next to the
//! in-process kernels.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use vc_bench::{BUFFER_SIZES, generate_track_pair};
use vc_bridge::{BridgeConfig, BridgeRuntime, InnerKernel};
use vc_core::{BackendId, DifferenceKernel};
use vc_dsp::{ScalarBackend, VectorBackend};

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("backends");
    let bridge = BridgeRuntime::load(BridgeConfig::default());
    let scalar = ScalarBackend::new();
    let vector = VectorBackend::new();

    for &size in BUFFER_SIZES {
        let (a, b) = generate_track_pair(size, 42);
        group.throughput(Throughput::Bytes(size as u64));

        for backend in BackendId::ALL {
            let kernel: &dyn DifferenceKernel = match backend {
                BackendId::Scalar => &scalar,
                BackendId::Vector => &vector,
                _ => match bridge.kernel(backend) {
                    Some(kernel) => kernel,
                    None => continue,
                },
            };
            group.bench_with_input(BenchmarkId::new(backend.name(), size), &size, |bench, _| {
                bench.iter(|| kernel.difference(black_box(&a), black_box(&b)))
            });
        }
    }

    group.finish();
}

fn bench_inner_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("direct_inner_kernel");
    let (a, b) = generate_track_pair(1 << 20, 7);
    group.throughput(Throughput::Bytes(a.len() as u64));

    for inner in [InnerKernel::Vector, InnerKernel::Scalar] {
        let bridge = BridgeRuntime::load(BridgeConfig {
            inner,
            ..Default::default()
        });
        group.bench_function(format!("{:?}", inner).to_lowercase(), |bench| {
            bench.iter(|| bridge.direct().difference(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_backends, bench_inner_kernel);
criterion_main!(benches);
