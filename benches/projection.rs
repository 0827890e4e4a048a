use criterion::{black_box, criterion_group, criterion_main, Criterion};
use overlay_bridge::memory::MemoryImage;
use overlay_bridge::{Address, Matrix4x4, MemoryAccessor, Projector, Vector3, WriteStrategy};

fn perspective() -> Matrix4x4 {
    let mut matrix = Matrix4x4::IDENTITY;
    matrix.m[2][3] = 1.0;
    matrix.m[3][3] = 0.0;
    matrix
}

fn benchmark_projection(c: &mut Criterion) {
    let mut projector = Projector::new();
    projector.set_projection(perspective());
    projector.set_viewport(1920, 1080);

    let points: Vec<Vector3> = (0..1000)
        .map(|i| {
            let f = i as f32;
            Vector3::new(f.sin() * 50.0, f.cos() * 50.0, (i % 200) as f32 - 20.0)
        })
        .collect();

    c.bench_function("world_to_screen_1000", |b| {
        b.iter(|| {
            let visible = points
                .iter()
                .filter_map(|p| projector.world_to_screen(black_box(*p)))
                .filter(|s| projector.is_on_screen(*s))
                .count();
            black_box(visible)
        });
    });
}

fn benchmark_frame_reads(c: &mut Criterion) {
    let base = Address::new(0x10000);
    let mut bytes = bytemuck::bytes_of(&perspective()).to_vec();
    for i in 0..64 {
        bytes.extend_from_slice(bytemuck::bytes_of(&Vector3::new(i as f32, 0.0, 10.0)));
    }
    let image = MemoryImage::new(1).with_region(base, bytes);
    let memory = MemoryAccessor::new(Box::new(image), WriteStrategy::Standard);

    c.bench_function("frame_matrix_and_64_points", |b| {
        b.iter(|| {
            let matrix = memory.read_matrix(black_box(base)).unwrap_or_default();
            let mut sum = matrix.m[3][3];
            for i in 0..64 {
                let point = memory
                    .read_vector3(base.offset(64 + i * 12))
                    .unwrap_or_default();
                sum += point.x;
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, benchmark_projection, benchmark_frame_reads);
criterion_main!(benches);
