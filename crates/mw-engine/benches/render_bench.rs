use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mw_engine::{render_module, resample, RenderConfig};
use mw_ir::{Format, Instrument, Module, Note, Pattern};

fn busy_module() -> Module {
    let mut module = Module::new("bench", Format::from_tag(*b"M.K."));
    let data: Vec<u8> = (0..2048u32).map(|i| ((i * 7) % 256) as u8).collect();
    module.instruments[1] = Some(Instrument {
        length: 1024,
        volume: 64,
        loop_offset: 256,
        loop_length: 768,
        data,
        ..Default::default()
    });

    let periods = [428, 381, 339, 320, 285, 254, 226, 214];
    let mut pattern = Pattern::new(4);
    for row in 0..64 {
        for ch in 0..4u8 {
            if (row + ch as usize) % 4 == 0 {
                *pattern.note_mut(row, ch) = Note {
                    instrument: 1,
                    period: periods[(row / 4 + ch as usize) % periods.len()],
                    ..Note::empty()
                };
            }
        }
    }
    module.patterns.push(pattern);
    module.set_order(&[0, 0, 0, 0]);
    module
}

fn bench_render(c: &mut Criterion) {
    let module = busy_module();
    let config = RenderConfig::default().with_tail_seconds(0);
    c.bench_function("render_4_positions", |b| {
        b.iter(|| render_module(black_box(&module), black_box(&config)))
    });
}

fn bench_resample(c: &mut Criterion) {
    let data: Vec<u8> = (0..8192u32).map(|i| (i % 256) as u8).collect();
    c.bench_function("resample_8k_period_214", |b| {
        b.iter(|| resample(black_box(&data), black_box(214), 44100))
    });
}

criterion_group!(benches, bench_render, bench_resample);
criterion_main!(benches);
