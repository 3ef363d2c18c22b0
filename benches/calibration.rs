use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use avhrr2mitiff::image_pipeline::{
    Acquisition, AvhrrToMitiffPipeline, ChannelCoefficients, ConversionConfig, MitiffWriter,
    RawChannel, RawImage, StandardMitiffWriter, TiffCompression,
};

fn generate_mock_pass(width: usize, height: usize) -> RawImage {
    let channels = (1..=5u8)
        .map(|id| {
            let mut samples = Vec::with_capacity(width * height);
            for y in 0..height {
                for x in 0..width {
                    samples.push(((x + y + usize::from(id) * 97) % 1023 + 1) as u16);
                }
            }
            let coefficients = if id <= 2 {
                ChannelCoefficients::new(0.0978, 0.0)
            } else {
                ChannelCoefficients::new(-0.12, 320.0)
            };
            RawChannel::new(id, samples, coefficients)
        })
        .collect();

    RawImage::new(
        width,
        height,
        channels,
        Acquisition {
            satellite_id: "NOAA-17".to_string(),
            year: 2005,
            month: 3,
            day: 15,
            hour: 8,
            minute: 46,
        },
    )
    .with_area("sn")
}

fn benchmark_calibration_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibration_by_size");

    let sizes = vec![
        (100, 100, "100x100"),
        (500, 500, "500x500"),
        (1000, 1000, "1000x1000"),
    ];

    for (width, height, label) in sizes {
        let pass = generate_mock_pass(width, height);

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &pass,
            |b, pass| {
                let pipeline = AvhrrToMitiffPipeline::new(ConversionConfig::default());

                b.iter(|| {
                    let _ = pipeline.process(black_box(pass));
                });
            },
        );
    }

    group.finish();
}

fn benchmark_parallel_channels(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_parallelism");
    let pass = generate_mock_pass(1000, 1000);

    for (parallel, label) in [(true, "parallel"), (false, "sequential")] {
        group.bench_function(label, |b| {
            let config = ConversionConfig::builder().parallel(parallel).build();
            let pipeline = AvhrrToMitiffPipeline::new(config);

            b.iter(|| {
                let _ = pipeline.process(black_box(&pass));
            });
        });
    }

    group.finish();
}

fn benchmark_compression_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("mitiff_compression");
    let pipeline = AvhrrToMitiffPipeline::new(ConversionConfig::default());
    let Ok(image) = pipeline.process(&generate_mock_pass(500, 500)) else {
        panic!("mock pass failed to calibrate");
    };

    let compressions = vec![
        (TiffCompression::None, "none"),
        (TiffCompression::Lzw, "lzw"),
        (TiffCompression::DeflateFast, "deflate_fast"),
    ];

    for (compression, label) in compressions {
        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &image,
            |b, image| {
                let config = ConversionConfig::builder()
                    .compression(compression)
                    .build();

                b.iter(|| {
                    let mut output = Vec::new();
                    let _ = StandardMitiffWriter.write_mitiff(black_box(image), &mut output, &config);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_calibration_sizes,
    benchmark_parallel_channels,
    benchmark_compression_methods
);
criterion_main!(benches);
