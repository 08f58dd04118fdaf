use std::hint::black_box;

use bencher::{DELETE_SMALL, GET_CHUNKED, GET_LARGE, TestCase};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use micro_transport::codec::{HeaderCodec, ResponseDecoder};
use micro_transport::protocol::{Message, PayloadItem};
use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("small_no_content", DELETE_SMALL),
        TestCase::without_body("large_head_only", GET_LARGE),
        TestCase::new("large_content_length", GET_LARGE),
        TestCase::new("large_chunked", GET_CHUNKED),
    ]
}

fn benchmark_response_decoder(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("response_decoder");

    for case in create_test_cases() {
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            b.iter_batched_ref(
                || BytesMut::from(case.file().content()),
                |bytes_mut| {
                    let mut decoder = ResponseDecoder::new(case.reads_body());
                    let mut body_len = 0;
                    loop {
                        match decoder.decode(bytes_mut).expect("input should be a valid http response") {
                            Some(Message::Header(header)) => {
                                black_box(header);
                            }
                            Some(Message::Payload(PayloadItem::Chunk(bytes))) => body_len += bytes.len(),
                            Some(Message::Payload(PayloadItem::Eof)) | None => break,
                        }
                    }
                    black_box(body_len);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_header_block_parse(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("header_block_parse");

    for file in [DELETE_SMALL, GET_LARGE] {
        group.throughput(Throughput::Bytes(file.head().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(file.file_name()), &file, |b, file| {
            b.iter(|| {
                let lines = HeaderCodec::parse(file.head().as_bytes()).expect("reading from a slice can't fail");
                black_box(HeaderCodec::find(&lines, "content-type"));
            });
        });
    }

    group.finish();
}

criterion_group!(decoder, benchmark_response_decoder, benchmark_header_block_parse);
criterion_main!(decoder);
