use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use tlnml::{ReadSource, Tokenizer, TokenizerConfig, tokenize, tokenize_with};
use tlnml_test_support::ChunkedReader;

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_blocks(blocks: usize) -> String {
    let block = "<sec id=\"s1\" kind=box><v|m:frac>1</v|>Ωmega &amp; &pm; text <br/></>\n\
                 {note kind=aside; more text}\n";
    let mut out = String::with_capacity(block.len() * blocks + 16);
    out.push_str("<doc>");
    for _ in 0..blocks {
        out.push_str(block);
    }
    out.push_str("</doc>");
    out
}

fn make_entity_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 8);
    while body.len() < bytes {
        body.push_str("&aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa ");
    }
    body
}

fn count_tokens(input: &str, config: TokenizerConfig) -> usize {
    tokenize_with(input, config, tlnml::EntityMap::default())
        .tokens
        .len()
}

fn bench_tokenize_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_tokenize_small", |b| {
        b.iter(|| black_box(count_tokens(black_box(&input), TokenizerConfig::hybrid())));
    });
}

fn bench_tokenize_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| black_box(count_tokens(black_box(&input), TokenizerConfig::hybrid())));
    });
}

fn bench_streaming_chunked(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    let bytes = input.as_bytes();
    c.bench_function("bench_streaming_chunked", |b| {
        b.iter_batched(
            || ReadSource::with_capacity(256, ChunkedReader::new(bytes, 7)),
            |source| {
                let mut tokenizer = Tokenizer::with_config(source, TokenizerConfig::hybrid());
                let mut count = 0usize;
                while !tokenizer
                    .next_token()
                    .expect("in-memory reader should not fail")
                    .token
                    .is_end_of_input()
                {
                    count += 1;
                }
                black_box(count);
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_tokenize_entity_adversarial(c: &mut Criterion) {
    let input = make_entity_adversarial(512 * 1024);
    c.bench_function("bench_tokenize_entity_adversarial", |b| {
        b.iter(|| {
            let stream = tokenize(black_box(&input));
            black_box(stream.errors.len());
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize_small,
    bench_tokenize_large,
    bench_streaming_chunked,
    bench_tokenize_entity_adversarial
);
criterion_main!(benches);
