#![no_main]
use chatstream_decoder::StreamDecoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&cut, body)) = data.split_first() else {
        return;
    };

    let mut whole = StreamDecoder::new();
    let expected = whole.feed(body);

    // Same bytes, split at a fuzzer-chosen offset: must decode identically.
    let cut = usize::from(cut).min(body.len());
    let mut split = StreamDecoder::new();
    let mut got = split.feed(&body[..cut]);
    got.extend(split.feed(&body[cut..]));

    assert_eq!(expected, got);
    assert!(whole.finish().is_empty());
    assert!(split.finish().is_empty());
});
