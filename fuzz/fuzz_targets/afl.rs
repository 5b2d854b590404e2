fn main() {
    afl::fuzz!(|data: &[u8]| {
        firestore_codec_fuzz::test(data);
    });
}
