use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            firestore_codec_fuzz::test(data);
        });
    }
}
