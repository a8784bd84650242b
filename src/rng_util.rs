/// Mix a stream seed with a sample index into a generator seed (`SplitMix64`
/// finalizer), so neighbouring indices get unrelated streams.
#[inline]
pub(crate) fn mix_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed ^ index.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Fill `out` with independent uniform variates in `[0, 1)` for sample `index`.
///
/// The generator depends only on `(seed, index)`, which keeps tabulation
/// reproducible for any batch size or worker count.
#[inline]
pub(crate) fn fill_uniform(seed: u64, index: u64, out: &mut [f64]) {
    let mut rng = fastrand::Rng::with_seed(mix_seed(seed, index));
    for u in out.iter_mut() {
        *u = rng.f64();
    }
}
