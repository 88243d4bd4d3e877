/// u32-key radix sort over parallel index/value slices (SoA).
/// - Sorts by `inds` ascending
/// - Reorders `vals` along with their keys
/// - Stable for equal keys
///
/// Used to put sparse rows into canonical column order.
/// Complexity: 4 passes, each O(n + 256)
#[inline]
pub fn radix_sort_u32_soa<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    assert_eq!(inds.len(), vals.len());
    let n = inds.len();
    if n <= 1 {
        return;
    }

    // Small rows are the common case (ntop is usually tiny)
    if n <= 32 {
        insertion_sort_u32_soa(inds, vals);
        return;
    }

    let mut inds_tmp = vec![0u32; n];
    let mut vals_tmp: Vec<N> = vals.to_vec();

    // 4 passes: byte 0..3 (LSD), ping-pong between the buffers
    for (pass, shift) in [0u32, 8, 16, 24].into_iter().enumerate() {
        let (src_i, src_v, dst_i, dst_v): (&[u32], &[N], &mut [u32], &mut [N]) = if pass % 2 == 0 {
            (&*inds, &*vals, &mut inds_tmp[..], &mut vals_tmp[..])
        } else {
            (&inds_tmp[..], &vals_tmp[..], &mut *inds, &mut *vals)
        };

        let mut count = [0usize; 256];
        for &k in src_i {
            count[((k >> shift) & 0xFF) as usize] += 1;
        }

        // prefix sum -> starting positions
        let mut sum = 0usize;
        for c in count.iter_mut() {
            let tmp = *c;
            *c = sum;
            sum += tmp;
        }

        for (&k, &v) in src_i.iter().zip(src_v.iter()) {
            let b = ((k >> shift) & 0xFF) as usize;
            let pos = count[b];
            count[b] = pos + 1;
            dst_i[pos] = k;
            dst_v[pos] = v;
        }
    }
    // even pass count: result is back in `inds`/`vals`
}

/// Tiny insertion sort for small n (SoA).
#[inline]
fn insertion_sort_u32_soa<N: Copy>(inds: &mut [u32], vals: &mut [N]) {
    let n = inds.len();
    for i in 1..n {
        let mut j = i;
        while j > 0 && inds[j] < inds[j - 1] {
            inds.swap(j, j - 1);
            vals.swap(j, j - 1);
            j -= 1;
        }
    }
}
