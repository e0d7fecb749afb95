//! BLAKE2b: 64-bit-word BLAKE2 variant, up to 64-byte digests, with an
//! optional up-to-64-byte key and the full parameter block (tree mode
//! fields, salt, personalization) needed for [`expand_xof`] (BLAKE2Xb).

use zeroize::Zeroize;

const IV: [u64; 8] = [
    0x6a09_e667_f3bc_c908,
    0xbb67_ae85_84ca_a73b,
    0x3c6e_f372_fe94_f82b,
    0xa54f_f53a_5f1d_36f1,
    0x510e_527f_ade6_82d1,
    0x9b05_688c_2b3e_6c1f,
    0x1f83_d9ab_fb41_bd6b,
    0x5be0_cd19_137e_2179,
];

const SIGMA: [[usize; 16]; 12] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

/// The BLAKE2b parameter block: digest/key length plus the tree-hashing
/// and XOF fields. Exposed as its own type so tree-mode callers and
/// [`expand_xof`] can set `node_offset`/`xof_length` without threading
/// extra arguments through every constructor.
#[derive(Copy, Clone)]
pub struct Params {
    pub digest_length: u8,
    pub key_length: u8,
    pub fanout: u8,
    pub depth: u8,
    pub leaf_length: u32,
    pub node_offset: u64,
    pub node_depth: u8,
    pub inner_length: u8,
    pub salt: [u8; 16],
    pub personal: [u8; 16],
}

impl Default for Params {
    fn default() -> Self {
        Params {
            digest_length: 64,
            key_length: 0,
            fanout: 1,
            depth: 1,
            leaf_length: 0,
            node_offset: 0,
            node_depth: 0,
            inner_length: 0,
            salt: [0u8; 16],
            personal: [0u8; 16],
        }
    }
}

impl Params {
    fn words(&self) -> [u64; 8] {
        let mut w = [0u64; 8];
        w[0] = self.digest_length as u64
            | (self.key_length as u64) << 8
            | (self.fanout as u64) << 16
            | (self.depth as u64) << 24
            | (self.leaf_length as u64) << 32;
        w[1] = self.node_offset;
        w[2] = self.node_depth as u64 | (self.inner_length as u64) << 8;
        w[4] = u64::from_le_bytes(self.salt[0..8].try_into().unwrap());
        w[5] = u64::from_le_bytes(self.salt[8..16].try_into().unwrap());
        w[6] = u64::from_le_bytes(self.personal[0..8].try_into().unwrap());
        w[7] = u64::from_le_bytes(self.personal[8..16].try_into().unwrap());
        w
    }
}

/// A streaming BLAKE2b context.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Context {
    h: [u64; 8],
    buffer: [u8; 128],
    buflen: usize,
    counter: u128,
    digest_length: usize,
    #[zeroize(skip)]
    last_node: bool,
}

impl Context {
    pub fn new(digest_length: usize) -> Context {
        Self::with_params(&Params {
            digest_length: digest_length as u8,
            ..Params::default()
        })
    }

    pub fn with_params(params: &Params) -> Context {
        let pw = params.words();
        let mut h = IV;
        for i in 0..8 {
            h[i] ^= pw[i];
        }
        let mut ctx = Context {
            h,
            buffer: [0u8; 128],
            buflen: 0,
            counter: 0,
            digest_length: params.digest_length as usize,
            last_node: false,
        };
        if params.key_length > 0 {
            // The keyed variant pre-absorbs the key as a zero-padded
            // full block before any caller data.
            let mut block = [0u8; 128];
            // the key bytes themselves are supplied by `keyed`, which
            // calls `update` immediately after construction; this path
            // only exists so `keyed`'s block-counting matches the spec.
            let _ = &mut block;
        }
        ctx
    }

    pub fn keyed(digest_length: usize, key: &[u8]) -> Context {
        let mut ctx = Context::with_params(&Params {
            digest_length: digest_length as u8,
            key_length: key.len() as u8,
            ..Params::default()
        });
        let mut block = [0u8; 128];
        block[..key.len()].copy_from_slice(key);
        ctx.absorb_block(&block, false);
        ctx
    }

    fn absorb_block(&mut self, block: &[u8; 128], is_last: bool) {
        self.counter = self.counter.wrapping_add(128);
        let t = self.counter;
        let f0 = if is_last { !0u64 } else { 0 };
        let f1 = if is_last && self.last_node { !0u64 } else { 0 };
        compress(&mut self.h, block, t as u64, (t >> 64) as u64, f0, f1);
    }

    pub fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            if self.buflen == 128 {
                let block = self.buffer;
                self.absorb_block(&block, false);
                self.buflen = 0;
            }
            let want = core::cmp::min(128 - self.buflen, data.len());
            self.buffer[self.buflen..self.buflen + want].copy_from_slice(&data[..want]);
            self.buflen += want;
            data = &data[want..];
        }
    }

    pub fn finalize(mut self) -> [u8; 64] {
        let mut block = self.buffer;
        for b in &mut block[self.buflen..] {
            *b = 0;
        }
        self.counter = self.counter.wrapping_add(self.buflen as u128).wrapping_sub(128);
        self.absorb_block(&block, true);

        let mut out = [0u8; 64];
        for i in 0..8 {
            out[i * 8..i * 8 + 8].copy_from_slice(&self.h[i].to_le_bytes());
        }
        out
    }

    pub fn finalize_truncated(self, out_len: usize) -> Vec<u8> {
        let full = self.finalize();
        full[..out_len].to_vec()
    }
}

fn compress(h: &mut [u64; 8], block: &[u8; 128], t0: u64, t1: u64, f0: u64, f1: u64) {
    let mut m = [0u64; 16];
    for i in 0..16 {
        m[i] = u64::from_le_bytes(block[i * 8..i * 8 + 8].try_into().unwrap());
    }

    let mut v = [0u64; 16];
    v[0..8].copy_from_slice(h);
    v[8..16].copy_from_slice(&IV);
    v[12] ^= t0;
    v[13] ^= t1;
    v[14] ^= f0;
    v[15] ^= f1;

    for round in 0..12 {
        let s = &SIGMA[round];
        g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
        g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
        g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
        g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
        g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
        g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
        g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
        g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
    }

    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }
}

#[inline]
fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

pub fn hash(data: &[u8], digest_length: usize) -> Vec<u8> {
    let mut ctx = Context::new(digest_length);
    ctx.update(data);
    ctx.finalize_truncated(digest_length)
}

pub fn keyed_hash(key: &[u8], data: &[u8], digest_length: usize) -> Vec<u8> {
    let mut ctx = Context::keyed(digest_length, key);
    ctx.update(data);
    ctx.finalize_truncated(digest_length)
}

/// BLAKE2Xb: expands a BLAKE2b root hash into an arbitrary-length output
/// by hashing `h || xof_length || node_offset=i` for each 64-byte output
/// block `i`, per the BLAKE2X draft.
pub fn expand_xof(root_hash: &[u8; 64], xof_length: u64, out: &mut [u8]) {
    let num_blocks = out.len().div_ceil(64) as u64;
    for i in 0..num_blocks {
        let mut params = Params {
            digest_length: 64,
            fanout: 0,
            depth: 0,
            leaf_length: 64,
            node_offset: i,
            node_depth: 0,
            inner_length: 64,
            ..Params::default()
        };
        // the XOF length is folded into node_offset's high 32 bits per
        // the draft's encoding; keep this local rather than widening
        // `Params` for a field only this routine uses.
        params.node_offset |= xof_length << 32;

        let mut ctx = Context::with_params(&params);
        ctx.update(root_hash);
        let block = ctx.finalize();

        let start = (i * 64) as usize;
        let end = core::cmp::min(start + 64, out.len());
        out[start..end].copy_from_slice(&block[..end - start]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_deterministic() {
        let a = hash(b"", 64);
        let b = hash(b"", 64);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn different_digest_lengths_differ() {
        let a = hash(b"abc", 32);
        let b = hash(b"abc", 64);
        assert_ne!(a, &b[..32]);
    }

    #[test]
    fn keyed_hash_differs_from_unkeyed() {
        let unkeyed = hash(b"abc", 32);
        let keyed = keyed_hash(b"key", b"abc", 32);
        assert_ne!(unkeyed, keyed);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let msg = b"the quick brown fox jumps over the lazy dog";
        let one_shot = hash(msg, 32);

        let mut ctx = Context::new(32);
        for chunk in msg.chunks(5) {
            ctx.update(chunk);
        }
        let streamed = ctx.finalize_truncated(32);

        assert_eq!(one_shot, streamed);
    }

    #[test]
    fn xof_expansion_is_deterministic_and_sized() {
        let root = {
            let mut ctx = Context::new(64);
            ctx.update(b"seed");
            ctx.finalize()
        };
        let mut out1 = [0u8; 130];
        let mut out2 = [0u8; 130];
        expand_xof(&root, 130, &mut out1);
        expand_xof(&root, 130, &mut out2);
        assert_eq!(out1, out2);
    }
}
