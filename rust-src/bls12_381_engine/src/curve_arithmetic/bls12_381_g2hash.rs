//! Hashing to G2 as specified for the suites BLS12381G2_XMD:SHA-256_SSWU_RO_
//! and BLS12381G2_XMD:SHA-256_SSWU_NU_ of
//! https://www.rfc-editor.org/rfc/rfc9380#section-8.8.2
use super::{fp::Fp, fp2::Fp2, hashing::hash_to_field, G2Projective};
use subtle::ConditionallySelectable;

/// Implements https://www.rfc-editor.org/rfc/rfc9380#section-3
/// It follows the steps
///    1. u = hash_to_field(msg, 2)
///    2. Q0 = map_to_curve(u[0])
///    3. Q1 = map_to_curve(u[1])
///    4. R = Q0 + Q1
///    5. P = clear_cofactor(R)
///    6. return P
/// where clear_cofactor uses the endomorphism psi, see
/// [G2::clear_cofactor](super::Curve::clear_cofactor).
pub fn hash_to_curve(msg: &[u8], dst: &[u8]) -> G2Projective {
    let [u0, u1]: [Fp2; 2] = hash_to_field(msg, dst);
    let q0 = map_to_curve(&u0); // on E2, but not necessarily in G2
    let q1 = map_to_curve(&u1);
    (q0 + q1).clear_cofactor()
}

/// The nonuniform encoding to G2. Not a substitute for [hash_to_curve] in
/// signatures.
pub fn encode_to_curve(msg: &[u8], dst: &[u8]) -> G2Projective {
    let [u]: [Fp2; 1] = hash_to_field(msg, dst);
    map_to_curve(&u).clear_cofactor()
}

fn map_to_curve(u: &Fp2) -> G2Projective {
    let (x, y) = sswu(u);
    let (x, y, z) = iso_3(&x, &y);
    G2Projective::from_jacobian(x, y, z)
}

// Coefficients of E2': y^2 = x^3 + A' x + B', with A' = 240 * I and
// B' = 1012 * (1 + I), and the map constant Z = -(2 + I).
fn iso_curve_a() -> Fp2 {
    Fp2 {
        c0: Fp::zero(),
        c1: Fp::from_u64(240),
    }
}

fn iso_curve_b() -> Fp2 {
    Fp2 {
        c0: Fp::from_u64(1012),
        c1: Fp::from_u64(1012),
    }
}

fn sswu_z() -> Fp2 {
    -Fp2 {
        c0: Fp::from_u64(2),
        c1: Fp::one(),
    }
}

fn fp2_from_limbs(limbs: &[[u64; 6]; 2]) -> Fp2 {
    Fp2 {
        c0: Fp::from_canonical_unchecked(&limbs[0]),
        c1: Fp::from_canonical_unchecked(&limbs[1]),
    }
}

// -B' / A'
#[allow(clippy::unreadable_literal)]
const SSWU_C1: [[u64; 6]; 2] = [
    [
        0x725d8cccccccb1c3,
        0xd6834443da498888,
        0x02cf75e62bfc4df1,
        0x9b8c2d3f6f3f7923,
        0xfe2f284f0cc6e5aa,
        0x083c12791abdd5d2,
    ],
    [
        0x47a173333332f8e8,
        0x4828bbbad70a7777,
        0x64615cbacab4a832,
        0xc8eb1e458445999c,
        0x4cec7f673684c72c,
        0x11c4ff711ec210c7,
    ],
];

// -1 / Z
#[allow(clippy::unreadable_literal)]
const SSWU_C2: [[u64; 6]; 2] = [
    [
        0x2e65999999995556,
        0xb223333227766666,
        0xec270ee72bc0c4e9,
        0x1d2c3c6a5c6a7565,
        0x08e2ec91cf6fbd79,
        0x14cda7ee94665215,
    ],
    [
        0xa2cc333333330000,
        0x459a66659d98cccc,
        0x711d4b2d60d093af,
        0xd5e12d4fc54fd80c,
        0xc6aa316d5b93ce1a,
        0x0f9a3df2ef4cbd8f,
    ],
];

/// Implements https://www.rfc-editor.org/rfc/rfc9380#section-6.6.2
/// This is not the optimized straight-line version of appendix F.2.
fn sswu(u: &Fp2) -> (Fp2, Fp2) {
    let a = iso_curve_a();
    let b = iso_curve_b();
    let z = sswu_z();
    // Constants:
    // 1.  c1 = -B / A
    let c1 = fp2_from_limbs(&SSWU_C1);
    // 2.  c2 = -1 / Z
    let c2 = fp2_from_limbs(&SSWU_C2);

    // Steps:
    // 1.  tv1 = Z * u^2
    let tv1 = z * u.square();
    // 2.  tv2 = tv1^2
    let mut tv2 = tv1.square();
    // 3.   x1 = tv1 + tv2
    // 4.   x1 = inv0(x1)
    let mut x1 = (tv1 + tv2).invert().unwrap_or(Fp2::zero());
    // 5.   e1 = x1 == 0
    let e1 = x1.is_zero();
    // 6.   x1 = x1 + 1
    x1 += Fp2::one();
    // 7.   x1 = CMOV(x1, c2, e1)    # If (tv1 + tv2) == 0, set x1 = -1 / Z
    x1 = Fp2::conditional_select(&x1, &c2, e1);
    // 8.   x1 = x1 * c1      # x1 = (-B / A) * (1 + (1 / (Z^2 * u^4 + Z * u^2)))
    x1 *= c1;
    // 9.  gx1 = x1^2
    // 10. gx1 = gx1 + A
    // 11. gx1 = gx1 * x1
    // 12. gx1 = gx1 + B             # gx1 = g(x1) = x1^3 + A * x1 + B
    let gx1 = (x1.square() + a) * x1 + b;
    // 13.  x2 = tv1 * x1            # x2 = Z * u^2 * x1
    let x2 = tv1 * x1;
    // 14. tv2 = tv1 * tv2
    tv2 *= tv1;
    // 15. gx2 = gx1 * tv2           # gx2 = (Z * u^2)^3 * gx1
    let gx2 = gx1 * tv2;
    // 16.  e2 = is_square(gx1)
    let e2 = gx1.is_square();
    // 17.   x = CMOV(x2, x1, e2)    # If is_square(gx1), x = x1, else x = x2
    let x = Fp2::conditional_select(&x2, &x1, e2);
    // 18.  y2 = CMOV(gx2, gx1, e2)  # If is_square(gx1), y2 = gx1, else y2 = gx2
    let y2 = Fp2::conditional_select(&gx2, &gx1, e2);
    // 19.   y = sqrt(y2)
    // y2 is a square by the choice of Z, so the fallback is never taken.
    let y = y2.sqrt().unwrap_or(Fp2::zero());
    // 20.  e3 = sgn0(u) == sgn0(y)  # Fix sign of y
    let e3 = !(u.sgn0() ^ y.sgn0());
    // 21.   y = CMOV(-y, y, e3)
    let y = Fp2::conditional_select(&-y, &y, e3);
    // 22. return (x, y)
    (x, y)
}

/// Computes the 3-isogeny map from E2' to E2 of
/// https://www.rfc-editor.org/rfc/rfc9380#appendix-E.3 on an affine point,
/// returning the image in Jacobian coordinates.
fn iso_3(x: &Fp2, y: &Fp2) -> (Fp2, Fp2, Fp2) {
    let x_num = horner(&K1, x);
    let x_den = horner(&K2, x);
    let y_num = horner(&K3, x) * y;
    let y_den = horner(&K4, x);

    let z_jac = x_den * y_den;
    let x_jac = x_num * y_den * z_jac;
    let y_jac = y_num * x_den * z_jac.square();
    (x_jac, y_jac, z_jac)
}

/// Evaluates the polynomial with the given coefficients, lowest degree first,
/// with Horner's rule.
fn horner(coefficients: &[[[u64; 6]; 2]], variable: &Fp2) -> Fp2 {
    coefficients
        .iter()
        .rev()
        .fold(Fp2::zero(), |acc, coeff| acc * variable + fp2_from_limbs(coeff))
}

// Coefficients of the 3-isogeny rational maps, lowest degree first
#[allow(clippy::unreadable_literal)]
const K1: [[[u64; 6]; 2]; 4] = [
    [
        [
            0x6238aaaaaaaa97d6,
            0x5c2638e343d9c71c,
            0x88b58423c50ae15d,
            0x32c52d39fd3a042a,
            0xbb5b7a9a47d7ed85,
            0x5c759507e8e333e,
        ],
        [
            0x6238aaaaaaaa97d6,
            0x5c2638e343d9c71c,
            0x88b58423c50ae15d,
            0x32c52d39fd3a042a,
            0xbb5b7a9a47d7ed85,
            0x5c759507e8e333e,
        ],
    ],
    [[0, 0, 0, 0, 0, 0], [
        0x26a9ffffffffc71a,
        0x1472aaa9cb8d5555,
        0x9a208c6b4f20a418,
        0x984f87adf7ae0c7f,
        0x32126fced787c88f,
        0x11560bf17baa99bc,
    ]],
    [
        [
            0x26a9ffffffffc71e,
            0x1472aaa9cb8d5555,
            0x9a208c6b4f20a418,
            0x984f87adf7ae0c7f,
            0x32126fced787c88f,
            0x11560bf17baa99bc,
        ],
        [
            0x9354ffffffffe38d,
            0x0a395554e5c6aaaa,
            0xcd104635a790520c,
            0xcc27c3d6fbd7063f,
            0x190937e76bc3e447,
            0x8ab05f8bdd54cde,
        ],
    ],
    [
        [
            0x88e2aaaaaaaa5ed1,
            0x7098e38d0f671c71,
            0x22d6108f142b8575,
            0xcb14b4e7f4e810aa,
            0xed6dea691f5fb614,
            0x171d6541fa38ccfa,
        ],
        [0, 0, 0, 0, 0, 0],
    ],
];

#[allow(clippy::unreadable_literal)]
const K2: [[[u64; 6]; 2]; 3] = [
    [[0, 0, 0, 0, 0, 0], [
        0xb9feffffffffaa63,
        0x1eabfffeb153ffff,
        0x6730d2a0f6b0f624,
        0x64774b84f38512bf,
        0x4b1ba7b6434bacd7,
        0x1a0111ea397fe69a,
    ]],
    [[0xc, 0, 0, 0, 0, 0], [
        0xb9feffffffffaa9f,
        0x1eabfffeb153ffff,
        0x6730d2a0f6b0f624,
        0x64774b84f38512bf,
        0x4b1ba7b6434bacd7,
        0x1a0111ea397fe69a,
    ]],
    [[1, 0, 0, 0, 0, 0], [0, 0, 0, 0, 0, 0]],
];

#[allow(clippy::unreadable_literal)]
const K3: [[[u64; 6]; 2]; 4] = [
    [
        [
            0x12cfc71c71c6d706,
            0xfc8c25ebf8c92f68,
            0xf54439d87d27e500,
            0x0f7da5d4a07f649b,
            0x59a4c18b076d1193,
            0x1530477c7ab4113b,
        ],
        [
            0x12cfc71c71c6d706,
            0xfc8c25ebf8c92f68,
            0xf54439d87d27e500,
            0x0f7da5d4a07f649b,
            0x59a4c18b076d1193,
            0x1530477c7ab4113b,
        ],
    ],
    [[0, 0, 0, 0, 0, 0], [
        0x6238aaaaaaaa97be,
        0x5c2638e343d9c71c,
        0x88b58423c50ae15d,
        0x32c52d39fd3a042a,
        0xbb5b7a9a47d7ed85,
        0x5c759507e8e333e,
    ]],
    [
        [
            0x26a9ffffffffc71c,
            0x1472aaa9cb8d5555,
            0x9a208c6b4f20a418,
            0x984f87adf7ae0c7f,
            0x32126fced787c88f,
            0x11560bf17baa99bc,
        ],
        [
            0x9354ffffffffe38f,
            0x0a395554e5c6aaaa,
            0xcd104635a790520c,
            0xcc27c3d6fbd7063f,
            0x190937e76bc3e447,
            0x8ab05f8bdd54cde,
        ],
    ],
    [
        [
            0xe1b371c71c718b10,
            0x4e79097a56dc4bd9,
            0xb0e977c69aa27452,
            0x761b0f37a1e26286,
            0xfbf7043de3811ad0,
            0x124c9ad43b6cf79b,
        ],
        [0, 0, 0, 0, 0, 0],
    ],
];

#[allow(clippy::unreadable_literal)]
const K4: [[[u64; 6]; 2]; 4] = [
    [
        [
            0xb9feffffffffa8fb,
            0x1eabfffeb153ffff,
            0x6730d2a0f6b0f624,
            0x64774b84f38512bf,
            0x4b1ba7b6434bacd7,
            0x1a0111ea397fe69a,
        ],
        [
            0xb9feffffffffa8fb,
            0x1eabfffeb153ffff,
            0x6730d2a0f6b0f624,
            0x64774b84f38512bf,
            0x4b1ba7b6434bacd7,
            0x1a0111ea397fe69a,
        ],
    ],
    [[0, 0, 0, 0, 0, 0], [
        0xb9feffffffffa9d3,
        0x1eabfffeb153ffff,
        0x6730d2a0f6b0f624,
        0x64774b84f38512bf,
        0x4b1ba7b6434bacd7,
        0x1a0111ea397fe69a,
    ]],
    [[0x12, 0x0, 0x0, 0x0, 0x0, 0x0], [
        0xb9feffffffffaa99,
        0x1eabfffeb153ffff,
        0x6730d2a0f6b0f624,
        0x64774b84f38512bf,
        0x4b1ba7b6434bacd7,
        0x1a0111ea397fe69a,
    ]],
    [[1, 0, 0, 0, 0, 0], [0, 0, 0, 0, 0, 0]],
];
