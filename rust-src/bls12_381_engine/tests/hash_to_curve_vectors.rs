//! Checks hashing to the curve and message expansion against the test vector
//! files in `tests/vectors`, which follow the format of the hash to curve
//! standard.
use bls12_381_engine::curve_arithmetic::{
    hashing::{expand_message_xmd, hash_to_field},
    Fp, Fp2, G1Affine, G1Projective, G2Affine, G2Projective,
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuiteVectors {
    ciphersuite:   String,
    dst:           String,
    random_oracle: bool,
    vectors:       Vec<PointVector>,
}

#[derive(Deserialize)]
struct PointVector {
    msg: String,
    #[serde(rename = "P")]
    p:   Coordinates,
    u:   Vec<String>,
}

#[derive(Deserialize)]
struct Coordinates {
    x: String,
    y: String,
}

#[derive(Deserialize)]
struct ExpandVectors {
    #[serde(rename = "DST")]
    dst:   String,
    tests: Vec<ExpandVector>,
}

#[derive(Deserialize)]
struct ExpandVector {
    msg:           String,
    len_in_bytes:  String,
    uniform_bytes: String,
}

fn base_path() -> PathBuf { Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("vectors") }

fn read_json<T: serde::de::DeserializeOwned>(name: &str) -> T {
    let contents = fs::read_to_string(base_path().join(name)).expect("Should have been able to read the file");
    serde_json::from_str(&contents).expect("Vector file should be well formed.")
}

fn parse_fp(s: &str) -> Fp {
    let bytes = hex::decode(s.trim().trim_start_matches("0x")).expect("Coordinate should be hex.");
    let bytes: [u8; 48] = bytes.try_into().expect("Coordinate should be 48 bytes.");
    Option::from(Fp::from_bytes(&bytes)).expect("Coordinate should be reduced.")
}

// The second field is given as `c0,c1`.
fn parse_fp2(s: &str) -> Fp2 {
    let (c0, c1) = s.split_once(',').expect("Coordinate should have two parts.");
    Fp2 {
        c0: parse_fp(c0),
        c1: parse_fp(c1),
    }
}

#[test]
fn test_g1_suites() {
    for file in ["BLS12381G1_XMD_SHA-256_SSWU_RO_.json", "BLS12381G1_XMD_SHA-256_SSWU_NU_.json"] {
        let suite: SuiteVectors = read_json(file);
        assert!(suite.ciphersuite.starts_with("BLS12381G1"));
        let dst = suite.dst.as_bytes();
        for v in suite.vectors.iter() {
            let msg = v.msg.as_bytes();
            let expected = G1Affine::from_xy_unchecked(parse_fp(&v.p.x), parse_fp(&v.p.y));
            assert!(bool::from(expected.is_on_curve()));
            let (p, us) = if suite.random_oracle {
                (G1Projective::hash_to_curve(msg, dst), hash_to_field::<Fp, 2>(msg, dst).to_vec())
            } else {
                (G1Projective::encode_to_curve(msg, dst), hash_to_field::<Fp, 1>(msg, dst).to_vec())
            };
            assert_eq!(p.to_affine(), expected, "{} on {:?}", suite.ciphersuite, v.msg);
            let expected_us: Vec<Fp> = v.u.iter().map(|u| parse_fp(u)).collect();
            assert_eq!(us, expected_us);
        }
    }
}

#[test]
fn test_g2_suites() {
    for file in ["BLS12381G2_XMD_SHA-256_SSWU_RO_.json", "BLS12381G2_XMD_SHA-256_SSWU_NU_.json"] {
        let suite: SuiteVectors = read_json(file);
        assert!(suite.ciphersuite.starts_with("BLS12381G2"));
        let dst = suite.dst.as_bytes();
        for v in suite.vectors.iter() {
            let msg = v.msg.as_bytes();
            let expected = G2Affine::from_xy_unchecked(parse_fp2(&v.p.x), parse_fp2(&v.p.y));
            assert!(bool::from(expected.is_on_curve()));
            let (p, us) = if suite.random_oracle {
                (G2Projective::hash_to_curve(msg, dst), hash_to_field::<Fp2, 2>(msg, dst).to_vec())
            } else {
                (G2Projective::encode_to_curve(msg, dst), hash_to_field::<Fp2, 1>(msg, dst).to_vec())
            };
            assert_eq!(p.to_affine(), expected, "{} on {:?}", suite.ciphersuite, v.msg);
            let expected_us: Vec<Fp2> = v.u.iter().map(|u| parse_fp2(u)).collect();
            assert_eq!(us, expected_us);
            // hashed points are always in the subgroup
            assert!(p.is_torsion_free());
        }
    }
}

#[test]
fn test_expand_message_xmd() {
    for file in ["expand_message_xmd_SHA256_38.json", "expand_message_xmd_SHA256_256.json"] {
        let vectors: ExpandVectors = read_json(file);
        let dst = vectors.dst.as_bytes();
        for t in vectors.tests.iter() {
            let len = usize::from_str_radix(t.len_in_bytes.trim_start_matches("0x"), 16)
                .expect("Length should be hex.");
            let out = expand_message_xmd(t.msg.as_bytes(), dst, len).expect("Length is in range.");
            assert_eq!(hex::encode(out), t.uniform_bytes, "{} bytes of {:?}", len, t.msg);
        }
    }
}
