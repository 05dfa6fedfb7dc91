use proptest::prelude::*;

use seedtree::{Error, Mnemonic};

fn valid_entropy() -> impl Strategy<Value = Vec<u8>> {
    prop::sample::select(vec![16usize, 20, 24, 28, 32])
        .prop_flat_map(|len| prop::collection::vec(any::<u8>(), len))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn entropy_survives_phrase_roundtrip(entropy in valid_entropy()) {
        let mnemonic = Mnemonic::from_entropy(&entropy).unwrap();
        prop_assert_eq!(mnemonic.word_count(), (entropy.len() * 8 + entropy.len() / 4) / 11);

        let parsed = Mnemonic::parse(&mnemonic.phrase()).unwrap();
        prop_assert_eq!(parsed.to_entropy(), entropy);
    }

    #[test]
    fn encoding_is_deterministic(entropy in valid_entropy()) {
        let a = Mnemonic::from_entropy(&entropy).unwrap();
        let b = Mnemonic::from_entropy(&entropy).unwrap();
        prop_assert_eq!(a.phrase(), b.phrase());
    }

    #[test]
    fn swapping_last_word_breaks_checksum_or_entropy(entropy in prop::collection::vec(any::<u8>(), 16)) {
        let mnemonic = Mnemonic::from_entropy(&entropy).unwrap();
        let mut words: Vec<&str> = mnemonic.words().collect();
        let last = words.pop().unwrap();
        let replacement = if last == "zoo" { "zone" } else { "zoo" };
        words.push(replacement);

        match Mnemonic::parse(&words.join(" ")) {
            Err(err) => prop_assert_eq!(err, Error::ChecksumMismatch),
            Ok(other) => prop_assert_ne!(other.to_entropy(), entropy),
        }
    }
}

#[test]
fn sixteen_bytes_give_twelve_words_and_thirty_two_give_twenty_four() {
    assert_eq!(Mnemonic::from_entropy(&[0x42; 16]).unwrap().word_count(), 12);
    assert_eq!(Mnemonic::from_entropy(&[0x42; 32]).unwrap().word_count(), 24);
}
