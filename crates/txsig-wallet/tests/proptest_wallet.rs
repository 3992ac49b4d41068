use proptest::prelude::*;

use txsig_primitives::address::Network;
use txsig_primitives::ec::PrivateKey;
use txsig_transaction::sighash::{SIGHASH_ALL_FORKID, SIGHASH_NONE, SIGHASH_SINGLE};
use txsig_transaction::{Transaction, TransactionInput, TransactionOutput};
use txsig_wallet::{verify_message, InputDescriptor, LocalWallet, Wallet, WalletError};

/// Strategy for an unsigned transaction with 1..=4 inputs and a
/// descriptor for each input.
fn arb_tx_with_descriptors() -> impl Strategy<Value = (Transaction, Vec<InputDescriptor>)> {
    let arb_input = (prop::array::uniform32(any::<u8>()), any::<u32>(), any::<u32>()).prop_map(
        |(txid, vout, sequence)| {
            let mut input = TransactionInput::new();
            input.source_txid = txid;
            input.source_tx_out_index = vout;
            input.sequence_number = sequence;
            input
        },
    );

    let arb_descriptor_parts = (
        prop::collection::vec(any::<u8>(), 1..40),
        1_u64..1_000_000,
        prop::sample::select(vec![
            SIGHASH_ALL_FORKID,
            SIGHASH_NONE | 0x40,
            SIGHASH_SINGLE | 0x40,
        ]),
    );

    (
        prop::collection::vec((arb_input, arb_descriptor_parts), 1..4),
        prop::collection::vec(any::<u64>(), 1..4),
    )
        .prop_map(|(inputs, output_values)| {
            let mut tx = Transaction::new();
            let mut descriptors = Vec::new();
            for (index, (input, (script, satoshis, sighash_type))) in
                inputs.into_iter().enumerate()
            {
                tx.add_input(input);
                descriptors.push(InputDescriptor {
                    input_index: index as u32,
                    locking_script: script,
                    satoshis,
                    sighash_type,
                });
            }
            for satoshis in output_values {
                tx.add_output(TransactionOutput {
                    satoshis,
                    locking_script: vec![0x51],
                });
            }
            (tx, descriptors)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sign_transaction_one_result_per_descriptor(
        seed in prop::array::uniform32(any::<u8>()),
        (tx, descriptors) in arb_tx_with_descriptors()
    ) {
        if let Ok(key) = PrivateKey::from_bytes(&seed) {
            let wallet = LocalWallet::from_private_key(key, Network::Mainnet);
            let results = wallet.sign_transaction(&tx.to_hex(), &descriptors).unwrap();

            prop_assert_eq!(results.len(), descriptors.len());
            for (descriptor, result) in descriptors.iter().zip(&results) {
                prop_assert_eq!(&result.public_key_hex, &wallet.public_key_hex());
                let bytes = hex::decode(&result.signature_hex).unwrap();
                prop_assert_eq!(
                    u32::from(*bytes.last().unwrap()),
                    descriptor.sighash_type & 0xff
                );
            }

            // Same request twice gives identical results.
            let again = wallet.sign_transaction(&tx.to_hex(), &descriptors).unwrap();
            prop_assert_eq!(results, again);
        }
    }

    #[test]
    fn out_of_range_descriptor_fails_whole_batch(
        seed in prop::array::uniform32(any::<u8>()),
        (tx, mut descriptors) in arb_tx_with_descriptors(),
        extra in 0_u32..8
    ) {
        if let Ok(key) = PrivateKey::from_bytes(&seed) {
            let wallet = LocalWallet::from_private_key(key, Network::Mainnet);
            let bad_index = tx.input_count() as u32 + extra;
            descriptors.last_mut().unwrap().input_index = bad_index;

            let result = wallet.sign_transaction(&tx.to_hex(), &descriptors);
            let is_index_error = matches!(result, Err(WalletError::InvalidInputIndex { .. }));
            prop_assert!(is_index_error, "expected index error, got {:?}", result);
        }
    }

    #[test]
    fn message_signatures_verify_only_for_signer(
        seed in prop::array::uniform32(any::<u8>()),
        other_seed in prop::array::uniform32(any::<u8>()),
        message in ".{0,64}"
    ) {
        if let (Ok(key), Ok(other_key)) =
            (PrivateKey::from_bytes(&seed), PrivateKey::from_bytes(&other_seed))
        {
            let wallet = LocalWallet::from_private_key(key, Network::Mainnet);
            let other = LocalWallet::from_private_key(other_key, Network::Mainnet);
            let signature = wallet.sign_message(&message).unwrap();

            prop_assert!(verify_message(&message, &wallet.address(), &signature));
            if wallet.address() != other.address() {
                prop_assert!(!verify_message(&message, &other.address(), &signature));
            }
        }
    }

    #[test]
    fn verify_message_is_total_on_garbage(
        message in ".{0,32}",
        address in ".{0,40}",
        signature in ".{0,96}"
    ) {
        // Never panics or errors, whatever the inputs.
        let _ = verify_message(&message, &address, &signature);
    }
}
