//! Cross-crate integration tests exercising the full pipeline:
//! mnemonic -> derive key -> compile message -> sign -> wire bytes.
//!
//! These go through the public API of wallet_core and chain_sol to catch
//! regressions at crate boundaries.

use std::cell::RefCell;

use chain_sol::v0::AddressLookupTableAccount;
use chain_sol::{
    associated_token_address, compute_budget, system_program, Hash, Keypair, Pubkey, Signature,
    SigningState, Transaction, VersionedMessage,
};
use ed25519_dalek::{Verifier, VerifyingKey};
use wallet_core::*;

const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

const MIRACLE_MNEMONIC: &str =
    "miracle pizza supply useful steak border same again youth silver access hundred";

fn dalek_verify(pubkey: &Pubkey, message: &[u8], signature: &Signature) -> bool {
    let key = VerifyingKey::from_bytes(&pubkey.to_bytes()).unwrap();
    key.verify(message, &ed25519_dalek::Signature::from_bytes(signature.as_array()))
        .is_ok()
}

#[derive(Default)]
struct MemoryStorage(RefCell<Option<Keypair>>);

impl AccountStorage for MemoryStorage {
    fn current_keypair(&self) -> Option<Keypair> {
        self.0.borrow().clone()
    }

    fn persist(&self, keypair: &Keypair) -> Result<(), ProviderError> {
        self.0.replace(Some(keypair.clone()));
        Ok(())
    }
}

struct StaticProvider {
    blockhash: Hash,
    lamports_per_signature: u64,
}

impl BlockhashProvider for StaticProvider {
    fn recent_blockhash(&self) -> Result<Hash, ProviderError> {
        Ok(self.blockhash)
    }

    fn lamports_per_signature(&self) -> Result<u64, ProviderError> {
        Ok(self.lamports_per_signature)
    }
}

// ─── Derivation: mnemonic -> keypair ─────────────────────────────────

#[test]
fn default_path_matches_wallet_addresses() {
    let sdk = Sdk::default();
    let keypair = sdk.derive_keypair(TEST_MNEMONIC).unwrap();
    assert_eq!(
        keypair.pubkey().to_string(),
        "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk"
    );

    let seed = mnemonic_to_seed(TEST_MNEMONIC, "").unwrap();
    let account_1 = hd_derivation::derive_keypair(
        &seed[..],
        &DerivationPath::default_solana(1, 0),
        DerivationScheme::Slip10,
        true,
    )
    .unwrap();
    assert_eq!(
        account_1.pubkey().to_string(),
        "Hh8QwFUA6MtVu1qAoq12ucvFHNwCcVTV7hpWjeY1Hztb"
    );
}

#[test]
fn legacy_keychain_from_json_config() {
    let config = SdkConfig::from_json_str(
        r#"{"derivation_path": "m/501'/0'/0/0", "derivation_scheme": "legacy_bip32"}"#,
    )
    .unwrap();
    let sdk = Sdk::new(config, LogSink::disabled());
    assert_eq!(
        sdk.derive_keypair(MIRACLE_MNEMONIC).unwrap().pubkey().to_string(),
        "3h1zGmCwsRJnVk5BuRNMLsPaQu1y2aqXqXDWYCgrp5UG"
    );
}

#[test]
fn generated_mnemonic_derives_usable_key() {
    let mnemonic = generate_mnemonic(24).unwrap();
    assert!(validate_mnemonic(&mnemonic));

    let sdk = Sdk::default();
    let a = sdk.derive_keypair(&mnemonic).unwrap();
    let b = sdk.derive_keypair(&mnemonic).unwrap();
    assert_eq!(a.pubkey(), b.pubkey());
    assert!(a.pubkey().is_on_curve());
}

#[test]
fn passphrase_changes_derived_key() {
    let plain = Sdk::default().derive_keypair(TEST_MNEMONIC).unwrap();
    let with_passphrase = Sdk::new(
        SdkConfig {
            mnemonic_passphrase: "TREZOR".into(),
            ..SdkConfig::default()
        },
        LogSink::disabled(),
    )
    .derive_keypair(TEST_MNEMONIC)
    .unwrap();
    assert_ne!(plain.pubkey(), with_passphrase.pubkey());
}

// ─── SOL: derive -> compile -> sign -> wire ──────────────────────────

#[test]
fn sol_full_pipeline_native_transfer() {
    let sdk = Sdk::default();
    let payer = sdk.derive_keypair(TEST_MNEMONIC).unwrap();
    let recipient: Pubkey = "QqCCvshxtqMAL2CVALqiJB7uEeE5mjSPsseQdDzsRUo".parse().unwrap();
    let blockhash = Hash::new_from_array([0xaa; 32]);

    let instructions = [
        compute_budget::set_compute_unit_limit(200_000).unwrap(),
        compute_budget::set_compute_unit_price(1_000).unwrap(),
        system_program::transfer(&payer.pubkey(), &recipient, 1_000_000_000).unwrap(),
    ];
    let message = sdk.compile(Some(&payer.pubkey()), &instructions, blockhash).unwrap();
    assert_eq!(
        message.account_keys,
        vec![payer.pubkey(), recipient, compute_budget::ID, system_program::ID]
    );

    let transaction = sdk.sign(message.clone(), &[&payer]).unwrap();
    let wire = sdk.serialize(&transaction).unwrap();

    // compact-u16(1) signature + message
    assert_eq!(wire[0], 0x01);
    let message_bytes = message.serialize().unwrap();
    assert_eq!(&wire[65..], &message_bytes[..]);
    assert!(dalek_verify(
        &payer.pubkey(),
        &message_bytes,
        &transaction.signatures()[0]
    ));

    let decoded = Transaction::from_wire_bytes(&wire).unwrap();
    assert_eq!(decoded, transaction);
    assert!(decoded.verify().is_ok());
}

#[test]
fn sol_build_and_sign_with_collaborators() {
    let sdk = Sdk::default();
    let storage = MemoryStorage::default();
    let payer = sdk.restore_account(&storage, MIRACLE_MNEMONIC).unwrap();
    assert_eq!(payer.to_string(), "HnXJX1Bvps8piQwDYEYC6oea9GEkvQvahvRj3c97X9xr");

    let provider = StaticProvider {
        blockhash: Hash::new_from_array([7; 32]),
        lamports_per_signature: 5_000,
    };
    let recipient = Pubkey::new_from_array([2; 32]);
    let signed = sdk
        .build_and_sign(
            &storage,
            &provider,
            &[system_program::transfer(&payer, &recipient, 42).unwrap()],
        )
        .unwrap();

    assert_eq!(signed.fee, 5_000);
    assert!(signed.transaction.is_fully_signed());
    assert_eq!(signed.transaction.message().signer_keys(), &[payer]);
}

#[test]
fn sol_multi_signer_round_trip_between_parties() {
    let sdk = Sdk::default();
    let funder = Keypair::from_base58_string(
        "4Z7cXSyeFR8wNGMVXUE1TwtKn5D5Vu7FzEv69dokLv7KrQk7h6pu4LF8ZRR9yQBhc7uSM6RTTZtU1fmaxiNrxXrs",
    )
    .unwrap();
    assert_eq!(
        funder.pubkey().to_string(),
        "QqCCvshxtqMAL2CVALqiJB7uEeE5mjSPsseQdDzsRUo"
    );
    let new_account = Keypair::from_seed(&[0x11; 32]);

    let ix = system_program::create_account(
        &funder.pubkey(),
        &new_account.pubkey(),
        890_880,
        0,
        &system_program::ID,
    )
    .unwrap();
    let message = sdk.compile(None, &[ix], Hash::new_from_array([1; 32])).unwrap();

    // First party signs and ships a partial transaction.
    let partial = sdk.sign(message, &[&funder]).unwrap();
    assert_eq!(partial.state(), SigningState::PartiallySigned);
    assert_eq!(partial.missing_signers(), vec![new_account.pubkey()]);
    let partial_wire = partial.serialize_for_simulation().unwrap();

    // Second party decodes, adds its signature, and re-signing is a no-op.
    let mut received = Transaction::from_wire_bytes(&partial_wire).unwrap();
    received.sign(&new_account).unwrap();
    let before = received.clone();
    received.sign(&funder).unwrap();
    assert_eq!(received, before);
    assert!(received.is_fully_signed());

    let wire = sdk.serialize(&received).unwrap();
    assert_eq!(wire[0], 0x02);
    assert_eq!(Transaction::from_wire_bytes(&wire).unwrap(), received);
}

#[test]
fn sol_v0_pipeline_with_lookup_table() {
    let sdk = Sdk::default();
    let payer = Keypair::from_seed(&[0x21; 32]);
    let recipient = Pubkey::new_from_array([0x33; 32]);
    let table = AddressLookupTableAccount {
        key: Pubkey::new_from_array([0x44; 32]),
        addresses: vec![Pubkey::new_from_array([0x55; 32]), recipient],
    };

    let message = sdk
        .compile_v0(
            &payer.pubkey(),
            &[system_program::transfer(&payer.pubkey(), &recipient, 5).unwrap()],
            &[table.clone()],
            Hash::new_from_array([9; 32]),
        )
        .unwrap();
    assert_eq!(message.account_keys, vec![payer.pubkey(), system_program::ID]);
    assert_eq!(message.address_table_lookups.len(), 1);
    assert_eq!(message.address_table_lookups[0].account_key, table.key);
    assert_eq!(message.address_table_lookups[0].writable_indexes, vec![1]);
    assert_eq!(message.instructions[0].accounts, vec![0, 2]);

    let transaction = sdk.sign(message.clone(), &[&payer]).unwrap();
    let wire = sdk.serialize(&transaction).unwrap();
    assert_eq!(wire[65], 0x80);

    let decoded = Transaction::from_wire_bytes(&wire).unwrap();
    assert_eq!(decoded.message(), &VersionedMessage::V0(message));
}

#[test]
fn sol_blockhash_refresh_only_before_signing() {
    let sdk = Sdk::default();
    let payer = Keypair::from_seed(&[0x31; 32]);
    let message = sdk
        .compile(
            None,
            &[system_program::transfer(&payer.pubkey(), &Pubkey::new_from_array([1; 32]), 1).unwrap()],
            Hash::default(),
        )
        .unwrap();

    let mut transaction = Transaction::new_unsigned(message).unwrap();
    let fresh = Hash::new_from_array([0xfe; 32]);
    transaction.set_recent_blockhash(fresh).unwrap();
    transaction.sign(&payer).unwrap();
    assert_eq!(transaction.message().recent_blockhash(), &fresh);
    assert!(transaction.set_recent_blockhash(Hash::default()).is_err());
}

// ─── Token accounts ──────────────────────────────────────────────────

#[test]
fn derived_wallet_token_accounts() {
    let wallet = Sdk::default().derive_keypair(TEST_MNEMONIC).unwrap().pubkey();
    let usdc: Pubkey = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse().unwrap();
    let other: Pubkey = "QqCCvshxtqMAL2CVALqiJB7uEeE5mjSPsseQdDzsRUo".parse().unwrap();

    let sender_ata = associated_token_address(&wallet, &usdc).unwrap();
    let recipient_ata = associated_token_address(&other, &usdc).unwrap();
    assert_ne!(sender_ata, recipient_ata);
    assert!(!sender_ata.is_on_curve());
    assert_eq!(
        recipient_ata.to_string(),
        "8RR7aQmwgua9ahXCTitRbwToH182TtNDEJ5uR6VEZzYy"
    );
}
