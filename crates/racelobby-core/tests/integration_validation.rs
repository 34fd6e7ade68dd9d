//! Integration test: metadata validation, fee schedule, determinism
//!
//! Invalid metadata is rejected at every write and nothing is persisted.
//! Lobby addresses are a pure function of `(owner, track_mint)`.

use racelobby_core::{CreateLobby, LobbyController, SignerSet};
use racelobby_ledger::AccountView;
use racelobby_types::*;

fn controller_with_accounts(config: LobbyConfig, owner: &Address, track_mint: &Address) -> LobbyController {
    let game_mint = config.game_token_mint;
    let mut controller = LobbyController::new(config).unwrap();
    let ledger = controller.ledger_mut();
    ledger.open_token_account(owner, &game_mint).unwrap();
    ledger.open_token_account(owner, track_mint).unwrap();
    controller
}

fn create_with(
    controller: &mut LobbyController,
    owner: Address,
    authority: Address,
    track_mint: Address,
    lobby_data: LobbyData,
) -> Result<Address> {
    let signers: SignerSet = [owner, authority].into_iter().collect();
    controller.create(
        &signers,
        CreateLobby {
            owner,
            authority,
            track_mint,
            track_metadata: Address::new_unique(),
            lobby_data,
        },
    )
}

#[test]
fn zero_laps_rejected_nothing_persisted() {
    let owner = Address::new_unique();
    let track_mint = Address::new_unique();
    let mut controller =
        controller_with_accounts(LobbyConfig::new(Address::new_unique()), &owner, &track_mint);
    let accounts = controller.ledger().store().len();

    let mut data = LobbyData::sample();
    data.total_laps = 0;
    let err = create_with(&mut controller, owner, Address::new_unique(), track_mint, data)
        .unwrap_err();
    assert!(matches!(err, LobbyError::InvalidMetadata { .. }));
    assert_eq!(controller.ledger().store().len(), accounts);
    let lobby = LobbyController::lobby_address(&owner, &track_mint).unwrap();
    assert!(!controller.ledger().contains(&lobby));
}

#[test]
fn out_of_range_fields_rejected() {
    let owner = Address::new_unique();
    let track_mint = Address::new_unique();
    let mut controller =
        controller_with_accounts(LobbyConfig::new(Address::new_unique()), &owner, &track_mint);
    let authority = Address::new_unique();

    let cases: Vec<(&str, Box<dyn Fn(&mut LobbyData)>)> = vec![
        ("short name", Box::new(|d: &mut LobbyData| d.name = "Race".into())),
        ("long name", Box::new(|d: &mut LobbyData| d.name = "x".repeat(33))),
        ("short location", Box::new(|d: &mut LobbyData| d.location = "Bay".into())),
        ("class zero", Box::new(|d: &mut LobbyData| d.min_class = 0)),
        ("class six", Box::new(|d: &mut LobbyData| d.min_class = 6)),
        ("five laps", Box::new(|d: &mut LobbyData| d.total_laps = 5)),
    ];
    for (label, mutate) in cases {
        let mut data = LobbyData::sample();
        mutate(&mut data);
        let err = create_with(&mut controller, owner, authority, track_mint, data).unwrap_err();
        assert!(
            matches!(err, LobbyError::InvalidMetadata { .. }),
            "{label}: got {err}"
        );
    }
    assert!(controller.journal().is_empty());
}

#[test]
fn unknown_track_type_rejected_at_decode() {
    let json = r#"{
        "name": "ChillThrill",
        "location": "Solana Beach",
        "entryFee": 120,
        "minClass": 3,
        "totalLaps": 4,
        "trackType": "ice"
    }"#;
    let err = LobbyData::from_json(json).unwrap_err();
    assert!(matches!(err, LobbyError::InvalidMetadata { .. }));
    assert!(matches!(
        TrackType::from_tag(4).unwrap_err(),
        LobbyError::InvalidMetadata { .. }
    ));
}

#[test]
fn invalid_update_keeps_previous_metadata() {
    let owner = Address::new_unique();
    let track_mint = Address::new_unique();
    let mut controller =
        controller_with_accounts(LobbyConfig::new(Address::new_unique()), &owner, &track_mint);
    let lobby = create_with(
        &mut controller,
        owner,
        Address::new_unique(),
        track_mint,
        LobbyData::sample(),
    )
    .unwrap();

    let mut bad = LobbyData::sample_update();
    bad.total_laps = 0;
    let err = controller
        .update_metadata(&[owner].into_iter().collect(), &owner, &track_mint, bad)
        .unwrap_err();
    assert!(matches!(err, LobbyError::InvalidMetadata { .. }));
    assert_eq!(controller.get(&lobby).unwrap().lobby_data, LobbyData::sample());
}

#[test]
fn fee_schedule_enforced_on_create_and_update() {
    let owner = Address::new_unique();
    let track_mint = Address::new_unique();
    let state_authority = Address::new_unique();
    let mut config = LobbyConfig::new(Address::new_unique());
    config.state_authority = Some(state_authority);
    let mut controller = controller_with_accounts(config, &owner, &track_mint);

    // Class 3 ceiling is 100; the sample charges 120.
    let schedule = EntryFeeRequirements {
        min_fee: 10,
        max_class_fees: [50, 80, 100, 150, 200],
    };
    controller
        .set_entry_fee_requirements(&[state_authority].into_iter().collect(), schedule)
        .unwrap();

    let err = create_with(
        &mut controller,
        owner,
        state_authority,
        track_mint,
        LobbyData::sample(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("entry fee"), "Got: {err}");

    let mut cheaper = LobbyData::sample();
    cheaper.entry_fee = 100;
    let lobby = create_with(&mut controller, owner, state_authority, track_mint, cheaper).unwrap();

    // Class 4 allows up to 150, so the sample update fits.
    controller
        .update_metadata(
            &[owner].into_iter().collect(),
            &owner,
            &track_mint,
            LobbyData::sample_update(),
        )
        .unwrap();
    assert_eq!(controller.get(&lobby).unwrap().lobby_data.entry_fee, 150);
    assert_eq!(
        controller.journal().count(ReceiptType::FeeRequirementsSet),
        1
    );
}

#[test]
fn malformed_fee_schedule_rejected() {
    let state_authority = Address::new_unique();
    let mut config = LobbyConfig::new(Address::new_unique());
    config.state_authority = Some(state_authority);
    let mut controller = LobbyController::new(config).unwrap();
    let err = controller
        .set_entry_fee_requirements(
            &[state_authority].into_iter().collect(),
            EntryFeeRequirements {
                min_fee: 10,
                max_class_fees: [50, 50, 100, 150, 200],
            },
        )
        .unwrap_err();
    assert!(matches!(err, LobbyError::InvalidFeeRequirements { .. }));
    assert!(controller.config().entry_fee_requirements.is_none());
}

#[test]
fn track_mint_equal_to_game_mint_rejected() {
    let owner = Address::new_unique();
    let game_mint = Address::new_unique();
    let mut controller = LobbyController::new(LobbyConfig::new(game_mint)).unwrap();
    controller
        .ledger_mut()
        .open_token_account(&owner, &game_mint)
        .unwrap();
    let err = create_with(
        &mut controller,
        owner,
        Address::new_unique(),
        game_mint,
        LobbyData::sample(),
    )
    .unwrap_err();
    assert!(matches!(err, LobbyError::InvalidDerivation { .. }));
}

#[test]
fn lobby_address_is_pure() {
    let owner = Address::new_unique();
    let track_mint = Address::new_unique();
    let a = LobbyController::lobby_address(&owner, &track_mint).unwrap();
    let b = LobbyController::lobby_address(&owner, &track_mint).unwrap();
    assert_eq!(a, b);
    assert_ne!(
        a,
        LobbyController::lobby_address(&Address::new_unique(), &track_mint).unwrap()
    );
    assert!(matches!(
        LobbyController::lobby_address(&Address::DEFAULT, &track_mint).unwrap_err(),
        LobbyError::InvalidDerivation { .. }
    ));
}

#[test]
fn controller_from_json_config() {
    let game_mint = Address::new_unique();
    let authority = Address::new_unique();
    let json = format!(
        r#"{{
            "game_token_mint": "{game_mint}",
            "state_authority": "{authority}",
            "unlock_delay_secs": {},
            "bounds": {{
                "min_name_len": 5, "max_name_len": 32,
                "min_location_len": 5, "max_location_len": 32,
                "min_class": 1, "max_class": 5, "max_total_laps": 3
            }}
        }}"#,
        racelobby_types::constants::DEFAULT_UNLOCK_DELAY_SECS
    );
    let config = LobbyConfig::from_json(&json).unwrap();
    let owner = Address::new_unique();
    let track_mint = Address::new_unique();
    let mut controller = controller_with_accounts(config, &owner, &track_mint);

    // The sample runs 4 laps, over this deployment's limit.
    let err = create_with(&mut controller, owner, authority, track_mint, LobbyData::sample())
        .unwrap_err();
    assert!(matches!(err, LobbyError::InvalidMetadata { .. }));

    let mut three_laps = LobbyData::sample();
    three_laps.total_laps = 3;
    let lobby = create_with(&mut controller, owner, authority, track_mint, three_laps).unwrap();
    let record = controller.get(&lobby).unwrap();
    let unlock = record.unlock_time.unwrap();
    assert_eq!((unlock - record.created_at).num_hours(), 24);
}
