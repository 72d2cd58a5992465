//! Tests for controller resolution against contracts running in the EVM.

use alloy_primitives::{address, Address, U256};
use erc7656::{
    authorize,
    contracts::VALID_SIGNER_MAGIC,
    test_utils::{
        address_slot_value, owner_registry_code, reference_key, signer_account_code,
        OpcodeBuilder,
    },
    CodeReader, Controller, ControllerError, DeploymentKey, EvmHost, EvmHostError,
    LinkedContractReader, LinkedService, Mode, ServiceFactory,
};

const COLLECTION: Address = Address::repeat_byte(0xc0);
const ACCOUNT: Address = Address::repeat_byte(0xac);
const ALICE: Address = Address::repeat_byte(0xa1);
const BOB: Address = Address::repeat_byte(0xb0);

fn deploy(host: &mut EvmHost, key: &DeploymentKey) -> LinkedService {
    let address = ServiceFactory::default().create(host, key).unwrap();
    LinkedService::load(host, address).unwrap()
}

#[test]
fn test_holder_tracks_owner_of() {
    let mut host = EvmHost::with_create2_proxy(ServiceFactory::default().address());
    let token_id = U256::from(7);
    host.db_mut().set_account_code(COLLECTION, owner_registry_code());
    host.db_mut().set_account_storage(COLLECTION, token_id, address_slot_value(ALICE));

    let key = DeploymentKey { linked_contract: COLLECTION, ..reference_key(Mode::LinkedId, token_id) };
    let service = deploy(&mut host, &key);
    let image = host.code_at(service.address()).unwrap();

    assert_eq!(service.owner(&mut host).unwrap(), Controller::Holder(ALICE));
    assert!(authorize(&key, ALICE, &mut host).is_ok());

    // transfer the token; the service is never written
    host.db_mut().set_account_storage(COLLECTION, token_id, address_slot_value(BOB));

    assert_eq!(service.owner(&mut host).unwrap(), Controller::Holder(BOB));
    assert!(matches!(
        authorize(&key, ALICE, &mut host),
        Err(ControllerError::Unauthorized { caller, controller })
            if caller == ALICE && controller == Controller::Holder(BOB)
    ));
    assert_eq!(host.code_at(service.address()).unwrap(), image);
}

#[test]
fn test_account_ignores_linked_id() {
    let mut host = EvmHost::with_create2_proxy(ServiceFactory::default().address());
    host.db_mut().set_account_code(ACCOUNT, signer_account_code());

    let zero = deploy(
        &mut host,
        &DeploymentKey { linked_contract: ACCOUNT, ..reference_key(Mode::NoLinkedId, U256::ZERO) },
    );
    let other = deploy(
        &mut host,
        &DeploymentKey {
            linked_contract: ACCOUNT,
            ..reference_key(Mode::NoLinkedId, U256::from(1234))
        },
    );

    assert_ne!(zero.address(), other.address());
    assert_eq!(zero.owner(&mut host).unwrap(), Controller::Account(ACCOUNT));
    assert_eq!(other.owner(&mut host).unwrap(), Controller::Account(ACCOUNT));
}

#[test]
fn test_account_signer_authorization() {
    let mut host = EvmHost::with_create2_proxy(ServiceFactory::default().address());
    host.db_mut().set_account_code(ACCOUNT, signer_account_code());
    host.db_mut().set_account_storage(ACCOUNT, U256::ZERO, address_slot_value(ALICE));

    let key = DeploymentKey { linked_contract: ACCOUNT, ..reference_key(Mode::NoLinkedId, U256::ZERO) };

    assert_eq!(authorize(&key, ACCOUNT, &mut host).unwrap(), Controller::Account(ACCOUNT));
    assert_eq!(authorize(&key, ALICE, &mut host).unwrap(), Controller::Account(ACCOUNT));
    assert!(matches!(
        authorize(&key, BOB, &mut host),
        Err(ControllerError::Unauthorized { caller, .. }) if caller == BOB
    ));
}

#[test]
fn test_account_without_code_only_authorizes_itself() {
    let mut host = EvmHost::default();
    let key = DeploymentKey { linked_contract: ACCOUNT, ..reference_key(Mode::NoLinkedId, U256::ZERO) };

    assert!(authorize(&key, ACCOUNT, &mut host).is_ok());
    assert!(matches!(
        authorize(&key, ALICE, &mut host),
        Err(ControllerError::Unauthorized { .. })
    ));
}

#[test]
fn test_echoing_account_authorizes_nobody_else() {
    // the identity precompile returns its calldata, which starts with the magic selector
    let identity = address!("0x0000000000000000000000000000000000000004");
    let mut host = EvmHost::default();
    let key = DeploymentKey { linked_contract: identity, ..reference_key(Mode::NoLinkedId, U256::ZERO) };

    assert!(matches!(
        host.is_valid_signer(identity, ALICE),
        Err(EvmHostError::MalformedOutput(_))
    ));
    assert!(authorize(&key, ALICE, &mut host).is_err());
    assert!(authorize(&key, identity, &mut host).is_ok());
}

#[test]
fn test_signer_answer_with_dirty_padding_is_rejected() {
    let mut word = [0u8; 32];
    word[..4].copy_from_slice(VALID_SIGNER_MAGIC.as_slice());
    word[31] = 1;
    let mut host = EvmHost::default();
    host.db_mut()
        .set_account_code(ACCOUNT, OpcodeBuilder::default().return_with_data(word).build());
    let key = DeploymentKey { linked_contract: ACCOUNT, ..reference_key(Mode::NoLinkedId, U256::ZERO) };

    assert!(matches!(
        host.is_valid_signer(ACCOUNT, ALICE),
        Err(EvmHostError::MalformedOutput(output)) if output.len() == 32
    ));
    assert!(matches!(authorize(&key, ALICE, &mut host), Err(ControllerError::Reader(_))));
}
