//! Byte-exact construction of the service creation code and installed image.

use alloy_primitives::{keccak256, Bytes, B256};

use crate::{
    constants::{
        CONTEXT_LEN, CREATION_CODE_LEN, CREATION_PROLOGUE, FORWARDER_FOOTER, FORWARDER_HEADER,
        IMAGE_LEN,
    },
    DeploymentKey,
};

/// Returns the code a service runs with once deployed:
/// `header ‖ implementation ‖ footer ‖ context`.
pub fn installed_image(key: &DeploymentKey) -> Bytes {
    let mut image = Vec::with_capacity(IMAGE_LEN);
    write_image(&mut image, key);
    image.into()
}

/// Returns the creation code of a service: the self-deploy prologue followed by the image.
pub fn creation_code(key: &DeploymentKey) -> Bytes {
    let mut code = Vec::with_capacity(CREATION_CODE_LEN);
    code.extend_from_slice(&CREATION_PROLOGUE);
    write_image(&mut code, key);
    code.into()
}

/// Returns the keccak256 hash of [`creation_code`], the input of the CREATE2 address formula.
pub fn creation_code_hash(key: &DeploymentKey) -> B256 {
    keccak256(creation_code(key))
}

/// Returns the 128-byte context tail of the image:
/// `salt ‖ chainId ‖ mode ‖ linkedContract ‖ linkedId`.
pub fn encode_context(key: &DeploymentKey) -> [u8; CONTEXT_LEN] {
    let mut context = [0u8; CONTEXT_LEN];
    let mut offset = 0;
    for field in [
        key.salt.as_slice(),
        &key.chain_id.to_be_bytes::<32>(),
        key.mode.to_bytes().as_slice(),
        key.linked_contract.as_slice(),
        &key.linked_id.to_be_bytes::<32>(),
    ] {
        context[offset..offset + field.len()].copy_from_slice(field);
        offset += field.len();
    }
    context
}

fn write_image(buf: &mut Vec<u8>, key: &DeploymentKey) {
    buf.extend_from_slice(&FORWARDER_HEADER);
    buf.extend_from_slice(key.implementation.as_slice());
    buf.extend_from_slice(&FORWARDER_FOOTER);
    buf.extend_from_slice(&encode_context(key));
}
