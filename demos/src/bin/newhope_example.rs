use std::error::Error;

use log::info;
use newhope_core::{
    params::newhope512,
    pt_ntt::PtNttParams,
    sampling::{sample_noise, sample_uniform},
};
use newhope_cpapke::{cpa, params::sizes, Ciphertext};
use rand::{rngs::OsRng, RngCore};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("Small NewHope-512 CPA-PKE Example");
    println!("=================================");
    let info = newhope512::poly_modulus();
    println!("Ring: {}[x]/(x^{} + 1), eta = {}", info.modulus, newhope512::N, newhope512::ETA);
    println!(
        "Sizes: pk {} bytes, sk {} bytes, ciphertext {} bytes",
        sizes::PUBLICKEYBYTES,
        sizes::SECRETKEYBYTES,
        sizes::CIPHERTEXTBYTES
    );

    // First, check the pt-NTT product against the schoolbook one
    println!("\nPseudo-truncated NTT:");
    println!("---------------------");

    let engine = PtNttParams::newhope512();
    let a = engine.invert(&sample_uniform(b"demo public seed", info));
    let s = sample_noise(b"demo noise seed", 0, info, newhope512::ETA);

    let fast = engine.multiply(&a, &s);
    let slow = a.schoolbook_mul(&s);
    info!("pt-NTT product checked against {} coefficient schoolbook product", slow.degree());
    println!("Bowtie product matches schoolbook: {}", fast == slow);

    // Then run the scheme
    println!("\nCPA-secure encryption:");
    println!("----------------------");

    let mut rng = OsRng;
    let (pk, sk) = cpa::keypair(&mut rng)?;
    println!("Generated keypair");
    println!("Public seed: {}", hex::encode(&pk.as_bytes()[sizes::PUBLICKEYBYTES - 8..]));

    let mut message = [0u8; sizes::MESSAGE_BYTES];
    rng.fill_bytes(&mut message);
    println!("Random message: {}", hex::encode(&message[0..8]));

    let mut coin = [0u8; sizes::SEED_BYTES];
    rng.fill_bytes(&mut coin);

    let ciphertext = cpa::encrypt(&message, &pk, &coin)?;
    println!("Message encrypted with public key");

    let decrypted = cpa::decrypt(&ciphertext, &sk)?;
    println!("Decrypted message: {}", hex::encode(&decrypted[0..8]));

    let bit_diffs: u32 = message
        .iter()
        .zip(&decrypted)
        .map(|(a, b)| (a ^ b).count_ones())
        .sum();

    if bit_diffs == 0 {
        println!("Decryption successful!");
    } else {
        println!("Decryption had {} bit differences out of 256 bits", bit_diffs);
    }

    // Demonstrate tampering with the ciphertext
    println!("\nTampering with ciphertext:");
    println!("--------------------------");

    let mut tampered_bytes = ciphertext.as_bytes().to_vec();
    for b in &mut tampered_bytes[sizes::CIPHERTEXTBYTES - 16..] {
        *b ^= 0xff;
    }
    println!("Flipped the last 16 bytes of the ciphertext");

    let tampered = Ciphertext::from_bytes(&tampered_bytes)?;
    let tampered_msg = cpa::decrypt(&tampered, &sk)?;
    println!("Original message: {}", hex::encode(&message[0..8]));
    println!("Tampered message: {}", hex::encode(&tampered_msg[0..8]));
    println!("The PKE has no integrity check; that belongs to the KEM built on top.");

    // And a malformed one
    let mut malformed = ciphertext.as_bytes().to_vec();
    malformed[0] = 0xff;
    malformed[1] |= 0x0f;
    match Ciphertext::from_bytes(&malformed) {
        Ok(_) => println!("Malformed ciphertext was accepted!"),
        Err(e) => println!("Malformed ciphertext rejected: {}", e),
    }

    Ok(())
}
