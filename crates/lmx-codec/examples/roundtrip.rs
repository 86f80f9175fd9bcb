//! Encode a payload and recover it through both decode paths, in both
//! ownership modes.
//!
//! Run with:
//!   cargo run --example roundtrip -p lmx-codec

use lmx_codec::{FrameBuffer, HEADER_SIZE};

fn run_both_paths(
    tx: &mut FrameBuffer<'_>,
    rx: &mut FrameBuffer<'_>,
    payload: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let encoded = tx.encode(payload)?;
    eprintln!(
        "encoded {} payload bytes into {} wire bytes",
        payload.len(),
        encoded
    );
    let wire = &tx.as_slice()[..encoded];

    // Simple path: one byte at a time, suited to interrupt-driven intake.
    for byte in wire {
        if let Some(len) = rx.decode(*byte)? {
            eprintln!(
                "simple mode: recovered {} bytes: [{}]",
                len,
                String::from_utf8_lossy(&rx.as_slice()[..len])
            );
        }
    }

    // Bulk path: parse the header byte-wise, then take the payload whole.
    let mut at = 0;
    let len = loop {
        if let Some(len) = rx.decode_find(wire[at]) {
            break len;
        }
        at += 1;
    };
    assert_eq!(at, HEADER_SIZE - 1);
    rx.decode_copy(&wire[at + 1..at + 1 + len])?;
    eprintln!(
        "bulk mode:   recovered {} bytes: [{}]",
        len,
        String::from_utf8_lossy(&rx.as_slice()[..len])
    );

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Cycling digits, the classic serial-bench payload.
    let payload: Vec<u8> = (0..255).map(|i| b'0' + (i % 10) as u8).collect();

    // Caller-owned regions on the stack.
    let mut region1 = [0u8; 512];
    let mut region2 = [0u8; 512];
    let mut tx = FrameBuffer::from_region(&mut region1)?;
    let mut rx = FrameBuffer::from_region(&mut region2)?;
    eprintln!(
        "borrowed regions: {} / {} bytes usable",
        tx.usable_space(),
        rx.usable_space()
    );
    run_both_paths(&mut tx, &mut rx, &payload)?;

    // Codec-owned allocations, released on drop.
    let mut tx = FrameBuffer::alloc(512)?;
    let mut rx = FrameBuffer::alloc(512)?;
    eprintln!(
        "owned buffers:    {} / {} bytes usable",
        tx.usable_space(),
        rx.usable_space()
    );
    run_both_paths(&mut tx, &mut rx, &payload)?;

    Ok(())
}
