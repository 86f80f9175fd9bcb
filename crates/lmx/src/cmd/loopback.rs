use lmx_codec::{FrameBuffer, HEADER_SIZE, RESERVED_OVERHEAD};

use crate::cmd::LoopbackArgs;
use crate::exit::{codec_error, CliError, CliResult, INTERNAL, SUCCESS, USAGE};

pub fn run(args: LoopbackArgs) -> CliResult<i32> {
    let payload: Vec<u8> = match &args.data {
        Some(text) => text.as_bytes().to_vec(),
        None => (0..255u32).map(|i| b'0' + (i % 10) as u8).collect(),
    };
    if payload.len() > args.capacity {
        return Err(CliError::new(
            USAGE,
            format!(
                "payload ({} bytes) exceeds capacity ({})",
                payload.len(),
                args.capacity
            ),
        ));
    }

    // Caller-owned regions, sized the way a static user buffer would be.
    let mut region_tx = vec![0u8; args.capacity + RESERVED_OVERHEAD];
    let mut region_rx = vec![0u8; args.capacity + RESERVED_OVERHEAD];
    let mut tx = FrameBuffer::from_region(&mut region_tx)
        .map_err(|err| codec_error("buffer setup failed", err))?;
    let mut rx = FrameBuffer::from_region(&mut region_rx)
        .map_err(|err| codec_error("buffer setup failed", err))?;
    println!(
        "borrowed regions: {} / {} bytes usable",
        tx.usable_space(),
        rx.usable_space()
    );
    run_pair(&mut tx, &mut rx, &payload)?;

    // Codec-owned allocations.
    let mut tx =
        FrameBuffer::alloc(args.capacity).map_err(|err| codec_error("buffer setup failed", err))?;
    let mut rx =
        FrameBuffer::alloc(args.capacity).map_err(|err| codec_error("buffer setup failed", err))?;
    println!(
        "owned buffers:    {} / {} bytes usable",
        tx.usable_space(),
        rx.usable_space()
    );
    run_pair(&mut tx, &mut rx, &payload)?;

    Ok(SUCCESS)
}

fn run_pair(
    tx: &mut FrameBuffer<'_>,
    rx: &mut FrameBuffer<'_>,
    payload: &[u8],
) -> CliResult<()> {
    let encoded = tx
        .encode(payload)
        .map_err(|err| codec_error("encode failed", err))?;
    let wire = &tx.as_slice()[..encoded];
    println!(
        "encoded {} payload bytes into {} wire bytes",
        payload.len(),
        encoded
    );

    let mut recovered = None;
    for byte in wire {
        if let Some(len) = rx
            .decode(*byte)
            .map_err(|err| codec_error("incremental decode failed", err))?
        {
            recovered = Some(rx.as_slice()[..len].to_vec());
        }
    }
    check("simple mode", recovered, payload)?;

    let mut at = 0;
    let len = loop {
        if at >= encoded {
            return Err(CliError::new(INTERNAL, "bulk decode never found a header"));
        }
        if let Some(len) = rx.decode_find(wire[at]) {
            break len;
        }
        at += 1;
    };
    debug_assert_eq!(at, HEADER_SIZE - 1);
    rx.decode_copy(&wire[at + 1..at + 1 + len])
        .map_err(|err| codec_error("bulk decode failed", err))?;
    check("bulk mode", Some(rx.as_slice()[..len].to_vec()), payload)?;

    Ok(())
}

fn check(label: &str, recovered: Option<Vec<u8>>, expected: &[u8]) -> CliResult<()> {
    match recovered {
        Some(bytes) if bytes == expected => {
            println!("{label}: recovered {} bytes", bytes.len());
            Ok(())
        }
        Some(bytes) => Err(CliError::new(
            INTERNAL,
            format!(
                "{label}: payload mismatch ({} bytes back, {} sent)",
                bytes.len(),
                expected.len()
            ),
        )),
        None => Err(CliError::new(INTERNAL, format!("{label}: no frame recovered"))),
    }
}
